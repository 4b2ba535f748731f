// Service exports
pub mod memory;
pub mod postgres;
pub mod recommendations;
pub mod store;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use recommendations::{RecommendationService, RecommendationError};
pub use store::{ProfileStore, StoreError};
