//! Roomie Algo - Roommate recommendation service for the campus housing app
//!
//! Profiles are turned into weighted feature vectors and candidates are ranked
//! by cosine similarity against either the requester's own vector or the
//! centroid of the profiles they liked.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchingOptions, Vectorizer, FieldWeights, cosine_similarity, compute_centroid};
pub use models::{Profile, FeatureVector, RoommateRecommendation, RecommendationsResponse};
pub use services::{ProfileStore, InMemoryStore, RecommendationService, RecommendationError};
