use async_trait::async_trait;
use thiserror::Error;

use crate::models::{LikeToggle, Profile};

/// Errors that can occur when reading or writing profiles
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Source of profiles and liked sets
///
/// Implementations must return the candidate pool in a stable order
/// (ascending id) so that equal scores rank deterministically.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a single profile
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Fetch profiles in the order of `ids`, skipping ids that no longer resolve
    async fn get_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, StoreError>;

    /// Ids the user has liked, oldest like first
    async fn liked_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError>;

    /// All profile-complete users except `exclude_id` and `exclude_ids`
    async fn candidate_pool(
        &self,
        exclude_id: &str,
        exclude_ids: &[String],
    ) -> Result<Vec<Profile>, StoreError>;

    /// Add `target_id` to the user's liked set, or remove it if already there
    async fn toggle_like(&self, user_id: &str, target_id: &str) -> Result<LikeToggle, StoreError>;

    /// Insert or replace a profile
    async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError>;

    /// Health check for the backing storage
    async fn health_check(&self) -> Result<bool, StoreError>;
}
