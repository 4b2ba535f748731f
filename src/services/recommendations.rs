use std::sync::Arc;

use thiserror::Error;

use crate::core::Matcher;
use crate::models::{BaseVectorSource, LikeToggle, Profile, RecommendationsResponse};
use crate::services::store::{ProfileStore, StoreError};

/// Errors surfaced by the recommendation service
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("You cannot like your own profile")]
    SelfLike,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Roommate recommendations and liked-set management over a profile store
pub struct RecommendationService {
    store: Arc<dyn ProfileStore>,
    matcher: Matcher,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn ProfileStore>, matcher: Matcher) -> Self {
        Self { store, matcher }
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    async fn require_profile(&self, user_id: &str) -> Result<Profile, RecommendationError> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| RecommendationError::NotFound(user_id.to_string()))
    }

    /// Rank every eligible candidate for a user
    ///
    /// The pool is all profile-complete users other than the requester and the
    /// profiles they already liked. No truncation: paging is the caller's job.
    pub async fn get_recommendations(
        &self,
        user_id: &str,
    ) -> Result<RecommendationsResponse, RecommendationError> {
        let requester = self.require_profile(user_id).await?;

        let liked_ids = self.store.liked_ids(user_id).await?;
        let liked = self.store.get_profiles(&liked_ids).await?;
        let candidates = self.store.candidate_pool(user_id, &liked_ids).await?;

        tracing::debug!(
            "Ranking {} candidates for {} ({} liked profiles resolved)",
            candidates.len(),
            user_id,
            liked.len()
        );

        let result = self.matcher.rank(&requester, &liked, candidates);

        match result.base {
            BaseVectorSource::Own => {
                tracing::debug!("Using own profile as base vector for {}", user_id)
            }
            BaseVectorSource::Centroid(n) => {
                tracing::debug!("Using centroid of {} liked profiles for {}", n, user_id)
            }
        }

        tracing::info!(
            "Returning {} recommendations for user {}",
            result.recommendations.len(),
            user_id
        );

        Ok(RecommendationsResponse {
            base_gender: requester.gender.unwrap_or_default(),
            recommendations: result.recommendations,
        })
    }

    /// Like a profile, or unlike it if already liked
    pub async fn toggle_like(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> Result<LikeToggle, RecommendationError> {
        if user_id == target_id {
            return Err(RecommendationError::SelfLike);
        }

        let outcome = self
            .store
            .toggle_like(user_id, target_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound(_) => RecommendationError::NotFound(user_id.to_string()),
                other => RecommendationError::Store(other),
            })?;
        tracing::debug!("{}: {} -> {}", outcome.message(), user_id, target_id);

        Ok(outcome)
    }

    /// Profiles the user has liked, oldest first; dangling likes are skipped
    pub async fn liked_profiles(&self, user_id: &str) -> Result<Vec<Profile>, RecommendationError> {
        self.require_profile(user_id).await?;

        let liked_ids = self.store.liked_ids(user_id).await?;
        Ok(self.store.get_profiles(&liked_ids).await?)
    }
}
