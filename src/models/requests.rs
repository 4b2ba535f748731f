use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationsQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Query for the liked profiles endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikedProfilesQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Request to like or unlike a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ToggleLikeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}
