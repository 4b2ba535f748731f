// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Profile, FeatureVector, BaseVectorSource, RoommateRecommendation, LikeToggle, DEFAULT_PROFILE_PICTURE};
pub use requests::{RecommendationsQuery, LikedProfilesQuery, ToggleLikeRequest};
pub use responses::{RecommendationsResponse, ToggleLikeResponse, HealthResponse, ErrorResponse};
