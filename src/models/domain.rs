use serde::{Deserialize, Serialize};

/// Placeholder image served when a profile has no picture
pub const DEFAULT_PROFILE_PICTURE: &str = "/default_profile.png";

/// Student profile with display data and matchable lifestyle attributes
///
/// Every matchable attribute is optional. Missing values encode to zero in the
/// feature vector instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "isVerified", default)]
    pub is_verified: Option<bool>,
    #[serde(rename = "isProfileComplete", default)]
    pub is_profile_complete: bool,

    #[serde(default)]
    pub campus: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "foodPreference", default)]
    pub food_preference: Option<String>,
    #[serde(rename = "socialPreference", default)]
    pub social_preference: Option<String>,
    #[serde(rename = "sleepSchedule", default)]
    pub sleep_schedule: Option<String>,
    #[serde(rename = "studyStyle", default)]
    pub study_style: Option<String>,
    #[serde(default)]
    pub smoking: Option<bool>,
    #[serde(default)]
    pub drinking: Option<bool>,
    #[serde(rename = "guestFriendly", default)]
    pub guest_friendly: Option<bool>,
    #[serde(default)]
    pub hobbies: Option<String>,
    #[serde(rename = "languagesSpoken", default)]
    pub languages_spoken: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
}

impl Profile {
    /// Empty profile with only an id, everything else unset
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Helper to get is_verified as a bool, defaulting to false
    pub fn verified(&self) -> bool {
        self.is_verified.unwrap_or(false)
    }
}

/// Weighted numeric encoding of a profile
///
/// Only vectors built by the same vectorizer configuration are comparable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector(pub Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every component is zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|x| *x == 0.0)
    }
}

/// Where the base vector of a ranking came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseVectorSource {
    /// Requester's own profile (cold start)
    Own,
    /// Centroid of this many liked profiles
    Centroid(usize),
}

/// A candidate scored against the base vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoommateRecommendation {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(rename = "profilePicture")]
    pub profile_picture: String,
    pub gender: Option<String>,
    pub campus: Option<String>,
    pub budget: Option<f64>,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
    pub status: Option<String>,
    pub bio: String,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u8,
}

/// Outcome of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeToggle {
    pub fn message(&self) -> &'static str {
        match self {
            LikeToggle::Liked => "Profile liked",
            LikeToggle::Unliked => "Profile unliked",
        }
    }
}
