use rayon::prelude::*;

use crate::models::{
    BaseVectorSource, FeatureVector, Profile, RoommateRecommendation, DEFAULT_PROFILE_PICTURE,
};
use crate::core::{
    centroid::profile_centroid,
    similarity::{compatibility_score, cosine_similarity},
    vectorizer::Vectorizer,
};

/// Liked profiles needed before the centroid replaces the requester's own vector
pub const DEFAULT_CENTROID_THRESHOLD: usize = 5;

/// Pool size from which candidates are vectorized in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

/// Bios longer than this are cut and suffixed with "..."
pub const DEFAULT_BIO_MAX_LEN: usize = 120;

/// Tunables for ranking and result shaping
#[derive(Debug, Clone)]
pub struct MatchingOptions {
    pub centroid_threshold: usize,
    pub parallel_threshold: usize,
    pub bio_max_len: usize,
    pub default_profile_picture: String,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            centroid_threshold: DEFAULT_CENTROID_THRESHOLD,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            bio_max_len: DEFAULT_BIO_MAX_LEN,
            default_profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
        }
    }
}

/// Result of the ranking process
#[derive(Debug)]
pub struct MatchResult {
    pub recommendations: Vec<RoommateRecommendation>,
    pub base: BaseVectorSource,
    pub total_candidates: usize,
}

/// Roommate ranker
///
/// # Pipeline
/// 1. Base vector: centroid of liked profiles, or the requester's own vector
///    when there are too few likes (cold start)
/// 2. Cosine similarity of every candidate against the base vector
/// 3. Stable sort by compatibility score, descending
///
/// Candidates with equal scores keep their pool order.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    vectorizer: Vectorizer,
    options: MatchingOptions,
}

impl Matcher {
    pub fn new(vectorizer: Vectorizer, options: MatchingOptions) -> Self {
        Self { vectorizer, options }
    }

    pub fn with_default_weights() -> Self {
        Self::default()
    }

    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    pub fn options(&self) -> &MatchingOptions {
        &self.options
    }

    /// Pick the vector candidates are compared against
    pub fn base_vector(&self, requester: &Profile, liked: &[Profile]) -> (FeatureVector, BaseVectorSource) {
        if liked.len() >= self.options.centroid_threshold {
            if let Some(centroid) = profile_centroid(&self.vectorizer, liked) {
                return (centroid, BaseVectorSource::Centroid(liked.len()));
            }
        }
        (self.vectorizer.vectorize(requester), BaseVectorSource::Own)
    }

    /// Compatibility of a single candidate against a base vector
    #[inline]
    pub fn score(&self, base: &FeatureVector, candidate: &Profile) -> u8 {
        let vector = self.vectorizer.vectorize(candidate);
        compatibility_score(cosine_similarity(base.as_slice(), vector.as_slice()))
    }

    /// Rank a candidate pool for a requester
    ///
    /// # Arguments
    /// * `requester` - The profile asking for recommendations
    /// * `liked` - Profiles the requester has liked, already resolved
    /// * `candidates` - Pool to rank; the caller excludes the requester and liked profiles
    ///
    /// # Returns
    /// MatchResult with every candidate, best first
    pub fn rank(&self, requester: &Profile, liked: &[Profile], candidates: Vec<Profile>) -> MatchResult {
        let total_candidates = candidates.len();
        let (base, source) = self.base_vector(requester, liked);

        let scores: Vec<u8> = if total_candidates >= self.options.parallel_threshold {
            candidates.par_iter().map(|c| self.score(&base, c)).collect()
        } else {
            candidates.iter().map(|c| self.score(&base, c)).collect()
        };

        let mut recommendations: Vec<RoommateRecommendation> = candidates
            .into_iter()
            .zip(scores)
            .map(|(candidate, score)| self.to_recommendation(candidate, score))
            .collect();

        // sort_by is stable, ties stay in pool order
        recommendations.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));

        MatchResult {
            recommendations,
            base: source,
            total_candidates,
        }
    }

    fn to_recommendation(&self, profile: Profile, compatibility_score: u8) -> RoommateRecommendation {
        let is_verified = profile.verified();
        let bio = truncate_bio(profile.bio.as_deref(), self.options.bio_max_len);

        RoommateRecommendation {
            id: profile.id,
            full_name: profile.full_name,
            profile_picture: profile
                .profile_picture
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| self.options.default_profile_picture.clone()),
            gender: profile.gender,
            campus: profile.campus,
            budget: profile.budget,
            is_verified,
            status: profile.status,
            bio,
            compatibility_score,
        }
    }
}

/// Cut a bio to `max_len` characters, appending "..." when shortened
pub fn truncate_bio(bio: Option<&str>, max_len: usize) -> String {
    let bio = match bio {
        Some(b) if !b.is_empty() => b,
        _ => return String::new(),
    };

    if bio.chars().count() <= max_len {
        return bio.to_string();
    }

    let mut cut: String = bio.chars().take(max_len).collect();
    cut.push_str("...");
    cut
}
