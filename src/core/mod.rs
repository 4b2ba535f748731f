// Core algorithm exports
pub mod centroid;
pub mod matcher;
pub mod similarity;
pub mod vectorizer;

pub use centroid::{compute_centroid, profile_centroid};
pub use matcher::{Matcher, MatchResult, MatchingOptions, truncate_bio};
pub use similarity::{cosine_similarity, compatibility_score};
pub use vectorizer::{Vectorizer, FieldWeights, ProfileField, CategoricalEncoding, CategoryVocabulary};
