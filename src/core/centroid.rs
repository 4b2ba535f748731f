use crate::core::vectorizer::Vectorizer;
use crate::models::{FeatureVector, Profile};

/// Element-wise mean of a set of vectors
///
/// Returns `None` for an empty input. All vectors are expected to share the
/// length of the first one; shorter vectors contribute 0 to missing slots.
pub fn compute_centroid(vectors: &[FeatureVector]) -> Option<FeatureVector> {
    let first = vectors.first()?;
    let dim = first.len();

    let mut acc = vec![0.0_f64; dim];
    for vector in vectors {
        debug_assert_eq!(vector.len(), dim, "all vectors must have the same dimension");
        for (slot, value) in acc.iter_mut().zip(vector.as_slice()) {
            *slot += value;
        }
    }

    let n = vectors.len() as f64;
    for slot in &mut acc {
        *slot /= n;
    }

    Some(FeatureVector(acc))
}

/// Centroid of the vectors of several profiles
pub fn profile_centroid(vectorizer: &Vectorizer, profiles: &[Profile]) -> Option<FeatureVector> {
    let vectors: Vec<FeatureVector> = profiles.iter().map(|p| vectorizer.vectorize(p)).collect();
    compute_centroid(&vectors)
}
