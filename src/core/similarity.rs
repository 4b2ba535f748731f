/// Cosine similarity between two vectors
///
/// Returns a value in `[-1.0, 1.0]`. Returns `0.0` when either vector has zero
/// magnitude or the vectors differ in length.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut mag_a = 0.0_f64;
    let mut mag_b = 0.0_f64;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a.sqrt() * mag_b.sqrt())
}

/// Map a similarity onto the 0-100 compatibility scale
///
/// `round(similarity * 100)`, floored at 0 for opposing vectors and capped at
/// 100 against float drift above 1.
#[inline]
pub fn compatibility_score(similarity: f64) -> u8 {
    if !similarity.is_finite() {
        return 0;
    }
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
