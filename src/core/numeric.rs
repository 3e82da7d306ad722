//! Floating-point guards shared by the rolling statistics and the distance engine.
//!
//! Every clamp applied on the way from raw sums to a z-normalized distance
//! lives here so the two engines cannot drift apart.

/// Clamp a variance computed as `E[X^2] - E[X]^2` to be non-negative.
#[inline]
pub fn clamp_variance(var: f64) -> f64 {
    var.max(0.0)
}

/// Clamp a Pearson correlation to `[-1, 1]`.
#[inline]
pub fn clamp_correlation(r: f64) -> f64 {
    r.clamp(-1.0, 1.0)
}

/// Convert a Pearson correlation into a z-normalized Euclidean distance.
///
/// `d = sqrt(max(0, 2 * m * (1 - r)))` with `r` clamped first.
#[inline]
pub fn correlation_to_distance(r: f64, m: usize) -> f64 {
    (2.0 * m as f64 * (1.0 - clamp_correlation(r))).max(0.0).sqrt()
}

/// Distance reported for any pair involving a zero-variance window.
///
/// This is `2 * sqrt(m)`, the largest value a z-normalized distance can take,
/// so degenerate windows sort after every real match but stay finite.
#[inline]
pub fn degenerate_distance(m: usize) -> f64 {
    2.0 * (m as f64).sqrt()
}
