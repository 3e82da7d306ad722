use crate::algorithms::common::SlidingDotProduct;
use crate::core::matrix_profile::MatrixProfileConfig;
use crate::core::numeric::{correlation_to_distance, degenerate_distance};
use crate::core::rolling_stats::RollingStats;
use crate::error::Result;

/// Z-normalized Euclidean distance profiles for a single series (MASS).
///
/// Owns the rolling statistics of `(series, m)` and a sliding dot product over
/// a sanitized copy of the series (non-finite values replaced by 0). On large
/// inputs the series spectrum is computed once and shared by every query.
///
/// Distance formula: `d = sqrt(2 * m * (1 - r))` where
/// `r = (QT - m * mu_i * mu_j) / (m * sigma_i * sigma_j)`.
///
/// Edge cases:
/// - Either window holds NaN/inf → `+inf`
/// - Either window has zero variance → `2 * sqrt(m)`
/// - `r` is clamped to [-1, 1] for numerical stability
pub struct DistanceProfileEngine {
    sdp: SlidingDotProduct,
    stats: RollingStats,
}

impl DistanceProfileEngine {
    /// Build the engine, validating `m` against the series length.
    pub fn new(series: &[f64], m: usize) -> Result<Self> {
        MatrixProfileConfig::new(m).validate(series.len())?;
        Ok(Self::new_unchecked(series, m))
    }

    pub(crate) fn new_unchecked(series: &[f64], m: usize) -> Self {
        let sanitized: Vec<f64> = series
            .iter()
            .map(|&x| if x.is_finite() { x } else { 0.0 })
            .collect();
        let sdp = SlidingDotProduct::new(sanitized, m);
        tracing::trace!(n = series.len(), m, fft = sdp.uses_fft(), "distance profile engine");
        Self {
            stats: RollingStats::compute(series, m),
            sdp,
        }
    }

    /// Subsequence length.
    pub fn m(&self) -> usize {
        self.sdp.m()
    }

    /// Number of subsequences, `n - m + 1`.
    pub fn n_subs(&self) -> usize {
        self.stats.len()
    }

    /// The sanitized series the dot products run on.
    pub fn series(&self) -> &[f64] {
        self.sdp.series()
    }

    pub fn stats(&self) -> &RollingStats {
        &self.stats
    }

    /// Dot products of window `q` against every window.
    pub fn dot_products(&self, q: usize) -> Vec<f64> {
        let m = self.m();
        self.sdp.compute(&self.series()[q..q + m])
    }

    /// Convert the dot product of windows `i` and `j` to their distance.
    #[inline]
    pub fn qt_to_distance(&self, qt: f64, i: usize, j: usize) -> f64 {
        let s = &self.stats;
        if !s.finite[i] || !s.finite[j] {
            return f64::INFINITY;
        }
        let m = self.m();
        let msi = s.m_sigma_inv[i];
        let msj = s.m_sigma_inv[j];
        if msi == 0.0 || msj == 0.0 {
            return degenerate_distance(m);
        }
        // m_sigma_inv = 1/(sqrt(m)*sigma), so the product is 1/(m*sigma_i*sigma_j)
        let r = (qt - m as f64 * s.mean[i] * s.mean[j]) * msi * msj;
        correlation_to_distance(r, m)
    }

    /// Fill `out` with the distances of window `q` given its dot products.
    pub fn distances_from_qt(&self, q: usize, qt: &[f64], out: &mut [f64]) {
        debug_assert_eq!(qt.len(), out.len());
        for (j, (d, &v)) in out.iter_mut().zip(qt).enumerate() {
            *d = self.qt_to_distance(v, q, j);
        }
    }

    /// Distance profile of window `q` against every window, itself included.
    ///
    /// The self-match is not suppressed; callers apply their exclusion zone.
    pub fn profile(&self, q: usize) -> Vec<f64> {
        let n_subs = self.n_subs();
        if !self.stats.is_finite(q) {
            return vec![f64::INFINITY; n_subs];
        }

        match self.stats.std_at(q) {
            Err(err) => {
                tracing::trace!(%err, "degenerate query window, using fallback distance");
                let fallback = degenerate_distance(self.m());
                (0..n_subs)
                    .map(|i| {
                        if self.stats.is_finite(i) {
                            fallback
                        } else {
                            f64::INFINITY
                        }
                    })
                    .collect()
            }
            Ok(_) => {
                let qt = self.dot_products(q);
                let mut profile = vec![0.0; n_subs];
                self.distances_from_qt(q, &qt, &mut profile);
                profile
            }
        }
    }

    /// Direct O(m) distance between windows `i` and `j`.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        let m = self.m();
        let ts = self.series();
        let qt: f64 = ts[i..i + m]
            .iter()
            .zip(&ts[j..j + m])
            .map(|(a, b)| a * b)
            .sum();
        self.qt_to_distance(qt, i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MotifError;

    fn engine(ts: &[f64], m: usize) -> DistanceProfileEngine {
        DistanceProfileEngine::new_unchecked(ts, m)
    }

    #[test]
    fn test_profile_self_match() {
        let ts: Vec<f64> = (0..200)
            .map(|i| (i as f64 * 2.0 * std::f64::consts::PI / 50.0).sin())
            .collect();
        let e = DistanceProfileEngine::new(&ts, 30).unwrap();
        let dp = e.profile(50);
        assert_eq!(dp.len(), ts.len() - 30 + 1);
        assert!(dp[50] < 1e-6, "Self-match distance should be ~0, got {}", dp[50]);
        // One period later the shape repeats
        assert!(dp[100] < 1e-6, "Periodic match should be ~0, got {}", dp[100]);
    }

    #[test]
    fn test_distance_shifted_linear() {
        // [1,2,3,4] vs [3,4,5,6]: same shape, just shifted → d ≈ 0
        let ts = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let e = engine(&ts, 4);
        assert!(e.distance(0, 2) < 1e-6);
    }

    #[test]
    fn test_qt_to_distance_hand_computed() {
        // ts = [1, 2, 3, 4], m = 2
        // [1,2] (mu=1.5, std=0.5), [2,3] (mu=2.5, std=0.5)
        // QT(0,1) = 8, r = (8 - 2*1.5*2.5) / (2*0.5*0.5) = 1.0 → d = 0
        let ts = vec![1.0, 2.0, 3.0, 4.0];
        let e = engine(&ts, 2);
        let d = e.qt_to_distance(8.0, 0, 1);
        assert!(d < 1e-7, "Hand-computed: d should be ~0, got {d}");
    }

    #[test]
    fn test_qt_to_distance_anticorrelated() {
        // ts = [1, 2, 4, 3], m = 2
        // [1,2] z-norm: [-1, 1], [4,3] z-norm: [1, -1]
        // QT(0,2) = 10, r = (10 - 2*1.5*3.5) / 0.5 = -1 → d = sqrt(8)
        let ts = vec![1.0, 2.0, 4.0, 3.0];
        let e = engine(&ts, 2);
        let d = e.qt_to_distance(10.0, 0, 2);
        assert!((d - 8.0_f64.sqrt()).abs() < 1e-10, "got {d}");
    }

    #[test]
    fn test_degenerate_windows_use_fallback() {
        // [5,5,5,5] vs [1,2,3,4]: one constant
        let ts = vec![5.0, 5.0, 5.0, 5.0, 1.0, 2.0, 3.0, 4.0];
        let e = engine(&ts, 4);
        let fallback = degenerate_distance(4);
        assert!((e.distance(0, 4) - fallback).abs() < 1e-12);
        assert!((e.distance(4, 0) - fallback).abs() < 1e-12);

        // Query window 0 is constant → every finite window gets the fallback
        let dp = e.profile(0);
        assert!(dp.iter().all(|&d| (d - fallback).abs() < 1e-12));
        assert_eq!(
            e.stats().std_at(0),
            Err(MotifError::DegenerateWindow { index: 0 })
        );
    }

    #[test]
    fn test_two_constant_windows_are_not_a_match() {
        let ts = vec![3.0; 12];
        let e = engine(&ts, 4);
        assert!((e.distance(0, 6) - degenerate_distance(4)).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_windows_are_infinite() {
        let mut ts: Vec<f64> = (0..40).map(|i| (i as f64 * 0.4).sin()).collect();
        ts[20] = f64::NAN;
        let e = engine(&ts, 5);
        let dp = e.profile(0);
        for (i, &d) in dp.iter().enumerate() {
            if (16..=20).contains(&i) {
                assert!(d.is_infinite(), "window {i} touches NaN, got {d}");
            } else {
                assert!(d.is_finite(), "window {i} should be finite");
            }
        }
        assert!(e.profile(18).iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_profile_matches_direct_distance() {
        let ts: Vec<f64> = (0..120)
            .map(|i| (i as f64 * 0.3).sin() + 0.5 * (i as f64 * 0.07).cos())
            .collect();
        let e = engine(&ts, 12);
        let dp = e.profile(33);
        for (j, &d) in dp.iter().enumerate() {
            assert!((d - e.distance(33, j)).abs() < 1e-8, "mismatch at {j}");
            assert!(d >= 0.0);
        }
    }

    #[test]
    fn test_profile_on_fft_path() {
        // n * m is above the FFT threshold, so queries use the cached spectrum
        let n = 9_000;
        let m = 40;
        let ts: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64;
                (t * 0.013).sin() + 0.4 * (t * 0.171).cos() + 0.2 * ((t * 0.0007).powi(2)).sin()
            })
            .collect();
        let e = DistanceProfileEngine::new(&ts, m).unwrap();
        assert!(e.sdp.uses_fft());

        for q in [0, 4_321, n - m] {
            let dp = e.profile(q);
            assert_eq!(dp.len(), n - m + 1);
            for (j, &d) in dp.iter().enumerate() {
                let direct = e.distance(q, j);
                assert!(
                    (d - direct).abs() < 1e-4,
                    "q={q} j={j}: fft={d}, direct={direct}"
                );
            }
            assert!(dp[q] < 1e-4, "self-match at {q} is {}", dp[q]);
        }
    }

    #[test]
    fn test_new_validates_window() {
        let ts = vec![1.0; 10];
        assert!(matches!(
            DistanceProfileEngine::new(&ts, 6),
            Err(MotifError::InvalidWindow { m: 6, max: 5 })
        ));
    }
}
