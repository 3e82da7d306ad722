use crate::core::numeric::clamp_variance;
use crate::error::{MotifError, Result};

/// Rolling mean and standard deviation for all subsequences of length `m`.
///
/// Computed in one pass with a running sum and sum-of-squares: each step
/// subtracts the outgoing element and adds the incoming one.
///
/// Two masks travel alongside the moments:
/// - `degenerate[i]`: every value in the window is equal (or the computed
///   variance underflowed to exactly zero). `std[i]` is 0 and
///   `m_sigma_inv[i]` is 0.
/// - `finite[i]`: the window holds no NaN/inf. Non-finite values count as 0 in
///   the running sums so they do not poison neighboring windows; the moments of
///   a non-finite window are NaN.
#[derive(Debug, Clone)]
pub struct RollingStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    /// Precomputed `1 / (sqrt(m) * sigma)` for each subsequence.
    /// Zero for degenerate and non-finite subsequences, so that
    /// `r = (QT - m*mu_i*mu_j) * m_sigma_inv[i] * m_sigma_inv[j]`.
    pub m_sigma_inv: Vec<f64>,
    pub degenerate: Vec<bool>,
    pub finite: Vec<bool>,
    pub has_degenerate: bool,
    pub has_non_finite: bool,
}

impl RollingStats {
    /// Compute rolling statistics for subsequences of length `m`.
    ///
    /// # Panics
    /// Panics if `m == 0` or `ts.len() < m`.
    pub fn compute(ts: &[f64], m: usize) -> Self {
        assert!(m > 0, "Subsequence length must be > 0");
        assert!(ts.len() >= m, "Time series must be at least as long as m");

        let n = ts.len();
        let n_subs = n - m + 1;
        let m_f = m as f64;
        let sqrt_m = m_f.sqrt();

        let value = |x: f64| if x.is_finite() { x } else { 0.0 };

        // run_end[k] = last index of the run of equal values starting at k
        let mut run_end = vec![n - 1; n];
        for k in (0..n - 1).rev() {
            run_end[k] = if ts[k] == ts[k + 1] { run_end[k + 1] } else { k };
        }

        let mut sum: f64 = ts[..m].iter().map(|&x| value(x)).sum();
        let mut sum_sq: f64 = ts[..m].iter().map(|&x| value(x) * value(x)).sum();
        let mut non_finite = ts[..m].iter().filter(|x| !x.is_finite()).count();

        let mut mean = vec![0.0; n_subs];
        let mut std = vec![0.0; n_subs];
        let mut m_sigma_inv = vec![0.0; n_subs];
        let mut degenerate = vec![false; n_subs];
        let mut finite = vec![true; n_subs];

        for i in 0..n_subs {
            if i > 0 {
                let outgoing = ts[i - 1];
                let incoming = ts[i + m - 1];
                let (out_v, in_v) = (value(outgoing), value(incoming));
                sum += in_v - out_v;
                sum_sq += in_v * in_v - out_v * out_v;
                if !outgoing.is_finite() {
                    non_finite -= 1;
                }
                if !incoming.is_finite() {
                    non_finite += 1;
                }
            }

            if non_finite > 0 {
                finite[i] = false;
                mean[i] = f64::NAN;
                std[i] = f64::NAN;
                continue;
            }

            if run_end[i] >= i + m - 1 {
                // Exactly constant window: moments are known without round-off.
                mean[i] = ts[i];
                degenerate[i] = true;
                continue;
            }

            let mu = sum / m_f;
            let sigma = clamp_variance(sum_sq / m_f - mu * mu).sqrt();
            mean[i] = mu;
            std[i] = sigma;
            let inv = 1.0 / (sqrt_m * sigma);
            if sigma > 0.0 && inv.is_finite() {
                m_sigma_inv[i] = inv;
            } else {
                std[i] = 0.0;
                degenerate[i] = true;
            }
        }

        let has_degenerate = degenerate.iter().any(|&d| d);
        let has_non_finite = finite.iter().any(|&f| !f);
        if has_degenerate || has_non_finite {
            tracing::debug!(
                m,
                degenerate = degenerate.iter().filter(|&&d| d).count(),
                non_finite = finite.iter().filter(|&&f| !f).count(),
                "rolling statistics contain windows without a defined z-normalization"
            );
        }

        Self {
            mean,
            std,
            m_sigma_inv,
            degenerate,
            finite,
            has_degenerate,
            has_non_finite,
        }
    }

    /// Number of subsequences covered.
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Standard deviation of window `i`.
    ///
    /// Fails with [`MotifError::DegenerateWindow`] for zero-variance windows.
    /// Non-finite windows are not degenerate and yield `Ok(NaN)`; check
    /// [`RollingStats::is_finite`] first.
    pub fn std_at(&self, i: usize) -> Result<f64> {
        if self.degenerate[i] {
            Err(MotifError::DegenerateWindow { index: i })
        } else {
            Ok(self.std[i])
        }
    }

    #[inline]
    pub fn is_finite(&self, i: usize) -> bool {
        self.finite[i]
    }

    #[inline]
    pub fn is_degenerate(&self, i: usize) -> bool {
        self.degenerate[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_stats_simple() {
        // ts = [1, 2, 3, 4, 5], m = 3
        // Subsequences: [1,2,3], [2,3,4], [3,4,5]
        // Means: 2, 3, 4
        // Stds: sqrt(2/3), sqrt(2/3), sqrt(2/3)
        let ts = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = RollingStats::compute(&ts, 3);

        assert_eq!(stats.len(), 3);
        assert!((stats.mean[0] - 2.0).abs() < 1e-10);
        assert!((stats.mean[1] - 3.0).abs() < 1e-10);
        assert!((stats.mean[2] - 4.0).abs() < 1e-10);

        let expected_std = (2.0_f64 / 3.0).sqrt();
        for s in &stats.std {
            assert!((s - expected_std).abs() < 1e-10);
        }
        assert!(!stats.has_degenerate);
        assert!(!stats.has_non_finite);
    }

    #[test]
    fn test_rolling_stats_constant() {
        let ts = vec![5.0; 10];
        let stats = RollingStats::compute(&ts, 4);
        for mu in &stats.mean {
            assert!((mu - 5.0).abs() < 1e-10);
        }
        for (i, s) in stats.std.iter().enumerate() {
            assert_eq!(*s, 0.0);
            assert_eq!(stats.m_sigma_inv[i], 0.0);
        }
        assert!(stats.has_degenerate);
        assert_eq!(
            stats.std_at(2),
            Err(MotifError::DegenerateWindow { index: 2 })
        );
    }

    #[test]
    fn test_running_sums_match_direct() {
        let ts: Vec<f64> = (0..300)
            .map(|i| (i as f64 * 0.13).sin() * 4.0 + (i as f64 * 0.01))
            .collect();
        let m = 17;
        let stats = RollingStats::compute(&ts, m);

        for i in 0..stats.len() {
            let w = &ts[i..i + m];
            let mu = w.iter().sum::<f64>() / m as f64;
            let var = w.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / m as f64;
            assert!((stats.mean[i] - mu).abs() < 1e-9, "mean mismatch at {i}");
            assert!(
                (stats.std[i] - var.sqrt()).abs() < 1e-7,
                "std mismatch at {i}"
            );
        }
    }

    #[test]
    fn test_constant_run_inside_series() {
        // Only the window [0, 0, 0] is constant.
        let ts = vec![1.0, 0.0, 0.0, 0.0, 2.0, 3.0];
        let stats = RollingStats::compute(&ts, 3);
        let degenerate: Vec<usize> = (0..stats.len())
            .filter(|&i| stats.is_degenerate(i))
            .collect();
        assert_eq!(degenerate, vec![1]);
        assert!(stats.std_at(0).is_ok());
    }

    #[test]
    fn test_non_finite_windows() {
        let ts = vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0, 7.0];
        let stats = RollingStats::compute(&ts, 2);
        // Windows 1 and 2 touch the NaN
        assert!(stats.is_finite(0));
        assert!(!stats.is_finite(1));
        assert!(!stats.is_finite(2));
        assert!(stats.is_finite(3));
        assert!(stats.has_non_finite);
        // Windows after the NaN are unaffected by it
        assert!((stats.mean[3] - 4.5).abs() < 1e-12);
        assert!((stats.std[5] - 0.5).abs() < 1e-12);
        assert_eq!(stats.m_sigma_inv[1], 0.0);
    }
}
