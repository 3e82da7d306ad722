use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

/// Size threshold (n * m) above which we dispatch to the FFT path.
/// Below this, the naive O(n*m) loop wins due to lower constant overhead.
const FFT_THRESHOLD: usize = 256 * 1024;

/// Sliding dot product of arbitrary queries of length `m` against one series.
///
/// Element `i` of [`SlidingDotProduct::compute`] is `dot(q, ts[i..i+m])`.
/// On the FFT path the series spectrum is computed once at construction and
/// reused by every query, so each further query costs one forward and one
/// inverse transform.
pub struct SlidingDotProduct {
    ts: Vec<f64>,
    m: usize,
    fft: Option<FftPlan>,
}

struct FftPlan {
    len: usize,
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
    ts_spectrum: Vec<Complex<f64>>,
}

impl SlidingDotProduct {
    /// Choose the FFT or the naive path from the problem size.
    pub fn new(ts: Vec<f64>, m: usize) -> Self {
        if ts.len() * m > FFT_THRESHOLD {
            Self::with_fft(ts, m)
        } else {
            Self::naive(ts, m)
        }
    }

    /// Always use the naive O(n*m) loop.
    pub fn naive(ts: Vec<f64>, m: usize) -> Self {
        assert!(m > 0 && ts.len() >= m, "Time series shorter than query");
        Self { ts, m, fft: None }
    }

    /// Always use the FFT path.
    pub fn with_fft(ts: Vec<f64>, m: usize) -> Self {
        assert!(m > 0 && ts.len() >= m, "Time series shorter than query");
        let n = ts.len();
        let fft_len = (n + m - 1).next_power_of_two();

        let mut planner = RealFftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);

        let mut ts_padded = forward.make_input_vec();
        ts_padded[..n].copy_from_slice(&ts);
        let mut ts_spectrum = forward.make_output_vec();
        forward
            .process(&mut ts_padded, &mut ts_spectrum)
            .expect("buffers come from the planner");

        Self {
            ts,
            m,
            fft: Some(FftPlan {
                len: fft_len,
                forward,
                inverse,
                ts_spectrum,
            }),
        }
    }

    /// The series the queries slide over.
    pub fn series(&self) -> &[f64] {
        &self.ts
    }

    /// Subsequence length.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Whether queries run through the cached FFT.
    pub fn uses_fft(&self) -> bool {
        self.fft.is_some()
    }

    /// Number of dot products per query: `ts.len() - m + 1`.
    pub fn output_len(&self) -> usize {
        self.ts.len() - self.m + 1
    }

    /// Dot products of `query` against every window of the series.
    pub fn compute(&self, query: &[f64]) -> Vec<f64> {
        assert_eq!(query.len(), self.m, "Query length must equal m");
        match &self.fft {
            Some(plan) => self.compute_fft(plan, query),
            None => sliding_dot_product_naive(query, &self.ts),
        }
    }

    /// Cross-correlation via convolution of the reversed query with the series.
    fn compute_fft(&self, plan: &FftPlan, query: &[f64]) -> Vec<f64> {
        let m = self.m;

        let mut q_padded = plan.forward.make_input_vec();
        for (dst, &src) in q_padded.iter_mut().zip(query.iter().rev()) {
            *dst = src;
        }
        let mut spectrum = plan.forward.make_output_vec();
        plan.forward
            .process(&mut q_padded, &mut spectrum)
            .expect("buffers come from the planner");

        for (q_val, ts_val) in spectrum.iter_mut().zip(plan.ts_spectrum.iter()) {
            *q_val *= ts_val;
        }

        let mut result = plan.inverse.make_output_vec();
        plan.inverse
            .process(&mut spectrum, &mut result)
            .expect("buffers come from the planner");

        // realfft inverse is unnormalized
        let norm = 1.0 / plan.len as f64;
        result[m - 1..m - 1 + self.output_len()]
            .iter()
            .map(|&x| x * norm)
            .collect()
    }
}

/// Sliding dot product of `q` against `ts`, dispatching on problem size.
pub fn sliding_dot_product(q: &[f64], ts: &[f64]) -> Vec<f64> {
    SlidingDotProduct::new(ts.to_vec(), q.len()).compute(q)
}

/// Naive O(n*m) sliding dot product.
pub fn sliding_dot_product_naive(q: &[f64], ts: &[f64]) -> Vec<f64> {
    let m = q.len();
    assert!(ts.len() >= m, "Time series shorter than query");
    ts.windows(m)
        .map(|w| q.iter().zip(w).map(|(a, b)| a * b).sum())
        .collect()
}

/// Apply an exclusion zone around index `idx`, setting entries within the zone to infinity.
///
/// The zone covers indices `[idx - zone, idx + zone]` (clamped to bounds).
#[inline]
pub fn apply_exclusion_zone(profile: &mut [f64], idx: usize, zone: usize) {
    let start = idx.saturating_sub(zone);
    let end = (idx + zone + 1).min(profile.len());
    if start < end {
        profile[start..end].fill(f64::INFINITY);
    }
}
