pub mod algorithms;
pub mod core;
pub mod error;

pub use crate::algorithms::distance_profile::DistanceProfileEngine;
pub use crate::algorithms::motifs::{
    extract_motifs, find_motifs, Motif, MotifConfig, MotifExtractor, Step,
};
pub use crate::algorithms::stomp::{matrix_profile_naive, stomp, stomp_cancellable, stomp_serial};
pub use crate::core::exclusion::ExclusionSet;
pub use crate::core::matrix_profile::{MatrixProfile, MatrixProfileConfig};
pub use crate::core::rolling_stats::RollingStats;
pub use crate::error::{MotifError, Result};

use std::sync::atomic::AtomicBool;

/// High-level facade: matrix profile computation followed by motif extraction.
///
/// # Examples
///
/// ```
/// use mp_motifs::{Engine, MatrixProfileConfig, MotifConfig};
///
/// let ts = vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0];
/// let engine = Engine::new(MatrixProfileConfig::new(4));
/// let mp = engine.compute(&ts).unwrap();
/// assert_eq!(mp.profile.len(), ts.len() - 4 + 1);
///
/// let motifs = engine.find_motifs(&ts, &mp, &MotifConfig::new(2, 1)).unwrap();
/// assert!(motifs.len() <= 1);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: MatrixProfileConfig,
}

impl Engine {
    /// Create a new engine with the given configuration.
    pub fn new(config: MatrixProfileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatrixProfileConfig {
        &self.config
    }

    /// Compute the full matrix profile for a time series (STOMP).
    pub fn compute(&self, ts: &[f64]) -> Result<MatrixProfile> {
        stomp(ts, &self.config)
    }

    /// [`Engine::compute`] that stops with [`MotifError::Cancelled`] once
    /// `cancel` is set.
    pub fn compute_cancellable(&self, ts: &[f64], cancel: &AtomicBool) -> Result<MatrixProfile> {
        stomp_cancellable(ts, &self.config, cancel)
    }

    /// Extract motifs from a profile produced by this engine.
    pub fn find_motifs(
        &self,
        ts: &[f64],
        mp: &MatrixProfile,
        motif_config: &MotifConfig,
    ) -> Result<Vec<Motif>> {
        if mp.m != self.config.m {
            return Err(MotifError::ProfileMismatch {
                expected: self.config.m,
                got: mp.m,
            });
        }
        find_motifs(ts, mp, motif_config)
    }
}

/// Matrix profile of `series` with window length `m` and default settings.
///
/// # Errors
/// [`MotifError::InvalidWindow`] unless `2 <= m <= series.len() / 2`, or
/// [`MotifError::InsufficientLength`] for series too short to compare.
pub fn compute_matrix_profile(series: &[f64], m: usize) -> Result<MatrixProfile> {
    stomp(series, &MatrixProfileConfig::new(m))
}
