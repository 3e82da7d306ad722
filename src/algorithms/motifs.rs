use serde::{Deserialize, Serialize};

use crate::algorithms::distance_profile::DistanceProfileEngine;
use crate::core::exclusion::ExclusionSet;
use crate::core::matrix_profile::MatrixProfile;
use crate::error::{MotifError, Result};

/// Parameters of greedy motif extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotifConfig {
    /// Maximum neighbors reported per motif, the representative excluded.
    pub max_matches: usize,
    /// Maximum number of motifs.
    pub max_motifs: usize,
    /// Neighbors farther than `tolerance` times the first neighbor's distance
    /// are dropped. Must be >= 1.
    pub tolerance: f64,
    /// Absolute ceiling on neighbor distance.
    pub max_distance: Option<f64>,
    /// Representatives whose matrix profile value exceeds this stop the search.
    pub cutoff: Option<f64>,
    /// Candidates with fewer neighbors than this are discarded.
    pub min_neighbors: usize,
}

impl Default for MotifConfig {
    fn default() -> Self {
        Self {
            max_matches: 10,
            max_motifs: 5,
            tolerance: 2.0,
            max_distance: None,
            cutoff: None,
            min_neighbors: 1,
        }
    }
}

impl MotifConfig {
    pub fn new(max_matches: usize, max_motifs: usize) -> Self {
        Self {
            max_matches,
            max_motifs,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    pub fn with_min_neighbors(mut self, min_neighbors: usize) -> Self {
        self.min_neighbors = min_neighbors;
        self
    }

    /// # Errors
    /// [`MotifError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(MotifError::InvalidParameter(msg.to_string()));
        if self.max_matches == 0 {
            return invalid("max_matches must be >= 1");
        }
        if self.max_motifs == 0 {
            return invalid("max_motifs must be >= 1");
        }
        if self.min_neighbors == 0 {
            return invalid("min_neighbors must be >= 1");
        }
        if !self.tolerance.is_finite() || self.tolerance < 1.0 {
            return invalid("tolerance must be finite and >= 1");
        }
        if self.max_distance.is_some_and(|d| d.is_nan() || d < 0.0) {
            return invalid("max_distance must be >= 0");
        }
        if self.cutoff.is_some_and(|c| c.is_nan() || c < 0.0) {
            return invalid("cutoff must be >= 0");
        }
        Ok(())
    }
}

/// A recurring pattern: one representative subsequence and its neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motif {
    /// Start index of the representative subsequence.
    pub index: usize,
    /// Matrix profile value at `index`.
    pub profile_distance: f64,
    /// Neighbor start indices, nearest first.
    pub neighbors: Vec<usize>,
    /// Distance from the representative to each neighbor, ascending.
    pub distances: Vec<f64>,
}

impl Motif {
    /// Representative followed by its neighbors.
    pub fn occurrences(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.index).chain(self.neighbors.iter().copied())
    }

    /// Distance to the closest neighbor.
    pub fn nearest_distance(&self) -> Option<f64> {
        self.distances.first().copied()
    }
}

/// Outcome of one extraction step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A motif was recorded.
    Found(Motif),
    /// The candidate at `index` had too few neighbors and is now excluded.
    Rejected { index: usize },
    /// No eligible candidate remains.
    Exhausted,
}

/// Greedy top-k motif extraction over a finished matrix profile.
///
/// The set of globally excluded indices is explicit state: [`MotifExtractor::step`]
/// consumes it and returns the updated set alongside the outcome.
pub struct MotifExtractor<'a> {
    engine: DistanceProfileEngine,
    mp: &'a MatrixProfile,
    config: MotifConfig,
}

impl<'a> MotifExtractor<'a> {
    /// # Errors
    /// - [`MotifError::InvalidParameter`] for an invalid `config`.
    /// - [`MotifError::InvalidWindow`] / [`MotifError::InsufficientLength`]
    ///   when `mp.m` does not fit the series.
    /// - [`MotifError::ProfileMismatch`] when `mp` was computed on a series of
    ///   another length.
    pub fn new(series: &[f64], mp: &'a MatrixProfile, config: MotifConfig) -> Result<Self> {
        config.validate()?;
        let engine = DistanceProfileEngine::new(series, mp.m)?;
        if engine.n_subs() != mp.len() {
            return Err(MotifError::ProfileMismatch {
                expected: engine.n_subs(),
                got: mp.len(),
            });
        }
        Ok(Self { engine, mp, config })
    }

    /// State before the first step: nothing excluded.
    pub fn initial_state(&self) -> ExclusionSet {
        ExclusionSet::new(self.mp.len())
    }

    /// Try to extract the next motif given the indices excluded so far.
    pub fn step(&self, mut excluded: ExclusionSet) -> (Step, ExclusionSet) {
        let ez = self.mp.exclusion_zone;

        let Some((p, p_dist)) = excluded.argmin(&self.mp.profile) else {
            return (Step::Exhausted, excluded);
        };
        if self.config.cutoff.is_some_and(|c| p_dist > c) {
            return (Step::Exhausted, excluded);
        }

        let dp = self.engine.profile(p);
        let mut local = excluded.clone();
        local.exclude(p, ez);

        let mut neighbors = Vec::new();
        let mut distances = Vec::new();
        let mut limit = self.config.max_distance.unwrap_or(f64::INFINITY);
        while neighbors.len() < self.config.max_matches {
            let Some((j, d)) = local.argmin(&dp) else {
                break;
            };
            if d > limit {
                break;
            }
            if neighbors.is_empty() {
                limit = limit.min(d * self.config.tolerance);
            }
            neighbors.push(j);
            distances.push(d);
            local.exclude(j, ez);
        }

        if neighbors.len() < self.config.min_neighbors {
            tracing::debug!(index = p, found = neighbors.len(), "motif candidate rejected");
            excluded.exclude(p, ez);
            return (Step::Rejected { index: p }, excluded);
        }

        tracing::debug!(
            index = p,
            profile_distance = p_dist,
            neighbors = neighbors.len(),
            "motif found"
        );
        // `local` already holds the global set plus the zones of p and every neighbor.
        let motif = Motif {
            index: p,
            profile_distance: p_dist,
            neighbors,
            distances,
        };
        (Step::Found(motif), local)
    }

    /// Run steps until `max_motifs` motifs are found or candidates run out.
    pub fn run(&self) -> Vec<Motif> {
        let mut motifs = Vec::with_capacity(self.config.max_motifs);
        let mut state = self.initial_state();
        while motifs.len() < self.config.max_motifs {
            let (step, next) = self.step(state);
            state = next;
            match step {
                Step::Found(motif) => motifs.push(motif),
                Step::Rejected { .. } => {}
                Step::Exhausted => break,
            }
        }
        motifs
    }
}

/// Find up to `config.max_motifs` motifs, most distinctive first.
///
/// # Errors
/// See [`MotifExtractor::new`]. An empty result is not an error.
pub fn find_motifs(series: &[f64], mp: &MatrixProfile, config: &MotifConfig) -> Result<Vec<Motif>> {
    Ok(MotifExtractor::new(series, mp, config.clone())?.run())
}

/// Find motifs with the default tolerance and no distance ceilings.
///
/// # Errors
/// [`MotifError::ProfileMismatch`] if `m` differs from the window `mp` was
/// computed with, otherwise see [`MotifExtractor::new`].
pub fn extract_motifs(
    series: &[f64],
    m: usize,
    mp: &MatrixProfile,
    max_matches: usize,
    max_motifs: usize,
) -> Result<Vec<Motif>> {
    if m != mp.m {
        return Err(MotifError::ProfileMismatch {
            expected: m,
            got: mp.m,
        });
    }
    find_motifs(series, mp, &MotifConfig::new(max_matches, max_motifs))
}
