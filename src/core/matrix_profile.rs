use serde::{Deserialize, Serialize};

use crate::error::{MotifError, Result};

/// Smallest usable subsequence length.
pub const MIN_WINDOW: usize = 2;

/// Configuration for matrix profile computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixProfileConfig {
    /// Subsequence length.
    pub m: usize,
    /// Exclusion zone denominator: zone = ceil(m / exclusion_zone_denom).
    /// Default is 4 to match stumpy.
    pub exclusion_zone_denom: usize,
}

impl MatrixProfileConfig {
    pub fn new(m: usize) -> Self {
        Self {
            m,
            exclusion_zone_denom: 4,
        }
    }

    pub fn with_exclusion_zone_denom(mut self, denom: usize) -> Self {
        self.exclusion_zone_denom = denom;
        self
    }

    /// Compute the exclusion zone radius.
    pub fn exclusion_zone(&self) -> usize {
        self.m.div_ceil(self.exclusion_zone_denom.max(1))
    }

    /// Check the configuration against a series of length `n`.
    ///
    /// # Errors
    /// - [`MotifError::InsufficientLength`] when `n` admits no valid window at all.
    /// - [`MotifError::InvalidWindow`] when `m < 2` or `m > n / 2`.
    /// - [`MotifError::InvalidParameter`] for a zero exclusion denominator.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.exclusion_zone_denom == 0 {
            return Err(MotifError::InvalidParameter(
                "exclusion_zone_denom must be >= 1".to_string(),
            ));
        }
        if n < 2 * MIN_WINDOW {
            return Err(MotifError::InsufficientLength {
                needed: 2 * self.m.max(MIN_WINDOW),
                got: n,
            });
        }
        let max = n / 2;
        if self.m < MIN_WINDOW || self.m > max {
            return Err(MotifError::InvalidWindow { m: self.m, max });
        }
        Ok(())
    }
}

/// Nearest-neighbor summary of one distance-profile row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMinimum {
    pub distance: f64,
    pub index: Option<usize>,
    pub left_distance: f64,
    pub left_index: Option<usize>,
    pub right_distance: f64,
    pub right_index: Option<usize>,
}

impl RowMinimum {
    /// Scan a row whose exclusion zone is already applied.
    ///
    /// Ties resolve to the smallest index; infinite entries never win.
    pub fn scan(row: usize, distances: &[f64]) -> Self {
        let mut out = Self {
            distance: f64::INFINITY,
            index: None,
            left_distance: f64::INFINITY,
            left_index: None,
            right_distance: f64::INFINITY,
            right_index: None,
        };
        for (j, &d) in distances.iter().enumerate() {
            if d < out.distance {
                out.distance = d;
                out.index = Some(j);
            }
            if j < row && d < out.left_distance {
                out.left_distance = d;
                out.left_index = Some(j);
            } else if j > row && d < out.right_distance {
                out.right_distance = d;
                out.right_index = Some(j);
            }
        }
        out
    }
}

/// Serde adapter writing infinite distances as `null` and reading `null`
/// back as `f64::INFINITY`.
mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        values
            .iter()
            .map(|&v| v.is_finite().then_some(v))
            .collect::<Vec<Option<f64>>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let values = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|v| v.unwrap_or(f64::INFINITY))
            .collect())
    }
}

/// The matrix profile result.
///
/// Positions whose whole distance row was excluded or non-finite hold
/// `f64::INFINITY` with a `None` index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixProfile {
    /// Nearest-neighbor distances for each subsequence.
    #[serde(with = "infinite_as_null")]
    pub profile: Vec<f64>,
    /// Index of the nearest neighbor for each subsequence.
    pub profile_index: Vec<Option<usize>>,
    /// Left nearest-neighbor distances (neighbors with smaller index).
    #[serde(with = "infinite_as_null")]
    pub left_profile: Vec<f64>,
    /// Index of the left nearest neighbor.
    pub left_profile_index: Vec<Option<usize>>,
    /// Right nearest-neighbor distances (neighbors with larger index).
    #[serde(with = "infinite_as_null")]
    pub right_profile: Vec<f64>,
    /// Index of the right nearest neighbor.
    pub right_profile_index: Vec<Option<usize>>,
    /// Subsequence length used.
    pub m: usize,
    /// Exclusion zone radius used.
    pub exclusion_zone: usize,
}

impl MatrixProfile {
    /// Create a new matrix profile initialized to infinity distances.
    pub fn new(n_subs: usize, m: usize, exclusion_zone: usize) -> Self {
        Self {
            profile: vec![f64::INFINITY; n_subs],
            profile_index: vec![None; n_subs],
            left_profile: vec![f64::INFINITY; n_subs],
            left_profile_index: vec![None; n_subs],
            right_profile: vec![f64::INFINITY; n_subs],
            right_profile_index: vec![None; n_subs],
            m,
            exclusion_zone,
        }
    }

    pub fn len(&self) -> usize {
        self.profile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }

    /// Store the summary of row `idx`.
    #[inline]
    pub fn record(&mut self, idx: usize, row: &RowMinimum) {
        self.profile[idx] = row.distance;
        self.profile_index[idx] = row.index;
        self.left_profile[idx] = row.left_distance;
        self.left_profile_index[idx] = row.left_index;
        self.right_profile[idx] = row.right_distance;
        self.right_profile_index[idx] = row.right_index;
    }

    /// Nearest neighbor of `idx` as `(neighbor, distance)`, if one exists.
    pub fn nearest(&self, idx: usize) -> Option<(usize, f64)> {
        self.profile_index[idx].map(|j| (j, self.profile[idx]))
    }

    /// `(distance, neighbor)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, Option<usize>)> + '_ {
        self.profile
            .iter()
            .copied()
            .zip(self.profile_index.iter().copied())
    }
}
