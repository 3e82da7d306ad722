use std::sync::atomic::{AtomicBool, Ordering};

use crate::algorithms::common::apply_exclusion_zone;
use crate::algorithms::distance_profile::DistanceProfileEngine;
use crate::core::matrix_profile::{MatrixProfile, MatrixProfileConfig, RowMinimum};
use crate::error::{MotifError, Result};

/// Minimum number of subsequences before dispatching to parallel STOMP.
/// Below this threshold, thread-dispatch overhead exceeds parallelism gains.
#[cfg(feature = "parallel")]
const MIN_PARALLEL_SUBS: usize = 256;

/// Dot products of one query window against every window.
///
/// This is the value STOMP carries from one query to the next.
#[derive(Debug, Clone)]
struct QtRow {
    query: usize,
    qt: Vec<f64>,
}

impl QtRow {
    /// Fresh row for `query` from a sliding dot product.
    fn seed(engine: &DistanceProfileEngine, query: usize) -> Self {
        Self {
            query,
            qt: engine.dot_products(query),
        }
    }

    /// Derive the row of `query + 1` in O(n).
    ///
    /// `QT_q[j] = QT_{q-1}[j-1] - T[j-1]*T[q-1] + T[j+m-1]*T[q+m-1]` for `j >= 1`,
    /// and `QT_q[0] = QT_0[q]` by symmetry of the dot product.
    fn advance(mut self, ts: &[f64], m: usize, qt_first: &[f64]) -> Self {
        let q = self.query + 1;
        let (out_q, in_q) = (ts[q - 1], ts[q + m - 1]);
        // Right-to-left so qt[j-1] is still the previous row's value
        for j in (1..self.qt.len()).rev() {
            self.qt[j] = self.qt[j - 1] - ts[j - 1] * out_q + ts[j + m - 1] * in_q;
        }
        self.qt[0] = qt_first[q];
        self.query = q;
        self
    }
}

#[inline]
fn check_cancelled(cancel: Option<&AtomicBool>) -> Result<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(MotifError::Cancelled),
        _ => Ok(()),
    }
}

/// Distances, exclusion zone and nearest neighbors of one row.
fn evaluate_row(
    engine: &DistanceProfileEngine,
    row: &QtRow,
    exclusion_zone: usize,
    buf: &mut [f64],
) -> RowMinimum {
    engine.distances_from_qt(row.query, &row.qt, buf);
    apply_exclusion_zone(buf, row.query, exclusion_zone);
    RowMinimum::scan(row.query, buf)
}

/// Fold the rows `start..end` sequentially.
///
/// Block 0 starts from `qt_first`; any other block seeds its carry from a
/// fresh sliding dot product so blocks are independent of each other.
fn fold_block(
    engine: &DistanceProfileEngine,
    qt_first: &[f64],
    start: usize,
    end: usize,
    exclusion_zone: usize,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<RowMinimum>> {
    check_cancelled(cancel)?;
    let ts = engine.series();
    let m = engine.m();
    let mut buf = vec![0.0; engine.n_subs()];
    let mut rows = Vec::with_capacity(end - start);

    let seed = if start == 0 {
        QtRow {
            query: 0,
            qt: qt_first.to_vec(),
        }
    } else {
        QtRow::seed(engine, start)
    };
    rows.push(evaluate_row(engine, &seed, exclusion_zone, &mut buf));

    (start + 1..end).try_fold(seed, |carry, _| {
        check_cancelled(cancel)?;
        let next = carry.advance(ts, m, qt_first);
        rows.push(evaluate_row(engine, &next, exclusion_zone, &mut buf));
        Ok::<_, MotifError>(next)
    })?;

    tracing::trace!(start, end, "stomp block finished");
    Ok(rows)
}

/// Validate inputs and build the shared engine and empty profile.
fn prepare(
    ts: &[f64],
    config: &MatrixProfileConfig,
) -> Result<(DistanceProfileEngine, MatrixProfile)> {
    config.validate(ts.len())?;
    let m = config.m;
    let n_subs = ts.len() - m + 1;
    if n_subs <= 1 {
        return Err(MotifError::InsufficientLength {
            needed: m + 1,
            got: ts.len(),
        });
    }
    let engine = DistanceProfileEngine::new_unchecked(ts, m);
    let mp = MatrixProfile::new(n_subs, m, config.exclusion_zone());
    Ok((engine, mp))
}

fn finish(mp: MatrixProfile) -> MatrixProfile {
    let invalid = mp.profile_index.iter().filter(|i| i.is_none()).count();
    tracing::debug!(n_subs = mp.len(), invalid, "matrix profile computed");
    mp
}

/// Compute the matrix profile using the STOMP algorithm.
///
/// STOMP exploits the relationship between consecutive dot products:
/// `QT[i][j] = QT[i-1][j-1] - T[j-1]*T[i-1] + T[j+m-1]*T[i+m-1]`
///
/// This allows O(1) updates per element instead of O(m), giving O(n^2) total
/// instead of O(n^2 * m) for the naive approach. With the `parallel` feature,
/// long series are split into row blocks processed on the rayon pool.
///
/// Block boundaries follow `rayon::current_num_threads()`, and each block
/// re-seeds its dot products, so distances can differ in the last bits
/// between pool sizes and from [`stomp_serial`]. A near-tie may then pick a
/// different neighbor at the same distance.
///
/// # Errors
/// [`MotifError::InvalidWindow`] or [`MotifError::InsufficientLength`] when
/// the series cannot support windows of length `config.m`.
pub fn stomp(ts: &[f64], config: &MatrixProfileConfig) -> Result<MatrixProfile> {
    run(ts, config, None)
}

/// [`stomp`] with a cooperative cancellation flag checked between queries.
///
/// # Errors
/// Additionally returns [`MotifError::Cancelled`] once `cancel` is set.
pub fn stomp_cancellable(
    ts: &[f64],
    config: &MatrixProfileConfig,
    cancel: &AtomicBool,
) -> Result<MatrixProfile> {
    run(ts, config, Some(cancel))
}

/// Single-threaded STOMP regardless of the `parallel` feature.
pub fn stomp_serial(ts: &[f64], config: &MatrixProfileConfig) -> Result<MatrixProfile> {
    let (engine, mut mp) = prepare(ts, config)?;
    stomp_sequential(&engine, None, &mut mp)?;
    Ok(finish(mp))
}

fn run(
    ts: &[f64],
    config: &MatrixProfileConfig,
    cancel: Option<&AtomicBool>,
) -> Result<MatrixProfile> {
    let (engine, mut mp) = prepare(ts, config)?;
    tracing::debug!(
        n = ts.len(),
        m = config.m,
        exclusion_zone = mp.exclusion_zone,
        "computing matrix profile"
    );

    #[cfg(feature = "parallel")]
    {
        if mp.len() >= MIN_PARALLEL_SUBS {
            stomp_parallel(&engine, cancel, &mut mp)?;
        } else {
            stomp_sequential(&engine, cancel, &mut mp)?;
        }
    }
    #[cfg(not(feature = "parallel"))]
    stomp_sequential(&engine, cancel, &mut mp)?;

    Ok(finish(mp))
}

fn stomp_sequential(
    engine: &DistanceProfileEngine,
    cancel: Option<&AtomicBool>,
    mp: &mut MatrixProfile,
) -> Result<()> {
    tracing::debug!(n_subs = mp.len(), "sequential stomp");
    let qt_first = engine.dot_products(0);
    let rows = fold_block(engine, &qt_first, 0, mp.len(), mp.exclusion_zone, cancel)?;
    for (i, row) in rows.iter().enumerate() {
        mp.record(i, row);
    }
    Ok(())
}

/// Row-block parallel STOMP: one contiguous block of queries per thread.
///
/// Every block recomputes its first row from scratch, then follows the QT
/// recurrence. Rows are written back by index, so block order is irrelevant.
#[cfg(feature = "parallel")]
fn stomp_parallel(
    engine: &DistanceProfileEngine,
    cancel: Option<&AtomicBool>,
    mp: &mut MatrixProfile,
) -> Result<()> {
    use rayon::prelude::*;

    let n_subs = mp.len();
    let exclusion_zone = mp.exclusion_zone;
    // Compute QT_first once, shared read-only across all threads
    let qt_first = engine.dot_products(0);

    let n_threads = rayon::current_num_threads();
    let chunk_size = n_subs.div_ceil(n_threads);
    tracing::debug!(n_threads, chunk_size, "parallel stomp");

    let starts: Vec<usize> = (0..n_subs).step_by(chunk_size).collect();
    let blocks = starts
        .into_par_iter()
        .map(|start| {
            let end = (start + chunk_size).min(n_subs);
            fold_block(engine, &qt_first, start, end, exclusion_zone, cancel)
                .map(|rows| (start, rows))
        })
        .collect::<Result<Vec<_>>>()?;

    for (start, rows) in blocks {
        for (offset, row) in rows.iter().enumerate() {
            mp.record(start + offset, row);
        }
    }
    Ok(())
}

/// Brute-force matrix profile: one independent distance profile per query.
///
/// O(n^2 log n) (or O(n^2 m) on small inputs). Kept as the reference the
/// STOMP paths are checked against; rows run on the rayon pool when the
/// `parallel` feature is enabled.
pub fn matrix_profile_naive(ts: &[f64], config: &MatrixProfileConfig) -> Result<MatrixProfile> {
    let (engine, mut mp) = prepare(ts, config)?;
    let exclusion_zone = mp.exclusion_zone;
    let row = |q: usize| {
        let mut dp = engine.profile(q);
        apply_exclusion_zone(&mut dp, q, exclusion_zone);
        RowMinimum::scan(q, &dp)
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<RowMinimum> = {
        use rayon::prelude::*;
        (0..mp.len()).into_par_iter().map(row).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<RowMinimum> = (0..mp.len()).map(row).collect();

    for (q, r) in rows.iter().enumerate() {
        mp.record(q, r);
    }
    Ok(finish(mp))
}
