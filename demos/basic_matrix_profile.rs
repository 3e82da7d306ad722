//! Basic matrix profile computation with mp-motifs.
//!
//! Computes the z-normalized Euclidean distance matrix profile with STOMP
//! and reports the best matching pair, the most anomalous subsequence and
//! a summary of the profile distribution.
//!
//! Run with: cargo run --release --example basic_matrix_profile

use mp_motifs::{compute_matrix_profile, MotifError};

fn main() -> Result<(), MotifError> {
    // A noisy sine wave with period 100, so the matrix profile reveals
    // the repeated cycle.
    let n = 500;
    let m = 50;

    let ts: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            let base = (t * std::f64::consts::TAU / 100.0).sin();
            let noise = ((t * 7.3).sin() * (t * 13.7).cos()) * 0.05;
            base + noise
        })
        .collect();

    let mp = compute_matrix_profile(&ts, m)?;

    println!("Time series length: {n}");
    println!("Subsequence length: {m}");
    println!("Matrix profile length: {}", mp.len());
    println!("Exclusion zone: {}", mp.exclusion_zone);

    let finite: Vec<(usize, f64)> = mp
        .iter()
        .enumerate()
        .filter(|(_, (d, _))| d.is_finite())
        .map(|(i, (d, _))| (i, d))
        .collect();

    let Some(&(min_idx, min_dist)) = finite.iter().min_by(|a, b| a.1.total_cmp(&b.1)) else {
        println!("No subsequence has a valid neighbor.");
        return Ok(());
    };
    if let Some((nn_idx, _)) = mp.nearest(min_idx) {
        println!("\nBest matching pair:");
        println!("  Subsequence at index {min_idx}");
        println!("  Nearest neighbor at index {nn_idx}");
        println!("  Distance: {min_dist:.6}");
    }

    if let Some(&(max_idx, max_dist)) = finite.iter().max_by(|a, b| a.1.total_cmp(&b.1)) {
        println!("\nMost anomalous subsequence:");
        println!("  Index: {max_idx}");
        println!("  Distance: {max_dist:.6}");
    }

    let mean = finite.iter().map(|(_, d)| d).sum::<f64>() / finite.len() as f64;
    let std = (finite.iter().map(|(_, d)| (d - mean).powi(2)).sum::<f64>()
        / finite.len() as f64)
        .sqrt();

    println!("\nProfile statistics:");
    println!("  Mean distance: {mean:.6}");
    println!("  Std deviation: {std:.6}");
    Ok(())
}
