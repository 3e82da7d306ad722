//! Motif Discovery: finding repeated patterns in time series.
//!
//! Computes the matrix profile of a synthetic signal and lists the top motifs
//! together with the raw values of every occurrence of the best one.
//!
//! Run with: cargo run --release --example motif_discovery -- [m [max_matches [max_motifs]]]

use std::error::Error;

use mp_motifs::{Engine, MatrixProfileConfig, MotifConfig};

/// Synthetic signal with two embedded patterns:
/// - Pattern A (sharp pulse) at indices ~50 and ~300
/// - Pattern B (double bump) at indices ~150 and ~400
fn synthetic(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let mut val = (t * std::f64::consts::TAU / 200.0).sin() * 0.3;
            for center in [50.0, 300.0] {
                let d = (t - center).abs();
                if d < 15.0 {
                    val += 2.0 * (-d * d / 20.0).exp();
                }
            }
            for center in [150.0, 400.0] {
                let d1 = (t - (center - 5.0)).abs();
                let d2 = (t - (center + 5.0)).abs();
                if d1 < 15.0 || d2 < 15.0 {
                    val += 1.5 * (-d1 * d1 / 10.0).exp() + 1.5 * (-d2 * d2 / 10.0).exp();
                }
            }
            val + ((t * 7.1).sin() * (t * 11.3).cos()) * 0.02
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<usize> = std::env::args()
        .skip(1)
        .map(|a| a.parse())
        .collect::<Result<_, _>>()?;
    let m = args.first().copied().unwrap_or(30);
    let defaults = MotifConfig::default();
    let motif_config = MotifConfig::new(
        args.get(1).copied().unwrap_or(defaults.max_matches),
        args.get(2).copied().unwrap_or(defaults.max_motifs),
    );
    let ts = synthetic(500);

    let engine = Engine::new(MatrixProfileConfig::new(m));
    let mp = engine.compute(&ts)?;
    let motifs = engine.find_motifs(&ts, &mp, &motif_config)?;

    println!("Motif Discovery");
    println!("===============");
    println!("Time series length: {}", ts.len());
    println!("Subsequence length: {m}");

    if motifs.is_empty() {
        println!("No motifs found.");
        return Ok(());
    }
    println!("Found {} motifs:\n", motifs.len());

    for (i, motif) in motifs.iter().enumerate() {
        println!(
            "  Motif #{}: index {}, profile distance = {:.6}",
            i + 1,
            motif.index,
            motif.profile_distance
        );
        for (j, d) in motif.neighbors.iter().zip(&motif.distances) {
            println!("      match at {j:>6}  distance = {d:.6}");
        }
    }

    println!("\nOccurrences of motif #1:");
    for start in motifs[0].occurrences() {
        let values: Vec<String> = ts[start..start + m]
            .iter()
            .map(|v| format!("{v:.3}"))
            .collect();
        println!("  [{start:>6}] {}", values.join(" "));
    }
    Ok(())
}
