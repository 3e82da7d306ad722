use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mp_motifs::algorithms::common::{sliding_dot_product_naive, SlidingDotProduct};
use mp_motifs::{
    extract_motifs, matrix_profile_naive, stomp_serial, DistanceProfileEngine, Engine,
    MatrixProfileConfig, RollingStats,
};

fn signal(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (i as f64 * 0.1).sin() + 0.3 * (i as f64 * 0.37).cos())
        .collect()
}

fn bench_sdp_naive_vs_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("sdp_naive_vs_fft");
    let m = 100;
    for n in [500, 1_000, 2_000, 5_000, 10_000] {
        let ts = signal(n);
        let q: Vec<f64> = ts[0..m].to_vec();
        let fft = SlidingDotProduct::with_fft(ts.clone(), m);
        group.bench_with_input(BenchmarkId::new("naive", n), &n, |b, _| {
            b.iter(|| sliding_dot_product_naive(black_box(&q), black_box(&ts)))
        });
        group.bench_with_input(BenchmarkId::new("fft_cached", n), &n, |b, _| {
            b.iter(|| fft.compute(black_box(&q)))
        });
    }
    group.finish();
}

fn bench_rolling_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_stats");
    for n in [1_000, 5_000, 10_000] {
        let ts = signal(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| RollingStats::compute(black_box(&ts), 100))
        });
    }
    group.finish();
}

fn bench_distance_profile(c: &mut Criterion) {
    let ts = signal(10_000);
    let engine = DistanceProfileEngine::new(&ts, 100).unwrap();
    c.bench_function("distance_profile_n10000", |b| {
        b.iter(|| engine.profile(black_box(5_000)))
    });
}

fn bench_stomp(c: &mut Criterion) {
    let mut group = c.benchmark_group("stomp");
    group.sample_size(10);
    for n in [1_000, 5_000, 10_000] {
        let ts = signal(n);
        let config = MatrixProfileConfig::new(100);
        let engine = Engine::new(config.clone());
        group.bench_with_input(BenchmarkId::new("default", n), &n, |b, _| {
            b.iter(|| engine.compute(black_box(&ts)))
        });
        group.bench_with_input(BenchmarkId::new("serial", n), &n, |b, _| {
            b.iter(|| stomp_serial(black_box(&ts), black_box(&config)))
        });
    }
    group.finish();
}

fn bench_stomp_vs_naive(c: &mut Criterion) {
    let mut group = c.benchmark_group("stomp_vs_naive");
    group.sample_size(10);
    for n in [500, 1_000, 2_000] {
        let ts = signal(n);
        let config = MatrixProfileConfig::new(50);
        group.bench_with_input(BenchmarkId::new("stomp", n), &n, |b, _| {
            b.iter(|| stomp_serial(black_box(&ts), black_box(&config)))
        });
        group.bench_with_input(BenchmarkId::new("naive", n), &n, |b, _| {
            b.iter(|| matrix_profile_naive(black_box(&ts), black_box(&config)))
        });
    }
    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_stomp_thread_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("stomp_thread_scaling");
    group.sample_size(10);

    let ts = signal(10_000);
    let config = MatrixProfileConfig::new(100);

    for threads in [1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("threads", threads),
            &threads,
            |b, &threads| {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .unwrap();
                let engine = Engine::new(config.clone());
                b.iter(|| pool.install(|| engine.compute(black_box(&ts))));
            },
        );
    }
    group.finish();
}

fn bench_motifs(c: &mut Criterion) {
    let n = 10_000;
    let m = 100;
    let ts = signal(n);
    let mp = Engine::new(MatrixProfileConfig::new(m)).compute(&ts).unwrap();

    c.bench_function("motifs_n10000_k5", |b| {
        b.iter(|| extract_motifs(black_box(&ts), m, black_box(&mp), 10, 5))
    });
}

criterion_group!(
    benches,
    bench_sdp_naive_vs_fft,
    bench_rolling_stats,
    bench_distance_profile,
    bench_stomp,
    bench_stomp_vs_naive,
    bench_motifs,
);

#[cfg(feature = "parallel")]
criterion_group!(parallel_benches, bench_stomp_thread_scaling);

#[cfg(feature = "parallel")]
criterion_main!(benches, parallel_benches);

#[cfg(not(feature = "parallel"))]
criterion_main!(benches);
