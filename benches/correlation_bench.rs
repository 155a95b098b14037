use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use holix::scoring::{circular_correlation, circular_correlation_fft};

fn random_vector(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn bench_correlation(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);

    // 128: typical embedding dimension, power of two.
    // 150: exercises the non-power-of-two fallback.
    for n in [128usize, 150] {
        let s = random_vector(&mut rng, n);
        let o = random_vector(&mut rng, n);

        c.bench_function(&format!("direct_correlation_{n}"), |b| {
            b.iter(|| circular_correlation(black_box(&s), black_box(&o)))
        });
        c.bench_function(&format!("fft_correlation_{n}"), |b| {
            b.iter(|| circular_correlation_fft(black_box(&s), black_box(&o)))
        });
    }
}

criterion_group!(benches, bench_correlation);
criterion_main!(benches);
