use criterion::{Criterion, criterion_group, criterion_main};
use roast_core::ror;
use std::hint::black_box;

/// Synthetic exponential-approach roast at 1 Hz.
fn synthetic_profile(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut hot = 20.0;
    let mut time = Vec::with_capacity(n);
    let mut temps = Vec::with_capacity(n);
    for i in 0..n {
        time.push(i as f64);
        hot += (235.0 - hot) * 0.01;
        temps.push(hot);
    }
    (time, temps)
}

fn bench_fit(c: &mut Criterion) {
    let (time_240, hot_240) = synthetic_profile(240);
    c.bench_function("ror_fit_240", |b| {
        b.iter(|| ror::fit(black_box(&time_240), black_box(&hot_240)).unwrap())
    });

    let (time_600, hot_600) = synthetic_profile(600);
    c.bench_function("ror_fit_600", |b| {
        b.iter(|| ror::fit(black_box(&time_600), black_box(&hot_600)).unwrap())
    });
}

criterion_group!(benches, bench_fit);
criterion_main!(benches);
