use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inference_engine::{ForestConfig, RandomForestRegressor};
use ndarray::{Array1, Array2};

fn synthetic_cars(n: usize) -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_fn((n, 5), |(row, col)| match col {
        0 => (row * 7919 % 150_000) as f64,
        1 => (row % 15) as f64,
        2 => [998.0, 1197.0, 1498.0, 2179.0][row % 4],
        3 => (row % 3 == 0) as u8 as f64,
        _ => (row % 2) as f64,
    });
    let y = x
        .rows()
        .into_iter()
        .map(|r| 900_000.0 - r[0] * 1.5 - r[1] * 40_000.0 + r[2] * 120.0 + r[4] * 60_000.0)
        .collect();
    (x, y)
}

fn bench_fit(c: &mut Criterion) {
    let (x, y) = synthetic_cars(500);
    let config = ForestConfig {
        n_estimators: 20,
        ..Default::default()
    };
    c.bench_function("forest_fit_500x5_20_trees", |b| {
        b.iter(|| RandomForestRegressor::fit(black_box(&x), black_box(&y), &config))
    });
}

fn bench_predict(c: &mut Criterion) {
    let (x, y) = synthetic_cars(500);
    let forest = RandomForestRegressor::fit(&x, &y, &ForestConfig::default()).unwrap();
    let sample = x.row(42).to_owned();
    c.bench_function("forest_predict_one", |b| {
        b.iter(|| forest.predict_one(black_box(sample.view())))
    });
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
