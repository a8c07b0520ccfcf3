use criterion::{Criterion, black_box, criterion_group, criterion_main};
use magtrace::{Attitude, FieldPoint, Frame, PointStore, Smoother, encode_points};
use nalgebra::{UnitQuaternion, Vector3};
use rand::prelude::*;
use rand_pcg::Pcg64;
use std::f32::consts::PI;

// Pre-generated field readings and attitudes so RNG overhead stays out of
// the measured loops.
struct PreGeneratedData {
    samples: Vec<(Vector3<f32>, Attitude)>,
    index: usize,
}

impl PreGeneratedData {
    fn new(count: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut samples = Vec::with_capacity(count);

        for i in 0..count {
            let time = i as f32 * 0.1;
            let sweep = time * 0.5 * 2.0 * PI;

            // Earth-like field in microtesla with slow sweep plus noise.
            let field = Vector3::new(
                22.0 + 2.0 * sweep.cos() + rng.random_range(-0.5..0.5),
                2.0 * sweep.sin() + rng.random_range(-0.5..0.5),
                -43.0 + rng.random_range(-0.5..0.5),
            );

            let attitude = Attitude::from_quaternion(UnitQuaternion::from_euler_angles(
                0.2 * sweep.sin(),
                0.1 * (sweep * 1.3).cos(),
                sweep * 0.25,
            ));

            samples.push((field, attitude));
        }

        Self { samples, index: 0 }
    }

    fn next(&mut self) -> (Vector3<f32>, Attitude) {
        let sample = self.samples[self.index];
        self.index = (self.index + 1) % self.samples.len();
        sample
    }
}

/// Benchmark the device-to-world transform alone
fn bench_to_world(c: &mut Criterion) {
    let mut data = PreGeneratedData::new(4096, 42);

    c.bench_function("attitude_to_world", |b| {
        b.iter(|| {
            let (field, attitude) = data.next();
            black_box(attitude.to_world(black_box(field)))
        })
    });
}

/// Benchmark the smoothing filter update
fn bench_smoothing(c: &mut Criterion) {
    let mut data = PreGeneratedData::new(4096, 7);
    let mut smoother = Smoother::new(0.3);

    c.bench_function("smoother_update", |b| {
        b.iter(|| {
            let (field, _) = data.next();
            black_box(smoother.update(black_box(field)))
        })
    });
}

/// Benchmark appends into a store kept permanently over capacity,
/// so batch eviction is part of the steady-state cost
fn bench_store_append(c: &mut Criterion) {
    let mut data = PreGeneratedData::new(4096, 99);
    let mut store = PointStore::new(1000, 0.1);
    let mut timestamp = 0.0f64;

    c.bench_function("store_append_with_eviction", |b| {
        b.iter(|| {
            let (field, attitude) = data.next();
            timestamp += 0.5;
            store.append(FieldPoint::capture(
                timestamp,
                Vector3::new(0.1, 0.0, -0.2),
                field,
                Some(attitude),
            ));
        })
    });
}

/// Benchmark aggregate statistics over a full store
fn bench_statistics(c: &mut Criterion) {
    let mut data = PreGeneratedData::new(4096, 21);
    let mut store = PointStore::new(1000, 0.1);
    for i in 0..1000 {
        let (field, attitude) = data.next();
        store.append(FieldPoint::capture(
            i as f64 * 0.5,
            Vector3::new(0.0, 0.0, 0.0),
            field,
            Some(attitude),
        ));
    }

    c.bench_function("store_statistics_full", |b| {
        b.iter(|| black_box(store.statistics(black_box(Frame::World))))
    });
}

/// Benchmark encoding a full session payload
fn bench_encode(c: &mut Criterion) {
    let mut data = PreGeneratedData::new(4096, 3);
    let mut points = Vec::with_capacity(1000);
    for i in 0..1000 {
        let (field, attitude) = data.next();
        points.push(FieldPoint::capture(
            i as f64 * 0.5,
            Vector3::new(0.3, -0.1, 0.6),
            field,
            if i % 7 == 0 { None } else { Some(attitude) },
        ));
    }

    c.bench_function("encode_1000_points", |b| {
        b.iter(|| black_box(encode_points(black_box(&points)).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_to_world,
    bench_smoothing,
    bench_store_append,
    bench_statistics,
    bench_encode
);
criterion_main!(benches);
