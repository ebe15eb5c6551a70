// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Step processing microbenchmarks
//!
//! - Fast path: long runs of steps in one slice and unit
//! - Scan path: every step opens a new key, so each one walks the collection

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fp420_config::SensitiveDetectorConfig;
use fp420_hits::{
    Fp420SensitiveDetector, HitsCollectionsOfEvent, ParticleDefinition, SensitiveDetector,
    SensitiveDetectorCatalog, SimStep, ThreeVector, Track, VolumeLevel,
};

fn make_steps(count: usize, steps_per_key: usize) -> Vec<SimStep> {
    (0..count)
        .map(|i| {
            let key = i / steps_per_key.max(1);
            let mut step = SimStep {
                track: Track {
                    track_id: 1 + (key % 4) as i32,
                    definition: ParticleDefinition::new(if i % 3 == 0 { "e-" } else { "proton" }, 2212),
                    ..Default::default()
                },
                total_energy_deposit: 0.0001,
                ..Default::default()
            };
            step.pre_step.position = ThreeVector::new(0.1, 0.2, 420_000.0);
            step.pre_step.touchable.history = vec![
                VolumeLevel::new("SIPLANE", 1 + (key % 10) as i32),
                VolumeLevel::new("SISTATION", 1),
                VolumeLevel::new("FP420E", 1),
            ];
            step.post_step.global_time = (key / 10) as f64;
            step
        })
        .collect()
}

fn run_event(sd: &mut Fp420SensitiveDetector, registry: &mut HitsCollectionsOfEvent, steps: &[SimStep]) {
    registry.clear();
    sd.initialize(registry);
    for step in steps {
        sd.process_hits(Some(step));
    }
    sd.end_of_event();
}

fn bench_step_processing(c: &mut Criterion) {
    let catalog = SensitiveDetectorCatalog::new().with_volumes("FP420SI", ["FP420SiPlane"]);
    let config = SensitiveDetectorConfig::default();

    let mut group = c.benchmark_group("step_processing");
    for &(label, steps_per_key) in &[("fast_path", 100usize), ("scan_path", 1usize)] {
        let steps = make_steps(5_000, steps_per_key);
        group.throughput(Throughput::Elements(steps.len() as u64));
        group.bench_with_input(BenchmarkId::new(label, steps.len()), &steps, |b, steps| {
            let mut sd = Fp420SensitiveDetector::new("FP420SI", &catalog, &config);
            let mut registry = HitsCollectionsOfEvent::new();
            b.iter(|| {
                run_event(&mut sd, &mut registry, black_box(steps));
                black_box(sd.last_summary())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_step_processing);
criterion_main!(benches);
