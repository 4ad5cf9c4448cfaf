//! Effect manager benchmarks for voidline_core.
//!
//! Run with: `cargo bench -p voidline_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voidline_core::prelude::*;

fn saturated_ammo() -> AmmoManager {
    let mut ammo = AmmoManager::new(1024);
    for i in 0..1024 {
        ammo.create(AmmoParams {
            position: Vec3::new(i as f32, 0.0, 0.0),
            velocity: Vec3::new(0.0, 0.0, 200.0),
            lifetime: 1_000.0,
            ..AmmoParams::default()
        });
    }
    ammo
}

/// Allocation into a full pool, the eviction path.
pub fn ammo_eviction_benchmark(c: &mut Criterion) {
    let mut ammo = saturated_ammo();
    c.bench_function("ammo_create_saturated", |b| {
        b.iter(|| black_box(ammo.create(AmmoParams::default())))
    });
}

/// One tick of 1024 rounds against a handful of targets.
pub fn ammo_update_benchmark(c: &mut Criterion) {
    let targets: Vec<HitTarget> = (0..16)
        .map(|i| HitTarget {
            id: i,
            position: Vec3::new(i as f32 * 50.0, 0.0, 5_000.0),
            radius: 5.0,
        })
        .collect();
    let mut ammo = saturated_ammo();
    let mut particles = ParticleManager::new(256, 64);
    c.bench_function("ammo_update_1024", |b| {
        b.iter(|| black_box(ammo.update(1.0 / 60.0, &targets, &mut particles)))
    });
}

/// Trail decay with a live producer.
pub fn trail_update_benchmark(c: &mut Criterion) {
    let mut trails = TrailManager::new(None);
    let handles: Vec<TrailHandle> = (0..64)
        .filter_map(|_| trails.add(1.0, 2.0, Colour::WHITE).ok())
        .collect();
    let mut z = 0.0f32;
    c.bench_function("trail_update_64", |b| {
        b.iter(|| {
            z += 1.5;
            for &handle in &handles {
                trails.add_point(handle, Vec3::new(0.0, 0.0, z));
            }
            trails.update(1.0 / 60.0);
        })
    });
}

/// Full sector frame with sixteen ships and their effects.
pub fn sector_render_benchmark(c: &mut Criterion) {
    let mut sector = Sector::default();
    for i in 0..16 {
        let mut ship = Entity::new(0);
        ship.add_component(Transform::default());
        ship.add_component(Hull::new(1.0e9));
        ship.add_component(TrailEmitter::new(1.0, 1.0, Colour::WHITE));
        let mut weapon = Weapon::new(WeaponKind::Projectile, 10.0, 1.0);
        weapon.set_firing(true);
        ship.add_component(weapon);
        let id = sector.insert(ship);
        if let Some(transform) = sector.entity_mut(id).and_then(|e| e.get_mut::<Transform>()) {
            transform.position = Vec3::new(i as f32 * 20.0, 0.0, 0.0);
        }
    }
    let mut sink = voidline_core::render::NullSink;
    c.bench_function("sector_frame_16_ships", |b| {
        b.iter(|| {
            sector.update(1.0 / 60.0);
            sector.render(black_box(&mut sink));
        })
    });
}

criterion_group!(
    benches,
    ammo_eviction_benchmark,
    ammo_update_benchmark,
    trail_update_benchmark,
    sector_render_benchmark
);
criterion_main!(benches);
