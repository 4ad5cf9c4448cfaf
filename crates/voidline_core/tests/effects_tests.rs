//! Tests for the pooled effect managers driven together.

use voidline_core::prelude::*;
use voidline_test_utils::fixtures::RecordingSink;

#[test]
fn test_ammo_overflow_keeps_capacity() {
    let mut effects = Effects::default();
    let capacity = effects.ammo.capacity();
    assert_eq!(capacity, 1024);

    for i in 0..=capacity {
        effects.ammo.create(AmmoParams {
            position: Vec3::new(i as f32, 0.0, 0.0),
            lifetime: 10.0,
            ..AmmoParams::default()
        });
    }

    assert_eq!(effects.ammo.active_count(), capacity);
    assert_eq!(effects.ammo.position(0), Some(Vec3::new(1024.0, 0.0, 0.0)));
}

#[test]
fn test_each_manager_draws_once() {
    let mut effects = Effects::default();
    for i in 0..10 {
        effects.ammo.create(AmmoParams {
            position: Vec3::new(i as f32, 0.0, 0.0),
            velocity: Vec3::FORWARD,
            ..AmmoParams::default()
        });
        effects.lasers.fire(LaserParams {
            end: Vec3::new(i as f32, 0.0, 10.0),
            ..LaserParams::default()
        });
    }
    effects.particles.get_available_emitter(EmitterParams {
        spawn: SpawnPolicy::Burst { count: 20 },
        ..EmitterParams::default()
    });
    let trail = effects.trails.add(1.0, 2.0, Colour::WHITE).unwrap();
    effects.trails.add_point(trail, Vec3::ZERO);
    effects.trails.add_point(trail, Vec3::new(0.0, 0.0, 3.0));

    let mut sink = RecordingSink::default();
    effects.render(&mut sink);

    assert_eq!(
        sink.shaders(),
        vec![
            ShaderHandle::TRAIL,
            ShaderHandle::AMMO,
            ShaderHandle::LASER,
            ShaderHandle::PARTICLE
        ]
    );
    assert_eq!(sink.draws[1].vertices, 10 * VertexBatch::VERTICES_PER_QUAD);
}

#[test]
fn test_orphaned_trail_outlives_producer_then_goes() {
    let mut effects = Effects::default();
    let mut ship = Entity::new(1);
    ship.add_component(Transform::default());
    ship.add_component(TrailEmitter::new(1.0, 1.0, Colour::WHITE));
    ship.initialize(&mut effects.trails);

    for _ in 0..10 {
        ship.get_mut::<Transform>().unwrap().velocity = Vec3::new(0.0, 0.0, 20.0);
        ship.update(0.05, &mut effects);
        effects.update(0.05);
    }
    ship.detach(&mut effects.trails);
    drop(ship);

    assert_eq!(effects.trails.len(), 1);
    effects.update(0.5);
    assert_eq!(effects.trails.len(), 1);
    effects.update(0.6);
    assert!(effects.trails.is_empty());
}
