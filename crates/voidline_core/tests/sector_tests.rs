//! Sector scenarios: combat between templated ships.

use voidline_core::prelude::*;
use voidline_core::sector::SectorEvents;
use voidline_test_utils::determinism::assert_reproducible;
use voidline_test_utils::fixtures::{dagger, dagger_factory, RecordingSink, DAGGER};

fn gunship(kind: WeaponKind) -> Entity {
    let mut ship = dagger();
    ship.add_component(Model::new("ships/gunship.mesh"));
    let mut weapon = Weapon::new(kind, 4.0, 10.0);
    weapon.set_firing(true);
    ship.add_component(weapon);
    ship
}

fn duel(kind: WeaponKind) -> Sector {
    let mut sector = Sector::default();
    sector.insert(gunship(kind));
    sector.spawn(&dagger_factory(), DAGGER, Vec3::new(0.0, 0.0, 60.0));
    sector
}

#[test]
fn test_projectile_duel_destroys_target() {
    let mut sector = duel(WeaponKind::Projectile);
    let mut destroyed = Vec::new();
    for _ in 0..600 {
        destroyed.extend(sector.update(1.0 / 60.0).destroyed);
    }
    assert_eq!(destroyed.len(), 1);
    assert_eq!(sector.len(), 1);
}

#[test]
fn test_laser_duel_destroys_target() {
    let mut sector = duel(WeaponKind::Laser);
    let mut total = 0.0;
    let mut events = SectorEvents::default();
    for _ in 0..600 {
        let tick = sector.update(1.0 / 60.0);
        total += tick.damage.iter().map(|d| d.amount).sum::<f32>();
        events.destroyed.extend(tick.destroyed);
    }
    assert_eq!(total, 100.0);
    assert_eq!(events.destroyed.len(), 1);
}

#[test]
fn test_render_draws_models_and_effects() {
    let mut sector = duel(WeaponKind::Laser);
    sector.update(0.01);

    let mut sink = RecordingSink::default();
    sector.render(&mut sink);

    assert_eq!(sink.models.len(), 1);
    assert_eq!(sink.models[0].resource, "ships/gunship.mesh");
    assert!(sink.shaders().contains(&ShaderHandle::LASER));
}

#[test]
fn test_paused_sector_still_renders() {
    let mut sector = duel(WeaponKind::Laser);
    sector.update(0.01);
    sector.set_paused(true);
    let lasers = sector.effects().lasers.active_count();
    for _ in 0..100 {
        sector.update(0.1);
    }
    assert_eq!(sector.effects().lasers.active_count(), lasers);

    let mut sink = RecordingSink::default();
    sector.render(&mut sink);
    assert!(sink.shaders().contains(&ShaderHandle::LASER));
}

#[test]
fn test_sector_runs_are_reproducible() {
    assert_reproducible(|| duel(WeaponKind::Projectile), 240, 1.0 / 60.0);
}
