//! Tests for template persistence and entity creation from templates.

use std::path::PathBuf;

use voidline_core::prelude::*;
use voidline_test_utils::fixtures::{dagger, write_templates, DAGGER};

fn shipped_templates() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/templates")
}

// ==========================================================================
// Shipped Data
// ==========================================================================

#[test]
fn test_shipped_templates_load() {
    let components = ComponentFactory::with_builtin();
    let factory = EntityFactory::load(&shipped_templates(), "ron", &components).unwrap();

    assert_eq!(factory.names(), vec!["dagger", "lancer"]);

    let lancer = factory.create("lancer").unwrap();
    let weapon = lancer.get::<Weapon>().unwrap();
    assert_eq!(weapon.kind, WeaponKind::Laser);
    assert_eq!(weapon.energy_cost, 12.0);
    assert_eq!(lancer.get::<Hull>().unwrap().current_hit_points(), 260.0);
    assert_eq!(lancer.get::<ShipDetails>().unwrap().collision_radius, 7.0);
}

#[test]
fn test_shipped_dagger_flies_and_leaves_trail() {
    let context = GameContext::load(EngineConfig {
        template_directory: shipped_templates(),
        ..EngineConfig::default()
    })
    .unwrap();
    let mut sector = context.new_sector();
    let id = sector
        .spawn(&context.entities, "dagger", Vec3::ZERO)
        .unwrap();
    sector
        .entity_mut(id)
        .unwrap()
        .get_mut::<Engine>()
        .unwrap()
        .set_throttle(1.0);

    for _ in 0..60 {
        sector.update(1.0 / 60.0);
    }

    let position = sector.entity(id).unwrap().position().unwrap();
    assert!(position.z > 0.0);
    assert_eq!(sector.effects().trails.len(), 1);
    assert!(sector.effects().particles.active_particles() > 0);
}

// ==========================================================================
// Dagger Scenario
// ==========================================================================

#[test]
fn test_dagger_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path(), &[(DAGGER, dagger())]);

    let components = ComponentFactory::with_builtin();
    let factory = EntityFactory::load(dir.path(), "ron", &components).unwrap();

    let mut first = factory.create(DAGGER).unwrap();
    let second = factory.create(DAGGER).unwrap();

    assert_eq!(first.get::<Hull>().unwrap().current_hit_points(), 100.0);
    assert_eq!(first.component_count(), 2);

    first.get_mut::<Hull>().unwrap().damage(35.0);
    first.get_mut::<Transform>().unwrap().position = Vec3::new(5.0, 0.0, 0.0);

    assert_eq!(second.get::<Hull>().unwrap().current_hit_points(), 100.0);
    assert_eq!(second.position(), Some(Vec3::ZERO));
    assert_eq!(
        factory
            .create(DAGGER)
            .unwrap()
            .get::<Hull>()
            .unwrap()
            .current_hit_points(),
        100.0
    );
}

#[test]
fn test_overwrite_template_replaces_file_and_memory() {
    let dir = tempfile::tempdir().unwrap();
    let mut factory = EntityFactory::with_directory(dir.path(), "ron");
    factory.save_template(DAGGER, &dagger()).unwrap();

    let mut heavier = dagger();
    heavier.get_mut::<Hull>().unwrap().set_maximum_hit_points(150.0);
    factory.save_template(DAGGER, &heavier).unwrap();

    assert_eq!(
        factory.create(DAGGER).unwrap().get::<Hull>().unwrap().maximum_hit_points(),
        150.0
    );

    let components = ComponentFactory::with_builtin();
    let reloaded = EntityFactory::load(dir.path(), "ron", &components).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(
        reloaded.create(DAGGER).unwrap().get::<Hull>().unwrap().current_hit_points(),
        150.0
    );
}

#[test]
fn test_newer_component_version_skips_template() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("future.ron"),
        r#"(name: "future", components: [
            (type: Hull, version: 99, fields: {"maximum_hit_points": Float(10.0)}),
        ])"#,
    )
    .unwrap();
    write_templates(dir.path(), &[(DAGGER, dagger())]);

    let path = dir.path().join("future.ron");
    let doc = voidline_core::entity_factory::read_template_file(&path).unwrap();
    let components = ComponentFactory::with_builtin();
    assert!(matches!(
        doc.instantiate(&components),
        Err(GameError::UnsupportedVersion { found: 99, .. })
    ));

    let factory = EntityFactory::load(dir.path(), "ron", &components).unwrap();
    assert_eq!(factory.names(), vec![DAGGER]);
}
