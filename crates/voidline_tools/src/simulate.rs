//! Headless sector runs.
//!
//! Spawns copies of one template on a ring, points every ship at the
//! centre with weapons firing, and runs the sector for a fixed number of
//! ticks.

use std::path::PathBuf;

use serde::Serialize;
use voidline_core::components::{Navigation, Weapon};
use voidline_core::config::EngineConfig;
use voidline_core::context::GameContext;
use voidline_core::math::Vec3;

use crate::error::{Result, ToolError};

/// Parameters of a run.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    /// Directory holding templates.
    pub templates: PathBuf,
    /// Template to spawn.
    pub template: String,
    /// Number of ships.
    pub ships: usize,
    /// Ticks to run.
    pub ticks: u32,
    /// Seconds per tick.
    pub delta: f32,
    /// Radius of the spawn ring.
    pub radius: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            templates: PathBuf::from("data/templates"),
            template: "dagger".to_string(),
            ships: 4,
            ticks: 600,
            delta: 1.0 / 60.0,
            radius: 60.0,
        }
    }
}

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSummary {
    /// Ticks run.
    pub ticks: u64,
    /// Ships spawned.
    pub ships_spawned: usize,
    /// Ships still alive at the end.
    pub ships_remaining: usize,
    /// Ships destroyed.
    pub ships_destroyed: usize,
    /// Total hit points removed.
    pub damage_dealt: f32,
    /// Live rounds at the end.
    pub ammo_in_flight: usize,
    /// Live trails at the end, orphaned ones included.
    pub trails: usize,
}

/// Run a sector headless.
///
/// # Errors
///
/// Fails if the templates cannot be loaded or the template is unknown.
pub fn run(params: &SimulationParams) -> Result<SimulationSummary> {
    let context = GameContext::load(EngineConfig {
        template_directory: params.templates.clone(),
        ..EngineConfig::default()
    })?;
    if !context.entities.contains(&params.template) {
        return Err(ToolError::UnknownTemplate(params.template.clone()));
    }

    let mut sector = context.new_sector();
    let mut summary = SimulationSummary::default();

    for i in 0..params.ships {
        let angle = i as f32 / params.ships as f32 * std::f32::consts::TAU;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * params.radius;
        let Some(id) = sector.spawn(&context.entities, &params.template, position) else {
            continue;
        };
        summary.ships_spawned += 1;
        if let Some(ship) = sector.entity_mut(id) {
            for navigation in ship.get_all_mut::<Navigation>() {
                navigation.set_direction(-position);
            }
            for weapon in ship.get_all_mut::<Weapon>() {
                weapon.set_firing(true);
            }
        }
    }

    for _ in 0..params.ticks {
        let events = sector.update(params.delta);
        summary.damage_dealt += events.damage.iter().map(|d| d.amount).sum::<f32>();
        summary.ships_destroyed += events.destroyed.len();
    }

    summary.ticks = sector.tick();
    summary.ships_remaining = sector.len();
    summary.ammo_in_flight = sector.effects().ammo.active_count();
    summary.trails = sector.effects().trails.len();

    tracing::info!(
        ticks = summary.ticks,
        destroyed = summary.ships_destroyed,
        "Simulation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidline_core::components::{Hull, Transform, WeaponKind};
    use voidline_core::entity::Entity;
    use voidline_test_utils::fixtures::write_templates;

    fn turret() -> Entity {
        let mut entity = Entity::new(0);
        entity.add_component(Transform::default());
        entity.add_component(Hull::new(20.0));
        entity.add_component(Navigation::new(100.0));
        entity.add_component(Weapon::new(WeaponKind::Laser, 2.0, 5.0));
        entity
    }

    #[test]
    fn test_turrets_trade_fire() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path(), &[("turret", turret())]);

        let summary = run(&SimulationParams {
            templates: dir.path().to_path_buf(),
            template: "turret".to_string(),
            ships: 2,
            ticks: 120,
            ..SimulationParams::default()
        })
        .unwrap();

        assert_eq!(summary.ticks, 120);
        assert_eq!(summary.ships_spawned, 2);
        assert!(summary.damage_dealt > 0.0);
        assert_eq!(
            summary.ships_remaining + summary.ships_destroyed,
            summary.ships_spawned
        );
    }

    #[test]
    fn test_unknown_template() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&SimulationParams {
            templates: dir.path().to_path_buf(),
            template: "ghost".to_string(),
            ..SimulationParams::default()
        });
        assert!(matches!(result, Err(ToolError::UnknownTemplate(name)) if name == "ghost"));
    }
}
