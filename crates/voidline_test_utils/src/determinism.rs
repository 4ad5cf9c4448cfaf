//! Reproducibility checks for sector runs.
//!
//! Particle spread is driven by seeded generators and entities update in
//! id order, so two sectors built the same way and fed the same deltas
//! must end in the same state.

use voidline_core::components::Hull;
use voidline_core::entity::EntityId;
use voidline_core::math::Vec3;
use voidline_core::sector::Sector;

/// Observable state of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    /// Entity id.
    pub id: EntityId,
    /// Position, if the entity has a transform.
    pub position: Option<Vec3>,
    /// Hit points, if the entity has a hull.
    pub hit_points: Option<f32>,
}

/// Observable state of a whole sector.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSnapshot {
    /// Completed ticks.
    pub tick: u64,
    /// Entities in id order.
    pub entities: Vec<EntitySnapshot>,
    /// Live rounds.
    pub ammo: usize,
    /// Live particles.
    pub particles: usize,
    /// Live trails.
    pub trails: usize,
}

/// Capture the observable state of `sector`.
#[must_use]
pub fn snapshot(sector: &Sector) -> SectorSnapshot {
    SectorSnapshot {
        tick: sector.tick(),
        entities: sector
            .entities()
            .map(|e| EntitySnapshot {
                id: e.id(),
                position: e.position(),
                hit_points: e.get::<Hull>().map(Hull::current_hit_points),
            })
            .collect(),
        ammo: sector.effects().ammo.active_count(),
        particles: sector.effects().particles.active_particles(),
        trails: sector.effects().trails.len(),
    }
}

/// Build two sectors with `setup`, run both for `ticks` ticks of `delta`
/// seconds and return both final snapshots.
pub fn run_twice<F>(setup: F, ticks: u32, delta: f32) -> (SectorSnapshot, SectorSnapshot)
where
    F: Fn() -> Sector,
{
    let run = || {
        let mut sector = setup();
        for _ in 0..ticks {
            sector.update(delta);
        }
        snapshot(&sector)
    };
    let first = run();
    let second = run();
    tracing::debug!(ticks, "Ran sector twice");
    (first, second)
}

/// Assert that two runs of `setup` end in the same state.
///
/// # Panics
///
/// Panics with both snapshots if the runs diverge.
pub fn assert_reproducible<F>(setup: F, ticks: u32, delta: f32)
where
    F: Fn() -> Sector,
{
    let (first, second) = run_twice(setup, ticks, delta);
    assert_eq!(first, second, "Sector runs diverged after {ticks} ticks");
}
