//! Per-tick orchestration of ships and effects.
//!
//! A [`Sector`] owns the live entities of one play area together with the
//! [`Effects`] they feed. One [`Sector::update`] runs a whole frame:
//!
//! 1. Every entity updates in id order and reports its shots
//! 2. Projectile shots become ammo, laser shots hit instantly
//! 3. Ammo moves and resolves hits against the ships
//! 4. Damage is applied and destroyed ships are removed
//! 5. Particles, lasers and trails advance
//!
//! While paused nothing moves, but [`Sector::render`] still draws.

use std::collections::BTreeMap;

use crate::ammo::{AmmoParams, HitTarget};
use crate::components::{Hull, Shot, Transform, WeaponKind};
use crate::config::EngineConfig;
use crate::effects::Effects;
use crate::entity::{Entity, EntityId};
use crate::entity_factory::EntityFactory;
use crate::laser::LaserParams;
use crate::math::{Colour, Vec3};
use crate::particle::{EmitterParams, SpawnPolicy};
use crate::render::RenderSink;

/// Particles in the burst left by a destroyed ship.
const EXPLOSION_PARTICLES: u32 = 48;

/// Damage dealt to one entity during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    /// Entity that fired, if known.
    pub attacker: Option<EntityId>,
    /// Entity damaged.
    pub target: EntityId,
    /// Hit points actually removed.
    pub amount: f32,
}

/// Everything notable that happened in one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectorEvents {
    /// Damage applied, in resolution order.
    pub damage: Vec<DamageEvent>,
    /// Entities destroyed and removed this tick.
    pub destroyed: Vec<EntityId>,
}

/// Live entities of one play area and their effects.
#[derive(Debug)]
pub struct Sector {
    entities: BTreeMap<EntityId, Entity>,
    effects: Effects,
    next_id: EntityId,
    tick: u64,
}

impl Sector {
    /// Create an empty sector with managers sized from `config`.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            entities: BTreeMap::new(),
            effects: Effects::new(config),
            next_id: 1,
            tick: 0,
        }
    }

    /// Number of completed ticks.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Effect managers.
    #[must_use]
    pub const fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Effect managers, mutably.
    pub fn effects_mut(&mut self) -> &mut Effects {
        &mut self.effects
    }

    /// Whether updates are suspended.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.effects.is_paused()
    }

    /// Suspend or resume the sector.
    pub fn set_paused(&mut self, paused: bool) {
        self.effects.set_paused(paused);
    }

    /// Spawn a copy of `template` at `position`.
    ///
    /// Returns `None` if the template is unknown.
    pub fn spawn(
        &mut self,
        factory: &EntityFactory,
        template: &str,
        position: Vec3,
    ) -> Option<EntityId> {
        let mut entity = factory.create(template)?;
        if let Some(transform) = entity.get_mut::<Transform>() {
            transform.position = position;
        }
        let id = self.insert(entity);
        tracing::debug!(id, template, "Spawned entity");
        Some(id)
    }

    /// Take ownership of an entity, assigning it a fresh id.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        entity.set_id(id);
        entity.initialize(&mut self.effects.trails);
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity. Its trails are released and fade out.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(&id)?;
        entity.detach(&mut self.effects.trails);
        Some(entity)
    }

    /// Entity by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Entity by id, mutably.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Live entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the sector has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Advance the sector by `delta` seconds.
    pub fn update(&mut self, delta: f32) -> SectorEvents {
        let mut events = SectorEvents::default();
        if self.effects.is_paused() {
            return events;
        }

        let mut shots = Vec::new();
        for entity in self.entities.values_mut() {
            shots.extend(entity.update(delta, &mut self.effects));
        }

        let targets: Vec<HitTarget> = self
            .entities
            .values()
            .filter_map(Entity::hit_target)
            .collect();
        for shot in &shots {
            self.resolve_shot(shot, &targets, &mut events);
        }

        let hits = self
            .effects
            .ammo
            .update(delta, &targets, &mut self.effects.particles);
        for hit in hits {
            self.apply_damage(hit.owner, hit.target, hit.damage, &mut events);
        }

        self.remove_destroyed(&mut events);
        self.effects.update(delta);
        self.tick += 1;

        tracing::debug!(
            tick = self.tick,
            entities = self.entities.len(),
            shots = shots.len(),
            ammo = self.effects.ammo.active_count(),
            trails = self.effects.trails.len(),
            "Sector tick"
        );
        events
    }

    fn resolve_shot(&mut self, shot: &Shot, targets: &[HitTarget], events: &mut SectorEvents) {
        match shot.kind {
            WeaponKind::Projectile => {
                let lifetime = if shot.speed > 0.0 {
                    shot.range / shot.speed
                } else {
                    0.0
                };
                self.effects.ammo.create(AmmoParams {
                    position: shot.origin,
                    velocity: shot.direction * shot.speed + shot.inherited_velocity,
                    lifetime,
                    damage: shot.damage,
                    owner: shot.owner,
                    colour: shot.colour,
                });
            }
            WeaponKind::Laser => {
                let reach = shot.origin + shot.direction * shot.range;
                let nearest = targets
                    .iter()
                    .filter(|target| Some(target.id) != shot.owner)
                    .filter_map(|target| {
                        target
                            .intersect_segment(shot.origin, reach)
                            .map(|t| (t, target.id))
                    })
                    .min_by(|a, b| a.0.total_cmp(&b.0));

                let end = match nearest {
                    Some((t, target)) => {
                        self.apply_damage(shot.owner, target, shot.damage, events);
                        shot.origin.lerp(reach, t)
                    }
                    None => reach,
                };
                self.effects.lasers.fire(LaserParams {
                    start: shot.origin,
                    end,
                    colour: shot.colour,
                    ..LaserParams::default()
                });
            }
        }
    }

    fn apply_damage(
        &mut self,
        attacker: Option<EntityId>,
        target: EntityId,
        damage: f32,
        events: &mut SectorEvents,
    ) {
        let Some(hull) = self
            .entities
            .get_mut(&target)
            .and_then(|entity| entity.get_mut::<Hull>())
        else {
            return;
        };
        let amount = hull.damage(damage);
        if amount > 0.0 {
            events.damage.push(DamageEvent {
                attacker,
                target,
                amount,
            });
        }
    }

    fn remove_destroyed(&mut self, events: &mut SectorEvents) {
        let destroyed: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.get::<Hull>().is_some_and(Hull::is_destroyed))
            .map(|(&id, _)| id)
            .collect();

        for id in destroyed {
            let Some(entity) = self.despawn(id) else {
                continue;
            };
            if let Some(position) = entity.position() {
                self.effects.particles.get_available_emitter(EmitterParams {
                    position,
                    colour: Colour::new(1.0, 0.6, 0.2, 1.0),
                    spawn: SpawnPolicy::Burst {
                        count: EXPLOSION_PARTICLES,
                    },
                    particle_lifetime: 1.5,
                    speed: 20.0,
                    size: 1.5,
                    ..EmitterParams::default()
                });
            }
            tracing::info!(id, "Entity destroyed");
            events.destroyed.push(id);
        }
    }

    /// Draw every entity, then every effect.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        for entity in self.entities.values() {
            entity.render(sink);
        }
        self.effects.render(sink);
    }

    /// Drop every entity and effect.
    pub fn clear(&mut self) {
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            self.despawn(id);
        }
        self.effects.ammo.clear();
        self.effects.particles.clear();
        self.effects.lasers.clear();
        self.effects.trails.clear();
    }
}

impl Default for Sector {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
