//! Projectile ammo.
//!
//! Ammo is integrated and hit-tested once per tick against a list of
//! [`HitTarget`] spheres supplied by the caller. A hit deactivates the
//! round, reports an [`AmmoHit`] and spawns a spark burst through the
//! [`ParticleManager`]. The pool evicts the oldest round when full, so
//! firing never fails.

use crate::entity::EntityId;
use crate::math::{Colour, Vec3};
use crate::particle::{EmitterParams, ParticleManager, SpawnPolicy};
use crate::pool::{AllocationPolicy, Pool, Poolable};
use crate::render::{RenderSink, ShaderHandle, VertexBatch};

/// Length of a tracer in world units.
const TRACER_LENGTH: f32 = 2.0;

/// Width of a tracer in world units.
const TRACER_WIDTH: f32 = 0.3;

/// Sparks spawned on impact.
const HIT_SPARKS: u32 = 12;

/// Parameters of a new round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmmoParams {
    /// Muzzle position.
    pub position: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// Seconds before the round expires.
    pub lifetime: f32,
    /// Damage dealt on hit.
    pub damage: f32,
    /// Entity that fired the round. It is never hit by its own ammo.
    pub owner: Option<EntityId>,
    /// Tracer colour.
    pub colour: Colour,
}

impl Default for AmmoParams {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            lifetime: 1.0,
            damage: 0.0,
            owner: None,
            colour: Colour::WHITE,
        }
    }
}

/// A sphere ammo can hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTarget {
    /// Entity hit.
    pub id: EntityId,
    /// Sphere centre.
    pub position: Vec3,
    /// Sphere radius.
    pub radius: f32,
}

impl HitTarget {
    /// Parameter in `[0, 1]` of the first point of `start..end` inside the
    /// sphere, if the segment touches it.
    #[must_use]
    pub fn intersect_segment(&self, start: Vec3, end: Vec3) -> Option<f32> {
        let d = end - start;
        let f = start - self.position;
        let c = f.length_squared() - self.radius * self.radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let a = d.length_squared();
        if a <= f32::EPSILON {
            return None;
        }
        let b = 2.0 * f.dot(d);
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        (0.0..=1.0).contains(&t).then_some(t)
    }
}

/// A round striking a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmmoHit {
    /// Entity hit.
    pub target: EntityId,
    /// Entity that fired the round.
    pub owner: Option<EntityId>,
    /// Impact point.
    pub position: Vec3,
    /// Damage carried by the round.
    pub damage: f32,
}

#[derive(Debug, Default)]
struct Ammo {
    position: Vec3,
    velocity: Vec3,
    remaining: f32,
    damage: f32,
    owner: Option<EntityId>,
    colour: Colour,
}

impl Poolable for Ammo {
    fn tick(&mut self, delta: f32) -> bool {
        self.position += self.velocity * delta;
        self.remaining -= delta;
        self.remaining > 0.0
    }
}

/// Owner of all live projectile rounds.
#[derive(Debug)]
pub struct AmmoManager {
    rounds: Pool<Ammo>,
}

impl AmmoManager {
    /// Create a manager with room for `capacity` rounds.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            rounds: Pool::new(capacity, AllocationPolicy::EvictOldest, "ammo"),
        }
    }

    /// Fire a round. Evicts the oldest round when full.
    pub fn create(&mut self, params: AmmoParams) -> Option<usize> {
        self.rounds.allocate(|ammo| {
            ammo.position = params.position;
            ammo.velocity = params.velocity;
            ammo.remaining = params.lifetime;
            ammo.damage = params.damage;
            ammo.owner = params.owner;
            ammo.colour = params.colour;
        })
    }

    /// Remove a round before it expires.
    pub fn kill(&mut self, index: usize) -> bool {
        self.rounds.kill(index)
    }

    /// Number of live rounds.
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.rounds.active_count()
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.rounds.capacity()
    }

    /// Position of the round in slot `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.rounds.get(index).map(|ammo| ammo.position)
    }

    /// Move every round, resolve hits and expire spent rounds.
    ///
    /// Each round hits at most one target: the first one along its path
    /// this tick.
    pub fn update(
        &mut self,
        delta: f32,
        targets: &[HitTarget],
        particles: &mut ParticleManager,
    ) -> Vec<AmmoHit> {
        let mut hits = Vec::new();
        self.rounds.update_with(|_, ammo| {
            let start = ammo.position;
            let alive = ammo.tick(delta);
            let end = ammo.position;

            let nearest = targets
                .iter()
                .filter(|target| Some(target.id) != ammo.owner)
                .filter_map(|target| target.intersect_segment(start, end).map(|t| (t, target)))
                .min_by(|a, b| a.0.total_cmp(&b.0));

            if let Some((t, target)) = nearest {
                let position = start.lerp(end, t);
                hits.push(AmmoHit {
                    target: target.id,
                    owner: ammo.owner,
                    position,
                    damage: ammo.damage,
                });
                particles.get_available_emitter(EmitterParams {
                    position,
                    colour: ammo.colour,
                    spawn: SpawnPolicy::Burst { count: HIT_SPARKS },
                    particle_lifetime: 0.5,
                    speed: 15.0,
                    size: 0.4,
                    ..EmitterParams::default()
                });
                return false;
            }
            alive
        });
        if !hits.is_empty() {
            tracing::debug!(hits = hits.len(), "Ammo hits resolved");
        }
        hits
    }

    /// Draw every live round as a tracer in one call.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let mut batch = VertexBatch::with_quad_capacity(self.rounds.active_count());
        for (_, ammo) in self.rounds.iter_active() {
            let tail = ammo.position - ammo.velocity.normalize_or_zero() * TRACER_LENGTH;
            batch.push_segment(tail, ammo.position, TRACER_WIDTH, TRACER_WIDTH, ammo.colour);
        }
        if !batch.is_empty() {
            sink.draw(ShaderHandle::AMMO, &batch);
        }
    }

    /// Drop every round.
    pub fn clear(&mut self) {
        self.rounds.clear();
    }
}
