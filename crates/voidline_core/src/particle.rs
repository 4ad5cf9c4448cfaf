//! Particle emitters.
//!
//! Each emitter owns a bounded particle buffer and a spawn policy. Emitters
//! live in an evicting [`Pool`]: requesting one never fails, at worst the
//! oldest effect is cut short. An emitter stays live until its own
//! lifetime has ended and every particle it spawned has died.

use crate::math::{Colour, Vec3};
use crate::pool::{AllocationPolicy, Pool, Poolable};
use crate::render::{RenderSink, ShaderHandle, VertexBatch};

/// How an emitter spawns particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPolicy {
    /// Emit `rate` particles per second until the emitter lifetime ends.
    Continuous {
        /// Particles per second.
        rate: f32,
    },
    /// Emit `count` particles at once when the emitter starts.
    Burst {
        /// Particles in the burst.
        count: u32,
    },
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::Burst { count: 1 }
    }
}

/// Parameters of a new emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterParams {
    /// Spawn point.
    pub position: Vec3,
    /// Main emission direction. Zero emits in random directions.
    pub direction: Vec3,
    /// Velocity added to every particle, e.g. the ship's own motion.
    pub inherited_velocity: Vec3,
    /// Particle colour at birth. Alpha fades to zero over its life.
    pub colour: Colour,
    /// Spawn policy.
    pub spawn: SpawnPolicy,
    /// Seconds a particle lives.
    pub particle_lifetime: f32,
    /// Particle speed along the emission direction.
    pub speed: f32,
    /// Random deviation from `direction`, 0 for a perfect jet.
    pub spread: f32,
    /// Sprite size.
    pub size: f32,
    /// Seconds a continuous emitter keeps spawning.
    pub emitter_lifetime: f32,
}

impl Default for EmitterParams {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
            inherited_velocity: Vec3::ZERO,
            colour: Colour::WHITE,
            spawn: SpawnPolicy::default(),
            particle_lifetime: 1.0,
            speed: 1.0,
            spread: 1.0,
            size: 1.0,
            emitter_lifetime: 0.0,
        }
    }
}

/// Xorshift64 generator. Deterministic per seed.
#[derive(Debug, Clone, Copy)]
struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift.
        Self(seed | 1)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in `[0, 1)`.
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform in `[-1, 1)`.
    fn next_signed(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }

    fn next_in(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_f32()
    }
}

impl Default for XorShift {
    fn default() -> Self {
        Self::new(0x9E37_79B9_7F4A_7C15)
    }
}

/// A single particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World position.
    pub position: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// Seconds left.
    pub remaining: f32,
    /// Seconds at birth.
    pub lifetime: f32,
}

/// Pooled particle emitter.
#[derive(Debug, Default)]
pub struct ParticleEmitter {
    params: EmitterParams,
    particles: Vec<Particle>,
    budget: usize,
    age: f32,
    spawn_accumulator: f32,
    rng: XorShift,
}

impl ParticleEmitter {
    fn start(&mut self, mut params: EmitterParams, budget: usize, seed: u64) {
        if let SpawnPolicy::Continuous { rate } = params.spawn {
            if !(rate.is_finite() && rate >= 0.0) {
                tracing::warn!(rate, "Invalid continuous spawn rate, emitter will not spawn");
                params.spawn = SpawnPolicy::Continuous { rate: 0.0 };
            }
        }
        self.params = params;
        self.budget = budget;
        self.rng = XorShift::new(seed);
        if let SpawnPolicy::Burst { count } = params.spawn {
            for _ in 0..count {
                if !self.spawn() {
                    break;
                }
            }
        }
    }

    fn spawn(&mut self) -> bool {
        if self.particles.len() >= self.budget {
            return false;
        }
        let p = &self.params;
        let jitter = Vec3::new(
            self.rng.next_signed(),
            self.rng.next_signed(),
            self.rng.next_signed(),
        ) * p.spread;
        let direction = (p.direction.normalize_or_zero() + jitter).normalize_or_zero();
        let speed = p.speed * self.rng.next_in(0.5, 1.0);
        let lifetime = p.particle_lifetime * self.rng.next_in(0.75, 1.0);
        self.particles.push(Particle {
            position: p.position,
            velocity: direction * speed + p.inherited_velocity,
            remaining: lifetime,
            lifetime,
        });
        true
    }

    /// Emitter parameters.
    #[must_use]
    pub const fn params(&self) -> &EmitterParams {
        &self.params
    }

    /// Move the spawn point, e.g. to follow a ship.
    pub fn set_position(&mut self, position: Vec3) {
        self.params.position = position;
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    fn emitting(&self) -> bool {
        matches!(self.params.spawn, SpawnPolicy::Continuous { .. })
            && self.age < self.params.emitter_lifetime
    }

    fn render_into(&self, batch: &mut VertexBatch) {
        for particle in &self.particles {
            let life = if particle.lifetime > 0.0 {
                particle.remaining / particle.lifetime
            } else {
                0.0
            };
            batch.push_sprite(particle.position, self.params.size, self.params.colour.faded(life));
        }
    }
}

impl Poolable for ParticleEmitter {
    fn tick(&mut self, delta: f32) -> bool {
        if let SpawnPolicy::Continuous { rate } = self.params.spawn {
            if self.emitting() {
                self.spawn_accumulator += rate * delta;
                while self.spawn_accumulator >= 1.0 {
                    if !self.spawn() {
                        // Budget full: the backlog is dropped, not replayed.
                        self.spawn_accumulator = self.spawn_accumulator.fract();
                        break;
                    }
                    self.spawn_accumulator -= 1.0;
                }
            }
        }
        self.age += delta;

        for particle in &mut self.particles {
            particle.remaining -= delta;
            particle.position += particle.velocity * delta;
        }
        self.particles.retain(|p| p.remaining > 0.0);

        self.emitting() || !self.particles.is_empty()
    }

    fn reset(&mut self) {
        self.params = EmitterParams::default();
        self.particles.clear();
        self.budget = 0;
        self.age = 0.0;
        self.spawn_accumulator = 0.0;
    }
}

/// Owner of all particle emitters.
#[derive(Debug)]
pub struct ParticleManager {
    emitters: Pool<ParticleEmitter>,
    particles_per_emitter: usize,
    next_seed: u64,
}

impl ParticleManager {
    /// Create a manager with `emitter_capacity` emitters of
    /// `particles_per_emitter` particles each.
    #[must_use]
    pub fn new(emitter_capacity: usize, particles_per_emitter: usize) -> Self {
        Self {
            emitters: Pool::new(emitter_capacity, AllocationPolicy::EvictOldest, "particle"),
            particles_per_emitter,
            next_seed: 1,
        }
    }

    /// Start an emitter. A burst spawns its particles immediately.
    ///
    /// Evicts the oldest emitter when all are busy, so this only returns
    /// `None` for a manager with no emitter slots.
    pub fn get_available_emitter(&mut self, params: EmitterParams) -> Option<usize> {
        // Splitmix step so neighbouring emitters do not share a sequence.
        self.next_seed = self.next_seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let seed = self.next_seed;
        let budget = self.particles_per_emitter;
        self.emitters
            .allocate(|emitter| emitter.start(params, budget, seed))
    }

    /// Live emitter in slot `index`.
    #[must_use]
    pub fn emitter(&self, index: usize) -> Option<&ParticleEmitter> {
        self.emitters.get(index)
    }

    /// Live emitter in slot `index`, mutably.
    pub fn emitter_mut(&mut self, index: usize) -> Option<&mut ParticleEmitter> {
        self.emitters.get_mut(index)
    }

    /// Stop an emitter and drop its particles.
    pub fn kill(&mut self, index: usize) -> bool {
        self.emitters.kill(index)
    }

    /// Number of emitter slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.emitters.capacity()
    }

    /// Number of live emitters.
    #[must_use]
    pub const fn active_emitters(&self) -> usize {
        self.emitters.active_count()
    }

    /// Number of live particles over all emitters.
    #[must_use]
    pub fn active_particles(&self) -> usize {
        self.emitters
            .iter_active()
            .map(|(_, e)| e.particles.len())
            .sum()
    }

    /// Advance every emitter.
    pub fn update(&mut self, delta: f32) {
        self.emitters.update(delta);
    }

    /// Draw every live particle in one call.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let mut batch = VertexBatch::with_quad_capacity(self.active_particles());
        for (_, emitter) in self.emitters.iter_active() {
            emitter.render_into(&mut batch);
        }
        if !batch.is_empty() {
            sink.draw(ShaderHandle::PARTICLE, &batch);
        }
    }

    /// Drop every emitter.
    pub fn clear(&mut self) {
        self.emitters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst(count: u32) -> EmitterParams {
        EmitterParams {
            spawn: SpawnPolicy::Burst { count },
            particle_lifetime: 1.0,
            ..EmitterParams::default()
        }
    }

    #[test]
    fn test_burst_spawns_immediately() {
        let mut particles = ParticleManager::new(4, 16);
        let slot = particles.get_available_emitter(burst(5)).unwrap();
        assert_eq!(particles.emitter(slot).unwrap().particles().len(), 5);
    }

    #[test]
    fn test_burst_capped_by_budget() {
        let mut particles = ParticleManager::new(4, 3);
        particles.get_available_emitter(burst(10));
        assert_eq!(particles.active_particles(), 3);
    }

    #[test]
    fn test_emitter_dies_with_last_particle() {
        let mut particles = ParticleManager::new(4, 16);
        particles.get_available_emitter(burst(5));
        particles.update(0.5);
        assert_eq!(particles.active_emitters(), 1);
        particles.update(0.6);
        assert_eq!(particles.active_emitters(), 0);
        assert_eq!(particles.active_particles(), 0);
    }

    #[test]
    fn test_continuous_emitter_spawns_at_rate() {
        let mut particles = ParticleManager::new(4, 64);
        let slot = particles
            .get_available_emitter(EmitterParams {
                spawn: SpawnPolicy::Continuous { rate: 10.0 },
                particle_lifetime: 5.0,
                emitter_lifetime: 1.0,
                ..EmitterParams::default()
            })
            .unwrap();
        for _ in 0..5 {
            particles.update(0.1);
        }
        let count = particles.emitter(slot).unwrap().particles().len();
        assert!((4..=5).contains(&count), "spawned {count}");

        // Stops spawning after its lifetime, then drains.
        for _ in 0..10 {
            particles.update(0.1);
        }
        let count = particles.emitter(slot).unwrap().particles().len();
        assert!(count <= 11);
        particles.update(10.0);
        assert_eq!(particles.active_emitters(), 0);
    }

    #[test]
    fn test_continuous_emitter_bounded_by_budget() {
        let mut particles = ParticleManager::new(1, 4);
        let slot = particles
            .get_available_emitter(EmitterParams {
                spawn: SpawnPolicy::Continuous { rate: 2.0e8 },
                particle_lifetime: 5.0,
                emitter_lifetime: 10.0,
                ..EmitterParams::default()
            })
            .unwrap();
        particles.update(1.0);
        assert_eq!(particles.emitter(slot).unwrap().particles().len(), 4);
        particles.update(1.0);
        assert_eq!(particles.emitter(slot).unwrap().particles().len(), 4);
    }

    #[test]
    fn test_invalid_rate_spawns_nothing() {
        let mut particles = ParticleManager::new(3, 4);
        for rate in [f32::INFINITY, f32::NAN, -5.0] {
            let slot = particles
                .get_available_emitter(EmitterParams {
                    spawn: SpawnPolicy::Continuous { rate },
                    emitter_lifetime: 2.0,
                    ..EmitterParams::default()
                })
                .unwrap();
            assert_eq!(
                particles.emitter(slot).unwrap().params().spawn,
                SpawnPolicy::Continuous { rate: 0.0 }
            );
        }
        particles.update(1.0);
        assert_eq!(particles.active_particles(), 0);
        particles.update(1.5);
        assert_eq!(particles.active_emitters(), 0);
    }

    #[test]
    fn test_emitters_evict_oldest() {
        let mut particles = ParticleManager::new(2, 4);
        assert_eq!(particles.get_available_emitter(burst(1)), Some(0));
        assert_eq!(particles.get_available_emitter(burst(1)), Some(1));
        assert_eq!(particles.get_available_emitter(burst(2)), Some(0));
        assert_eq!(particles.active_emitters(), 2);
        assert_eq!(particles.emitter(0).unwrap().particles().len(), 2);
    }

    #[test]
    fn test_particles_inherit_velocity() {
        let mut particles = ParticleManager::new(1, 8);
        let slot = particles
            .get_available_emitter(EmitterParams {
                inherited_velocity: Vec3::new(100.0, 0.0, 0.0),
                speed: 0.0,
                spawn: SpawnPolicy::Burst { count: 3 },
                ..EmitterParams::default()
            })
            .unwrap();
        for particle in particles.emitter(slot).unwrap().particles() {
            assert_eq!(particle.velocity, Vec3::new(100.0, 0.0, 0.0));
        }
    }

    #[test]
    fn test_rng_is_deterministic() {
        let mut a = XorShift::new(42);
        let mut b = XorShift::new(42);
        for _ in 0..16 {
            let x = a.next_f32();
            assert_eq!(x, b.next_f32());
            assert!((0.0..1.0).contains(&x));
        }
    }
}
