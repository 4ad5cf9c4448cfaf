//! All effect managers bundled together.

use crate::ammo::AmmoManager;
use crate::config::EngineConfig;
use crate::laser::LaserManager;
use crate::particle::ParticleManager;
use crate::render::RenderSink;
use crate::trail::TrailManager;

/// The four effect managers with a shared pause switch.
///
/// While paused, [`Effects::update`] does nothing but [`Effects::render`]
/// still draws the frozen state.
#[derive(Debug)]
pub struct Effects {
    /// Projectile rounds.
    pub ammo: AmmoManager,
    /// Particle emitters.
    pub particles: ParticleManager,
    /// Laser beams.
    pub lasers: LaserManager,
    /// Decaying trails.
    pub trails: TrailManager,
    paused: bool,
}

impl Effects {
    /// Create managers sized from `config`.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ammo: AmmoManager::new(config.ammo_capacity),
            particles: ParticleManager::new(
                config.particle_emitter_capacity,
                config.particles_per_emitter,
            ),
            lasers: LaserManager::new(config.laser_capacity),
            trails: TrailManager::new(config.max_trail_age),
            paused: false,
        }
    }

    /// Whether updates are suspended.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspend or resume updates.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            tracing::debug!(paused, "Effects pause toggled");
        }
        self.paused = paused;
    }

    /// Advance particles, lasers and trails.
    ///
    /// Ammo is advanced separately through [`AmmoManager::update`] because
    /// it needs the current hit targets.
    pub fn update(&mut self, delta: f32) {
        if self.paused {
            return;
        }
        self.particles.update(delta);
        self.lasers.update(delta);
        self.trails.update(delta);
    }

    /// Draw every manager, trails first so sparks land on top.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        self.trails.render(sink);
        self.ammo.render(sink);
        self.lasers.render(sink);
        self.particles.render(sink);
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
