//! Propulsion.

use crate::component::{kind_casts, ComponentDocument, ComponentHeader, ComponentKind, ComponentType};
use crate::components::Transform;
use crate::error::Result;
use crate::math::{Colour, Vec3};
use crate::particle::{EmitterParams, ParticleManager, SpawnPolicy};

/// Minimum seconds between exhaust puffs at any throttle.
const EXHAUST_INTERVAL: f32 = 0.05;

/// Accelerates the entity along its heading and emits exhaust.
///
/// Throttle is a runtime control and resets to zero on load.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    header: ComponentHeader,
    /// Acceleration at full throttle, units per second squared.
    pub thrust: f32,
    /// Speed cap, units per second.
    pub max_speed: f32,
    /// Exhaust position relative to the entity, along its heading.
    pub exhaust_offset: Vec3,
    /// Exhaust particle colour.
    pub exhaust_colour: Colour,
    throttle: f32,
    exhaust_timer: f32,
}

impl Engine {
    /// Create an engine.
    #[must_use]
    pub fn new(thrust: f32, max_speed: f32) -> Self {
        Self {
            thrust,
            max_speed,
            ..Self::default()
        }
    }

    /// Current throttle in `[0, 1]`.
    #[must_use]
    pub const fn throttle(&self) -> f32 {
        self.throttle
    }

    /// Set the throttle, clamped to `[0, 1]`.
    pub fn set_throttle(&mut self, throttle: f32) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    /// Accelerate `transform` and emit exhaust puffs.
    pub fn update(&mut self, delta: f32, transform: &mut Transform, particles: &mut ParticleManager) {
        if self.throttle <= 0.0 {
            self.exhaust_timer = 0.0;
            return;
        }

        transform.velocity += transform.forward * (self.thrust * self.throttle * delta);
        let speed = transform.velocity.length();
        if speed > self.max_speed && speed > 0.0 {
            transform.velocity = transform.velocity * (self.max_speed / speed);
        }

        self.exhaust_timer -= delta;
        if self.exhaust_timer <= 0.0 {
            // At most one puff per tick; a long frame does not catch up.
            self.exhaust_timer = self.exhaust_timer.max(0.0) + EXHAUST_INTERVAL;
            let count = 1 + (self.throttle * 3.0).round() as u32;
            let nozzle = transform.position - transform.forward * self.exhaust_offset.z
                + Vec3::UP * self.exhaust_offset.y;
            particles.get_available_emitter(EmitterParams {
                position: nozzle,
                direction: -transform.forward,
                inherited_velocity: transform.velocity * 0.5,
                colour: self.exhaust_colour,
                spawn: SpawnPolicy::Burst { count },
                particle_lifetime: 0.4,
                speed: 6.0,
                spread: 0.2,
                size: 0.6,
                ..EmitterParams::default()
            });
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            thrust: 20.0,
            max_speed: 60.0,
            exhaust_offset: Vec3::new(0.0, 0.0, 3.0),
            exhaust_colour: Colour::new(1.0, 0.6, 0.2, 1.0),
            throttle: 0.0,
            exhaust_timer: 0.0,
        }
    }
}

impl ComponentKind for Engine {
    const TYPE: ComponentType = ComponentType::Engine;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("thrust", self.thrust);
        doc.set("max_speed", self.max_speed);
        doc.set("exhaust_offset", self.exhaust_offset);
        doc.set("exhaust_colour", self.exhaust_colour);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        let defaults = Self::default();
        self.thrust = doc.get("thrust")?;
        self.max_speed = doc.get("max_speed")?;
        self.exhaust_offset = doc.get_or("exhaust_offset", defaults.exhaust_offset)?;
        self.exhaust_colour = doc.get_or("exhaust_colour", defaults.exhaust_colour)?;
        self.throttle = 0.0;
        self.exhaust_timer = 0.0;
        Ok(())
    }

    kind_casts!(Engine);
}
