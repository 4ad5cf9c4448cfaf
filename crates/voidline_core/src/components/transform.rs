//! Placement and idle-motion components.

use std::f32::consts::TAU;

use crate::component::{kind_casts, ComponentDocument, ComponentHeader, ComponentKind, ComponentType};
use crate::error::Result;
use crate::math::Vec3;

/// World placement and motion of an entity.
///
/// Velocity is simulation state and is not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    header: ComponentHeader,
    /// World position.
    pub position: Vec3,
    /// Unit heading.
    pub forward: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
}

impl Transform {
    /// Create a transform at a position, facing +Z.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Move by the current velocity.
    pub fn integrate(&mut self, delta: f32) {
        self.position += self.velocity * delta;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            position: Vec3::ZERO,
            forward: Vec3::FORWARD,
            velocity: Vec3::ZERO,
        }
    }
}

impl ComponentKind for Transform {
    const TYPE: ComponentType = ComponentType::Transform;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("position", self.position);
        doc.set("forward", self.forward);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        self.position = doc.get_or("position", Vec3::ZERO)?;
        let forward = doc.get_or("forward", Vec3::FORWARD)?.normalize_or_zero();
        self.forward = if forward == Vec3::ZERO { Vec3::FORWARD } else { forward };
        self.velocity = Vec3::ZERO;
        Ok(())
    }

    kind_casts!(Transform);
}

/// Sinusoidal bobbing along the up axis, applied to the rendered model.
#[derive(Debug, Clone, PartialEq)]
pub struct Sway {
    header: ComponentHeader,
    /// Peak displacement in world units.
    pub amplitude: f32,
    /// Oscillations per second.
    pub frequency: f32,
    phase: f32,
}

impl Sway {
    /// Create a sway component.
    #[must_use]
    pub fn new(amplitude: f32, frequency: f32) -> Self {
        Self {
            amplitude,
            frequency,
            ..Self::default()
        }
    }

    /// Advance the oscillation.
    pub fn update(&mut self, delta: f32) {
        self.phase = (self.phase + self.frequency * delta).fract();
    }

    /// Current displacement.
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        Vec3::UP * (self.amplitude * (self.phase * TAU).sin())
    }
}

impl Default for Sway {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            amplitude: 0.25,
            frequency: 0.5,
            phase: 0.0,
        }
    }
}

impl ComponentKind for Sway {
    const TYPE: ComponentType = ComponentType::Sway;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("amplitude", self.amplitude);
        doc.set("frequency", self.frequency);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        self.amplitude = doc.get("amplitude")?;
        self.frequency = doc.get("frequency")?;
        self.phase = 0.0;
        Ok(())
    }

    kind_casts!(Sway);
}
