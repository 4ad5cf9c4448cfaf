//! Laser beams.
//!
//! Lasers are a visual batch only; damage is resolved instantly by the
//! caller when the beam is fired. The buffer has a hard ceiling: past it,
//! new beams are dropped with a warning instead of cutting existing ones
//! short.

use crate::math::{Colour, Vec3};
use crate::pool::{AllocationPolicy, Pool, Poolable};
use crate::render::{RenderSink, ShaderHandle, VertexBatch};

/// Parameters of a new beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaserParams {
    /// Muzzle position.
    pub start: Vec3,
    /// Beam end, the impact point or the end of its range.
    pub end: Vec3,
    /// Beam width.
    pub width: f32,
    /// Beam colour.
    pub colour: Colour,
    /// Seconds the beam stays visible.
    pub duration: f32,
}

impl Default for LaserParams {
    fn default() -> Self {
        Self {
            start: Vec3::ZERO,
            end: Vec3::ZERO,
            width: 0.5,
            colour: Colour::new(1.0, 0.2, 0.2, 1.0),
            duration: 0.15,
        }
    }
}

#[derive(Debug, Default)]
struct Laser {
    params: Option<LaserParams>,
    remaining: f32,
}

impl Poolable for Laser {
    fn tick(&mut self, delta: f32) -> bool {
        self.remaining -= delta;
        self.remaining > 0.0
    }
}

/// Owner of all visible beams.
#[derive(Debug)]
pub struct LaserManager {
    beams: Pool<Laser>,
}

impl LaserManager {
    /// Create a manager with room for `capacity` beams.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            beams: Pool::new(capacity, AllocationPolicy::RejectAndLog, "laser"),
        }
    }

    /// Show a beam. Returns `None`, with a warning, when the buffer is full.
    pub fn fire(&mut self, params: LaserParams) -> Option<usize> {
        self.beams.allocate(|laser| {
            laser.params = Some(params);
            laser.remaining = params.duration;
        })
    }

    /// Number of visible beams.
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.beams.active_count()
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.beams.capacity()
    }

    /// Fade beams and drop expired ones.
    pub fn update(&mut self, delta: f32) {
        self.beams.update(delta);
    }

    /// Draw every visible beam in one call.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let mut batch = VertexBatch::with_quad_capacity(self.beams.active_count());
        for (_, laser) in self.beams.iter_active() {
            let Some(p) = laser.params else { continue };
            let fade = if p.duration > 0.0 { laser.remaining / p.duration } else { 0.0 };
            batch.push_segment(p.start, p.end, p.width, p.width, p.colour.faded(fade));
        }
        if !batch.is_empty() {
            sink.draw(ShaderHandle::LASER, &batch);
        }
    }

    /// Drop every beam.
    pub fn clear(&mut self) {
        self.beams.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam() -> LaserParams {
        LaserParams {
            end: Vec3::new(0.0, 0.0, 100.0),
            ..LaserParams::default()
        }
    }

    #[test]
    fn test_full_buffer_rejects() {
        let mut lasers = LaserManager::new(2);
        assert_eq!(lasers.fire(beam()), Some(0));
        assert_eq!(lasers.fire(beam()), Some(1));
        assert_eq!(lasers.fire(beam()), None);
        assert_eq!(lasers.active_count(), 2);
    }

    #[test]
    fn test_slot_reusable_after_expiry() {
        let mut lasers = LaserManager::new(1);
        lasers.fire(beam());
        lasers.update(1.0);
        assert_eq!(lasers.active_count(), 0);
        assert_eq!(lasers.fire(beam()), Some(0));
    }
}
