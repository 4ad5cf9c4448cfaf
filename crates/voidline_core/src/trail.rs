//! Decaying trails.
//!
//! A trail is a strip of sample points whose widths shrink to zero over the
//! trail lifetime. The producer (usually a [`TrailEmitter`]) feeds points
//! through a [`TrailHandle`] and may disappear at any time: detaching
//! orphans the trail, which then fades out and is removed by the manager
//! once it has no points left. That is the only way a trail is destroyed.
//!
//! Handles are generational keys. A handle to a removed trail resolves to
//! nothing, never to a newer trail that reused the slot.
//!
//! [`TrailEmitter`]: crate::components::TrailEmitter

use std::collections::VecDeque;

use slotmap::{new_key_type, SlotMap};

use crate::error::{GameError, Result};
use crate::math::{Colour, Vec3};
use crate::render::{RenderSink, ShaderHandle, VertexBatch};

new_key_type! {
    /// Weak reference to a trail in a [`TrailManager`].
    pub struct TrailHandle;
}

/// Minimum distance between committed samples, in world units.
pub const TRAIL_POINT_SPACING: f32 = 1.0;

/// Fraction of the lifetime below which a point counts as expired. Absorbs
/// float drift when many small deltas sum to the lifetime.
const EXPIRY_FRACTION: f32 = 1e-4;

/// One sample of a trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    /// World position.
    pub position: Vec3,
    /// Current width.
    pub width: f32,
    /// Seconds until the point vanishes.
    pub remaining: f32,
}

/// A fading strip of points. `points[0]` is the live end.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
    initial_width: f32,
    lifetime: f32,
    colour: Colour,
    orphan: bool,
    producers: u32,
    age: f32,
}

impl Trail {
    fn new(initial_width: f32, lifetime: f32, colour: Colour) -> Self {
        Self {
            points: VecDeque::new(),
            initial_width,
            lifetime,
            colour,
            orphan: false,
            producers: 1,
            age: 0.0,
        }
    }

    fn fresh_point(&self, position: Vec3) -> TrailPoint {
        TrailPoint {
            position,
            width: self.initial_width,
            remaining: self.lifetime,
        }
    }

    /// Append a sample at the live end. Returns `false` if orphaned.
    ///
    /// The head point follows the producer; a new head is committed only
    /// once it is more than [`TRAIL_POINT_SPACING`] from the previous
    /// sample, so point density does not depend on frame rate.
    pub fn add_point(&mut self, position: Vec3) -> bool {
        if self.orphan {
            return false;
        }
        let point = self.fresh_point(position);
        if self.points.len() < 2 {
            self.points.push_front(point);
            return true;
        }

        self.points[0] = point;
        if self.points[0].position.distance(self.points[1].position) > TRAIL_POINT_SPACING {
            self.points.push_front(point);
        }
        true
    }

    /// Age every point and drop the expired ones.
    pub fn update(&mut self, delta: f32) {
        let (initial_width, lifetime) = (self.initial_width, self.lifetime);
        for point in &mut self.points {
            point.remaining -= delta;
            if point.remaining <= lifetime * EXPIRY_FRACTION {
                point.remaining = 0.0;
            }
            point.width = initial_width * point.remaining / lifetime;
        }
        self.points.retain(|p| p.width > 0.0);
    }

    /// Stop accepting points. The trail fades out on its own.
    pub fn set_orphan(&mut self) {
        self.orphan = true;
    }

    /// Whether the producer has detached.
    #[must_use]
    pub const fn is_orphan(&self) -> bool {
        self.orphan
    }

    /// Number of points still visible.
    #[must_use]
    pub fn active_points(&self) -> usize {
        self.points.len()
    }

    /// Points, live end first.
    pub fn points(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    /// Width of a freshly added point.
    #[must_use]
    pub const fn initial_width(&self) -> f32 {
        self.initial_width
    }

    /// Seconds a point takes to fade.
    #[must_use]
    pub const fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Trail colour.
    #[must_use]
    pub const fn colour(&self) -> Colour {
        self.colour
    }

    /// Number of producers still feeding the trail.
    #[must_use]
    pub const fn producers(&self) -> u32 {
        self.producers
    }

    /// Seconds since the trail was created.
    #[must_use]
    pub const fn age(&self) -> f32 {
        self.age
    }

    fn render_into(&self, batch: &mut VertexBatch) {
        for (head, tail) in self.points.iter().zip(self.points.iter().skip(1)) {
            let fade = if self.initial_width > 0.0 {
                head.width / self.initial_width
            } else {
                0.0
            };
            batch.push_segment(
                tail.position,
                head.position,
                tail.width,
                head.width,
                self.colour.faded(fade),
            );
        }
    }
}

/// Owner of every trail.
#[derive(Debug)]
pub struct TrailManager {
    trails: SlotMap<TrailHandle, Trail>,
    max_age: Option<f32>,
}

impl TrailManager {
    /// Create a manager.
    ///
    /// A trail older than `max_age` seconds is orphaned even if its
    /// producer never detached. `None` lets such trails live forever.
    #[must_use]
    pub fn new(max_age: Option<f32>) -> Self {
        Self {
            trails: SlotMap::with_key(),
            max_age,
        }
    }

    /// Create a trail with one producer.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidArgument`] if `lifetime` is not a
    /// positive finite number or `initial_width` is negative or not finite.
    pub fn add(&mut self, initial_width: f32, lifetime: f32, colour: Colour) -> Result<TrailHandle> {
        if !(lifetime.is_finite() && lifetime > 0.0) {
            return Err(GameError::InvalidArgument(format!(
                "trail lifetime must be positive, got {lifetime}"
            )));
        }
        if !(initial_width.is_finite() && initial_width >= 0.0) {
            return Err(GameError::InvalidArgument(format!(
                "trail width must be non-negative, got {initial_width}"
            )));
        }
        Ok(self.trails.insert(Trail::new(initial_width, lifetime, colour)))
    }

    /// Feed a point. `false` for a stale handle or an orphaned trail.
    pub fn add_point(&mut self, handle: TrailHandle, position: Vec3) -> bool {
        self.trails
            .get_mut(handle)
            .is_some_and(|trail| trail.add_point(position))
    }

    /// Orphan a trail regardless of its producer count.
    pub fn set_orphan(&mut self, handle: TrailHandle) -> bool {
        match self.trails.get_mut(handle) {
            Some(trail) => {
                trail.set_orphan();
                true
            }
            None => false,
        }
    }

    /// Register another producer. Fails for an orphaned or removed trail.
    pub fn retain(&mut self, handle: TrailHandle) -> bool {
        match self.trails.get_mut(handle) {
            Some(trail) if !trail.orphan => {
                trail.producers += 1;
                true
            }
            _ => false,
        }
    }

    /// Drop a producer; the last one leaving orphans the trail.
    pub fn release(&mut self, handle: TrailHandle) -> bool {
        let Some(trail) = self.trails.get_mut(handle) else {
            return false;
        };
        trail.producers = trail.producers.saturating_sub(1);
        if trail.producers == 0 {
            trail.set_orphan();
        }
        true
    }

    /// Whether `handle` still refers to a trail.
    #[must_use]
    pub fn contains(&self, handle: TrailHandle) -> bool {
        self.trails.contains_key(handle)
    }

    /// Trail behind `handle`.
    #[must_use]
    pub fn get(&self, handle: TrailHandle) -> Option<&Trail> {
        self.trails.get(handle)
    }

    /// Number of trails, fading ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trails.len()
    }

    /// Whether there are no trails.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    /// Iterate every trail.
    pub fn iter(&self) -> impl Iterator<Item = (TrailHandle, &Trail)> {
        self.trails.iter()
    }

    /// Fade every trail, then remove those that are orphaned and empty.
    pub fn update(&mut self, delta: f32) {
        for (handle, trail) in &mut self.trails {
            trail.age += delta;
            if let Some(max_age) = self.max_age {
                if !trail.orphan && trail.age > max_age {
                    tracing::warn!(
                        ?handle,
                        age = trail.age,
                        producers = trail.producers,
                        "Trail exceeded maximum age, orphaning"
                    );
                    trail.set_orphan();
                }
            }
            trail.update(delta);
        }

        let before = self.trails.len();
        self.trails
            .retain(|_, trail| !(trail.orphan && trail.points.is_empty()));
        let removed = before - self.trails.len();
        if removed > 0 {
            tracing::trace!(removed, remaining = self.trails.len(), "Removed faded trails");
        }
    }

    /// Draw every trail in one call.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let segments: usize = self
            .trails
            .values()
            .map(|t| t.points.len().saturating_sub(1))
            .sum();
        let mut batch = VertexBatch::with_quad_capacity(segments);
        for trail in self.trails.values() {
            trail.render_into(&mut batch);
        }
        if !batch.is_empty() {
            sink.draw(ShaderHandle::TRAIL, &batch);
        }
    }

    /// Remove every trail.
    pub fn clear(&mut self) {
        self.trails.clear();
    }
}
