//! Trail-emitting component.

use crate::component::{kind_casts, ComponentDocument, ComponentHeader, ComponentKind, ComponentType};
use crate::error::{GameError, Result};
use crate::math::{Colour, Vec3};
use crate::trail::{TrailHandle, TrailManager};

/// Feeds a trail in the [`TrailManager`] from the entity's position.
///
/// The trail handle is not persisted and is not copied by `clone`: a copy
/// is a fresh producer that opens its own trail on first update.
#[derive(Debug, PartialEq)]
pub struct TrailEmitter {
    header: ComponentHeader,
    /// Width of a new point.
    pub width: f32,
    /// Seconds a point takes to fade.
    pub lifetime: f32,
    /// Trail colour.
    pub colour: Colour,
    /// Emission point relative to the entity, along its heading.
    pub offset: Vec3,
    handle: Option<TrailHandle>,
}

impl TrailEmitter {
    /// Create a trail emitter.
    #[must_use]
    pub fn new(width: f32, lifetime: f32, colour: Colour) -> Self {
        Self {
            width,
            lifetime,
            colour,
            ..Self::default()
        }
    }

    /// Trail currently being fed, if any.
    #[must_use]
    pub const fn handle(&self) -> Option<TrailHandle> {
        self.handle
    }

    /// Append the current emission point, opening a trail if needed.
    ///
    /// A trail orphaned behind the emitter's back (e.g. by the manager's
    /// maximum age) is released and replaced in the same tick.
    pub fn update(&mut self, position: Vec3, forward: Vec3, trails: &mut TrailManager) {
        let point = position - forward * self.offset.z + Vec3::UP * self.offset.y;

        if let Some(handle) = self.handle.take() {
            if trails.add_point(handle, point) {
                self.handle = Some(handle);
                return;
            }
            trails.release(handle);
        }

        match trails.add(self.width, self.lifetime, self.colour) {
            Ok(handle) => {
                trails.add_point(handle, point);
                self.handle = Some(handle);
            }
            Err(e) => {
                tracing::warn!(owner = ?self.header.owner, "Trail emitter disabled: {e}");
            }
        }
    }

    /// Stop feeding the trail. It keeps fading on its own.
    pub fn detach(&mut self, trails: &mut TrailManager) {
        if let Some(handle) = self.handle.take() {
            trails.release(handle);
        }
    }
}

impl Clone for TrailEmitter {
    fn clone(&self) -> Self {
        Self {
            header: self.header.clone(),
            width: self.width,
            lifetime: self.lifetime,
            colour: self.colour,
            offset: self.offset,
            handle: None,
        }
    }
}

impl Default for TrailEmitter {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            width: 1.0,
            lifetime: 2.0,
            colour: Colour::new(0.4, 0.8, 1.0, 1.0),
            offset: Vec3::new(0.0, 0.0, 3.0),
            handle: None,
        }
    }
}

impl ComponentKind for TrailEmitter {
    const TYPE: ComponentType = ComponentType::Trail;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("width", self.width);
        doc.set("lifetime", self.lifetime);
        doc.set("colour", self.colour);
        doc.set("offset", self.offset);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        let defaults = Self::default();
        self.width = doc.get("width")?;
        let lifetime: f32 = doc.get("lifetime")?;
        if !(lifetime.is_finite() && lifetime > 0.0) {
            return Err(GameError::InvalidField {
                component: Self::TYPE,
                field: "lifetime".to_string(),
                expected: "positive number",
            });
        }
        self.lifetime = lifetime;
        self.colour = doc.get_or("colour", defaults.colour)?;
        self.offset = doc.get_or("offset", defaults.offset)?;
        self.handle = None;
        Ok(())
    }

    kind_casts!(Trail);
}
