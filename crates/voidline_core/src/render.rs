//! Geometry handed to the renderer.
//!
//! The core never talks to a graphics API. Managers build one
//! [`VertexBatch`] per frame and hand it to a [`RenderSink`] together with
//! the [`ShaderHandle`] it should be drawn with.

use crate::math::{Colour, Vec3};

/// Opaque shader identifier resolved by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

impl ShaderHandle {
    /// Projectile tracers.
    pub const AMMO: Self = Self(1);
    /// Particle sprites.
    pub const PARTICLE: Self = Self(2);
    /// Laser beams.
    pub const LASER: Self = Self(3);
    /// Fading trails.
    pub const TRAIL: Self = Self(4);
}

/// Triangle list with per-vertex texture coordinates and colours.
///
/// The three arrays always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBatch {
    /// Vertex positions, three per triangle.
    pub positions: Vec<Vec3>,
    /// Texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Vertex colours.
    pub colours: Vec<Colour>,
}

impl VertexBatch {
    /// Vertices per quad (two triangles).
    pub const VERTICES_PER_QUAD: usize = 6;

    /// Create an empty batch with room for `quads` quads.
    #[must_use]
    pub fn with_quad_capacity(quads: usize) -> Self {
        let n = quads * Self::VERTICES_PER_QUAD;
        Self {
            positions: Vec::with_capacity(n),
            uvs: Vec::with_capacity(n),
            colours: Vec::with_capacity(n),
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the batch holds no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of complete quads.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.len() / Self::VERTICES_PER_QUAD
    }

    /// Remove all geometry, keeping the allocation.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.colours.clear();
    }

    fn push_vertex(&mut self, position: Vec3, uv: [f32; 2], colour: Colour) {
        self.positions.push(position);
        self.uvs.push(uv);
        self.colours.push(colour);
    }

    /// Append a quad given its corners in winding order.
    pub fn push_quad(&mut self, corners: [Vec3; 4], colour: Colour) {
        let [a, b, c, d] = corners;
        self.push_vertex(a, [0.0, 0.0], colour);
        self.push_vertex(b, [1.0, 0.0], colour);
        self.push_vertex(c, [1.0, 1.0], colour);
        self.push_vertex(a, [0.0, 0.0], colour);
        self.push_vertex(c, [1.0, 1.0], colour);
        self.push_vertex(d, [0.0, 1.0], colour);
    }

    /// Append a ribbon quad from `start` to `end` with the given widths.
    pub fn push_segment(
        &mut self,
        start: Vec3,
        end: Vec3,
        start_width: f32,
        end_width: f32,
        colour: Colour,
    ) {
        let along = end - start;
        let mut side = along.cross(Vec3::UP).normalize_or_zero();
        if side == Vec3::ZERO {
            side = along.any_perpendicular().normalize_or_zero();
        }
        let s0 = side * (start_width * 0.5);
        let s1 = side * (end_width * 0.5);
        self.push_quad([start - s0, start + s0, end + s1, end - s1], colour);
    }

    /// Append a camera-agnostic sprite: a square of side `size` in the XY
    /// plane centred on `centre`.
    pub fn push_sprite(&mut self, centre: Vec3, size: f32, colour: Colour) {
        let h = size * 0.5;
        self.push_quad(
            [
                centre + Vec3::new(-h, -h, 0.0),
                centre + Vec3::new(h, -h, 0.0),
                centre + Vec3::new(h, h, 0.0),
                centre + Vec3::new(-h, h, 0.0),
            ],
            colour,
        );
    }
}

/// Receiver of per-frame geometry.
pub trait RenderSink {
    /// Draw a batch with a shader. Called at most once per manager per frame.
    fn draw(&mut self, shader: ShaderHandle, batch: &VertexBatch);

    /// Draw a model resource at a placement.
    fn draw_model(&mut self, _resource: &str, _position: Vec3, _forward: Vec3, _scale: f32) {}
}

/// Sink that discards everything. Used by headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw(&mut self, _shader: ShaderHandle, _batch: &VertexBatch) {}
}
