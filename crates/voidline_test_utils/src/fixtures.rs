//! Test fixtures and helpers.
//!
//! Pre-built templates and a recording render sink for consistent testing.

use std::path::Path;

use voidline_core::components::{Hull, Transform};
use voidline_core::entity::Entity;
use voidline_core::entity_factory::EntityFactory;
use voidline_core::math::Vec3;
use voidline_core::render::{RenderSink, ShaderHandle, VertexBatch};

/// Name of the [`dagger`] template.
pub const DAGGER: &str = "dagger";

/// A bare ship: a default transform and a 100 point hull.
#[must_use]
pub fn dagger() -> Entity {
    let mut entity = Entity::new(0);
    entity.add_component(Transform::default());
    entity.add_component(Hull::new(100.0));
    entity
}

/// In-memory factory holding the [`dagger`] template.
///
/// # Panics
///
/// Panics if the template cannot be stored.
#[must_use]
pub fn dagger_factory() -> EntityFactory {
    let mut factory = EntityFactory::new();
    factory
        .save_template(DAGGER, &dagger())
        .expect("dagger template should save");
    factory
}

/// Write the given templates into `dir` as `<name>.ron` files.
///
/// # Panics
///
/// Panics if a template cannot be written.
pub fn write_templates(dir: &Path, templates: &[(&str, Entity)]) {
    let mut factory = EntityFactory::with_directory(dir, "ron");
    for (name, entity) in templates {
        factory
            .save_template(name, entity)
            .expect("template should be written");
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Shader used.
    pub shader: ShaderHandle,
    /// Number of vertices submitted.
    pub vertices: usize,
}

/// One recorded model draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDraw {
    /// Model resource path.
    pub resource: String,
    /// World position.
    pub position: Vec3,
}

/// Render sink that keeps every call for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Batched draws in submission order.
    pub draws: Vec<DrawCall>,
    /// Model draws in submission order.
    pub models: Vec<ModelDraw>,
}

impl RecordingSink {
    /// Shaders of the recorded batched draws, in order.
    #[must_use]
    pub fn shaders(&self) -> Vec<ShaderHandle> {
        self.draws.iter().map(|d| d.shader).collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.draws.clear();
        self.models.clear();
    }
}

impl RenderSink for RecordingSink {
    fn draw(&mut self, shader: ShaderHandle, batch: &VertexBatch) {
        self.draws.push(DrawCall {
            shader,
            vertices: batch.len(),
        });
    }

    fn draw_model(&mut self, resource: &str, position: Vec3, _forward: Vec3, _scale: f32) {
        self.models.push(ModelDraw {
            resource: resource.to_string(),
            position,
        });
    }
}
