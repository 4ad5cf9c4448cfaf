//! Passive components: model, camera, player control and ship details.
//!
//! These carry data read by other systems and have no per-tick behaviour.

use crate::component::{kind_casts, ComponentDocument, ComponentHeader, ComponentKind, ComponentType};
use crate::error::Result;
use crate::math::Vec3;

/// Reference to a visual model resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    header: ComponentHeader,
    /// Resource path handed to the resource loader.
    pub resource: String,
    /// Uniform scale.
    pub scale: f32,
}

impl Model {
    /// Create a model component.
    #[must_use]
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            resource: String::new(),
            scale: 1.0,
        }
    }
}

impl ComponentKind for Model {
    const TYPE: ComponentType = ComponentType::Model;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("resource", self.resource.clone());
        doc.set("scale", self.scale);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        self.resource = doc.get("resource")?;
        self.scale = doc.get_or("scale", 1.0)?;
        Ok(())
    }

    kind_casts!(Model);
}

/// Chase camera placement relative to the entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    header: ComponentHeader,
    /// Offset from the entity in its local frame.
    pub offset: Vec3,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            offset: Vec3::new(0.0, 5.0, -20.0),
            field_of_view: 70.0,
        }
    }
}

impl ComponentKind for Camera {
    const TYPE: ComponentType = ComponentType::Camera;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("offset", self.offset);
        doc.set("field_of_view", self.field_of_view);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        let defaults = Self::default();
        self.offset = doc.get_or("offset", defaults.offset)?;
        self.field_of_view = doc.get_or("field_of_view", defaults.field_of_view)?;
        Ok(())
    }

    kind_casts!(Camera);
}

/// Marks an entity as driven by player input.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerController {
    header: ComponentHeader,
    /// Whether input is currently routed to this entity.
    pub input_enabled: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            input_enabled: true,
        }
    }
}

impl ComponentKind for PlayerController {
    const TYPE: ComponentType = ComponentType::PlayerController;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("input_enabled", self.input_enabled);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        self.input_enabled = doc.get_or("input_enabled", true)?;
        Ok(())
    }

    kind_casts!(PlayerController);
}

/// Display and collision information of a ship.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipDetails {
    header: ComponentHeader,
    /// Name shown to the player.
    pub display_name: String,
    /// Faction identifier.
    pub faction: String,
    /// Radius of the hit sphere in world units.
    pub collision_radius: f32,
}

impl ShipDetails {
    /// Create ship details.
    #[must_use]
    pub fn new(display_name: impl Into<String>, faction: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            faction: faction.into(),
            ..Self::default()
        }
    }
}

impl Default for ShipDetails {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            display_name: String::new(),
            faction: "neutral".to_string(),
            collision_radius: 5.0,
        }
    }
}

impl ComponentKind for ShipDetails {
    const TYPE: ComponentType = ComponentType::ShipDetails;
    const VERSION: u32 = 2;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("display_name", self.display_name.clone());
        doc.set("faction", self.faction.clone());
        doc.set("collision_radius", self.collision_radius);
    }

    // Version 1 documents predate collision_radius.
    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        self.display_name = doc.get("display_name")?;
        self.faction = doc.get_or("faction", "neutral".to_string())?;
        self.collision_radius = if doc.version >= 2 {
            doc.get("collision_radius")?
        } else {
            Self::default().collision_radius
        };
        Ok(())
    }

    kind_casts!(ShipDetails);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::error::GameError;

    #[test]
    fn test_model_requires_resource() {
        let doc = ComponentDocument::new(ComponentType::Model, 1);
        let err = Model::default().read_fields(&doc).unwrap_err();
        assert!(matches!(err, GameError::MissingField { field, .. } if field == "resource"));
    }

    #[test]
    fn test_ship_details_v1_defaults_radius() {
        let mut doc = ComponentDocument::new(ComponentType::ShipDetails, 1);
        doc.set("display_name", "Dagger".to_string());
        let mut details: Component = ShipDetails::default().into();
        details.deserialize(&doc).unwrap();
        let details = details.downcast_ref::<ShipDetails>().unwrap();
        assert_eq!(details.display_name, "Dagger");
        assert_eq!(details.collision_radius, 5.0);
    }

    #[test]
    fn test_ship_details_v2_requires_radius() {
        let mut doc = ComponentDocument::new(ComponentType::ShipDetails, 2);
        doc.set("display_name", "Dagger".to_string());
        assert!(ShipDetails::default().read_fields(&doc).is_err());
    }

    #[test]
    fn test_camera_defaults_when_empty() {
        let doc = ComponentDocument::new(ComponentType::Camera, 1);
        let mut camera = Camera::default();
        camera.field_of_view = 10.0;
        camera.read_fields(&doc).unwrap();
        assert_eq!(camera.field_of_view, 70.0);
    }
}
