//! Component sum type, type tags and the serialized document form.
//!
//! A [`Component`] is one typed, versioned, serializable slice of behaviour
//! owned by an [`Entity`](crate::entity::Entity). The set of component types
//! is closed: every concrete type is a variant of [`Component`] and has a
//! stable [`ComponentType`] tag. Copying between components is checked
//! against that tag, so a mismatched clone is an error rather than a
//! reinterpretation of memory.
//!
//! # Document format
//!
//! Components persist as a [`ComponentDocument`]: the type tag, schema
//! version and optional name, followed by a map of type-specific fields.
//!
//! ```ron
//! (type: Hull, version: 1, name: Some("hull"), fields: {
//!     "maximum_hit_points": Float(100.0),
//! })
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::components::{
    Camera, Engine, Hull, Model, Navigation, PlayerController, Reactor, ShipDetails, Sway,
    Transform, TrailEmitter, Weapon,
};
use crate::entity::EntityId;
use crate::error::{GameError, Result};
use crate::math::{Colour, Vec3};

/// Stable type tag of a component.
///
/// The discriminants are part of the persisted contract and must never be
/// reordered. New types are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentType {
    /// World placement and motion.
    Transform = 0,
    /// Visual model reference.
    Model = 1,
    /// Propulsion.
    Engine = 2,
    /// Heading control.
    Navigation = 3,
    /// Chase camera placement.
    Camera = 4,
    /// Marks an entity as player-driven.
    PlayerController = 5,
    /// Emits a decaying trail.
    Trail = 6,
    /// Idle bobbing motion.
    Sway = 7,
    /// Display information.
    ShipDetails = 8,
    /// Structural hit points.
    Hull = 9,
    /// Energy supply.
    Reactor = 10,
    /// Weapon hardpoint.
    Weapon = 11,
}

impl ComponentType {
    /// Number of component types.
    pub const COUNT: usize = 12;

    /// Every component type, in ordinal order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Transform,
        Self::Model,
        Self::Engine,
        Self::Navigation,
        Self::Camera,
        Self::PlayerController,
        Self::Trail,
        Self::Sway,
        Self::ShipDetails,
        Self::Hull,
        Self::Reactor,
        Self::Weapon,
    ];

    /// Ordinal of this type, usable as a table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Checked conversion from an ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidComponentType`] if `index` is out of range.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GameError::InvalidComponentType(index))
    }

    /// Programmatic name, as used in templates and by name lookup.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Transform => "Transform",
            Self::Model => "Model",
            Self::Engine => "Engine",
            Self::Navigation => "Navigation",
            Self::Camera => "Camera",
            Self::PlayerController => "PlayerController",
            Self::Trail => "Trail",
            Self::Sway => "Sway",
            Self::ShipDetails => "ShipDetails",
            Self::Hull => "Hull",
            Self::Reactor => "Reactor",
            Self::Weapon => "Weapon",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| GameError::UnknownComponentName(s.to_string()))
    }
}

/// Attributes shared by every component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentHeader {
    /// Optional human-readable name, e.g. to tell two weapons apart.
    pub name: Option<String>,
    /// Entity this component is attached to. Not owning.
    pub owner: Option<EntityId>,
}

/// A single persisted field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f32),
    /// Text.
    Text(String),
    /// 3D vector.
    Vector(Vec3),
    /// RGBA colour.
    Colour(Colour),
}

/// Rust types that can be stored in a [`FieldValue`].
pub trait FieldType: Sized {
    /// Human readable kind, used in error messages.
    const KIND: &'static str;

    /// Extract a value, or `None` if the field holds another kind.
    fn from_field(value: &FieldValue) -> Option<Self>;

    /// Wrap a value.
    fn into_field(self) -> FieldValue;
}

impl FieldType for bool {
    const KIND: &'static str = "bool";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Bool(self)
    }
}

impl FieldType for i64 {
    const KIND: &'static str = "integer";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Int(self)
    }
}

impl FieldType for u32 {
    const KIND: &'static str = "non-negative integer";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(i) => u32::try_from(*i).ok(),
            _ => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Int(i64::from(self))
    }
}

impl FieldType for f32 {
    const KIND: &'static str = "number";

    // Hand-written templates often say `Int(100)` for a whole number.
    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Float(self)
    }
}

impl FieldType for String {
    const KIND: &'static str = "text";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Text(self)
    }
}

impl FieldType for Vec3 {
    const KIND: &'static str = "vector";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Vector(v) => Some(*v),
            _ => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Vector(self)
    }
}

impl FieldType for Colour {
    const KIND: &'static str = "colour";

    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Colour(c) => Some(*c),
            _ => None,
        }
    }

    fn into_field(self) -> FieldValue {
        FieldValue::Colour(self)
    }
}

/// Serialized form of one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDocument {
    /// Type tag. Read by the factory, never by the component itself.
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Schema version the fields were written with.
    pub version: u32,
    /// Optional component name.
    #[serde(default)]
    pub name: Option<String>,
    /// Type-specific fields.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl ComponentDocument {
    /// Create an empty document for a component type.
    #[must_use]
    pub fn new(component_type: ComponentType, version: u32) -> Self {
        Self {
            component_type,
            version,
            name: None,
            fields: BTreeMap::new(),
        }
    }

    /// Store a field, replacing any previous value.
    pub fn set<T: FieldType>(&mut self, key: &str, value: T) {
        self.fields.insert(key.to_string(), value.into_field());
    }

    /// Read a required field.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MissingField`] if the field is absent and
    /// [`GameError::InvalidField`] if it holds another kind of value.
    pub fn get<T: FieldType>(&self, key: &str) -> Result<T> {
        match self.get_optional(key)? {
            Some(value) => Ok(value),
            None => Err(GameError::MissingField {
                component: self.component_type,
                field: key.to_string(),
            }),
        }
    }

    /// Read an optional field, falling back to `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidField`] if the field holds another kind
    /// of value.
    pub fn get_or<T: FieldType>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get_optional(key)?.unwrap_or(default))
    }

    /// Read an optional field.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidField`] if the field holds another kind
    /// of value.
    pub fn get_optional<T: FieldType>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.fields.get(key) else {
            return Ok(None);
        };
        T::from_field(value)
            .map(Some)
            .ok_or_else(|| GameError::InvalidField {
                component: self.component_type,
                field: key.to_string(),
                expected: T::KIND,
            })
    }
}

/// Behaviour every concrete component type provides.
///
/// Implementations describe only their own fields; the tag, version and
/// name are handled by [`Component::serialize`] and
/// [`Component::deserialize`].
pub trait ComponentKind: Clone + Default + Into<Component> + 'static {
    /// Type tag of this component.
    const TYPE: ComponentType;

    /// Current schema version.
    const VERSION: u32;

    /// Shared attributes.
    fn header(&self) -> &ComponentHeader;

    /// Shared attributes, mutably.
    fn header_mut(&mut self) -> &mut ComponentHeader;

    /// Append type-specific fields to a document.
    fn write_fields(&self, doc: &mut ComponentDocument);

    /// Read type-specific fields from a document.
    ///
    /// `doc.version` is at most [`Self::VERSION`].
    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()>;

    /// Borrow the concrete component out of the sum type.
    fn from_component(component: &Component) -> Option<&Self>;

    /// Mutably borrow the concrete component out of the sum type.
    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
}

/// Any component, tagged by its concrete type.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// A [`Transform`] component.
    Transform(Transform),
    /// A [`Model`] component.
    Model(Model),
    /// An [`Engine`] component.
    Engine(Engine),
    /// A [`Navigation`] component.
    Navigation(Navigation),
    /// A [`Camera`] component.
    Camera(Camera),
    /// A [`PlayerController`] component.
    PlayerController(PlayerController),
    /// A [`TrailEmitter`] component.
    Trail(TrailEmitter),
    /// A [`Sway`] component.
    Sway(Sway),
    /// A [`ShipDetails`] component.
    ShipDetails(ShipDetails),
    /// A [`Hull`] component.
    Hull(Hull),
    /// A [`Reactor`] component.
    Reactor(Reactor),
    /// A [`Weapon`] component.
    Weapon(Weapon),
}

macro_rules! with_component {
    ($value:expr, $c:ident => $body:expr) => {
        match $value {
            Component::Transform($c) => $body,
            Component::Model($c) => $body,
            Component::Engine($c) => $body,
            Component::Navigation($c) => $body,
            Component::Camera($c) => $body,
            Component::PlayerController($c) => $body,
            Component::Trail($c) => $body,
            Component::Sway($c) => $body,
            Component::ShipDetails($c) => $body,
            Component::Hull($c) => $body,
            Component::Reactor($c) => $body,
            Component::Weapon($c) => $body,
        }
    };
}

/// Implements the downcast half of [`ComponentKind`] for the concrete type
/// stored in `Component::$variant`.
macro_rules! kind_casts {
    ($variant:ident) => {
        fn from_component(component: &$crate::component::Component) -> Option<&Self> {
            match component {
                $crate::component::Component::$variant(c) => Some(c),
                _ => None,
            }
        }

        fn from_component_mut(
            component: &mut $crate::component::Component,
        ) -> Option<&mut Self> {
            match component {
                $crate::component::Component::$variant(c) => Some(c),
                _ => None,
            }
        }
    };
}

pub(crate) use kind_casts;

macro_rules! impl_from_kind {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for Component {
                fn from(value: $ty) -> Self {
                    Component::$variant(value)
                }
            }
        )+
    };
}

impl_from_kind! {
    Transform(Transform),
    Model(Model),
    Engine(Engine),
    Navigation(Navigation),
    Camera(Camera),
    PlayerController(PlayerController),
    Trail(TrailEmitter),
    Sway(Sway),
    ShipDetails(ShipDetails),
    Hull(Hull),
    Reactor(Reactor),
    Weapon(Weapon),
}

fn header_of<T: ComponentKind>(c: &T) -> &ComponentHeader {
    c.header()
}

fn header_of_mut<T: ComponentKind>(c: &mut T) -> &mut ComponentHeader {
    c.header_mut()
}

fn serialize_kind<T: ComponentKind>(c: &T) -> ComponentDocument {
    let mut doc = ComponentDocument::new(T::TYPE, T::VERSION);
    doc.name = c.header().name.clone();
    c.write_fields(&mut doc);
    doc
}

fn deserialize_kind<T: ComponentKind>(c: &mut T, doc: &ComponentDocument) -> Result<()> {
    if doc.version > T::VERSION {
        return Err(GameError::UnsupportedVersion {
            component: T::TYPE,
            found: doc.version,
            supported: T::VERSION,
        });
    }
    c.read_fields(doc)?;
    c.header_mut().name = doc.name.clone();
    Ok(())
}

const fn type_of<T: ComponentKind>(_: &T) -> ComponentType {
    T::TYPE
}

const fn version_of<T: ComponentKind>(_: &T) -> u32 {
    T::VERSION
}

impl Component {
    /// Type tag. Fixed for the lifetime of the component.
    #[must_use]
    pub fn component_type(&self) -> ComponentType {
        with_component!(self, c => type_of(c))
    }

    /// Schema version of this component type.
    #[must_use]
    pub fn version(&self) -> u32 {
        with_component!(self, c => version_of(c))
    }

    /// Optional human-readable name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        with_component!(self, c => header_of(c).name.as_deref())
    }

    /// Set or clear the human-readable name.
    pub fn set_name(&mut self, name: Option<String>) {
        with_component!(self, c => header_of_mut(c).name = name);
    }

    /// Entity this component is attached to, if any.
    #[must_use]
    pub fn owner(&self) -> Option<EntityId> {
        with_component!(self, c => header_of(c).owner)
    }

    pub(crate) fn set_owner(&mut self, owner: Option<EntityId>) {
        with_component!(self, c => header_of_mut(c).owner = owner);
    }

    /// Write this component into a document.
    #[must_use]
    pub fn serialize(&self) -> ComponentDocument {
        with_component!(self, c => serialize_kind(c))
    }

    /// Load version, name and type-specific fields from a document.
    ///
    /// The document's type tag is not consulted: the caller picked this
    /// component's concrete type from it already.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::MissingField`] or [`GameError::InvalidField`] for
    /// a malformed document and [`GameError::UnsupportedVersion`] for a
    /// document written by a newer schema.
    pub fn deserialize(&mut self, doc: &ComponentDocument) -> Result<()> {
        with_component!(self, c => deserialize_kind(c, doc))
    }

    /// Copy every value field from a component of the same type.
    ///
    /// The owner is kept: copying values does not move a component to
    /// another entity.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::TypeMismatch`] if `other` is a different type.
    pub fn clone_from_component(&mut self, other: &Component) -> Result<()> {
        let expected = self.component_type();
        let found = other.component_type();
        if expected != found {
            return Err(GameError::TypeMismatch { expected, found });
        }
        let owner = self.owner();
        *self = other.clone();
        self.set_owner(owner);
        Ok(())
    }

    /// Borrow as a concrete type.
    #[must_use]
    pub fn downcast_ref<T: ComponentKind>(&self) -> Option<&T> {
        T::from_component(self)
    }

    /// Mutably borrow as a concrete type.
    pub fn downcast_mut<T: ComponentKind>(&mut self) -> Option<&mut T> {
        T::from_component_mut(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, t) in ComponentType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
            assert_eq!(ComponentType::from_index(i).unwrap(), *t);
        }
    }

    #[test]
    fn test_from_index_out_of_range() {
        let err = ComponentType::from_index(ComponentType::COUNT).unwrap_err();
        assert!(matches!(err, GameError::InvalidComponentType(12)));
    }

    #[test]
    fn test_name_parse() {
        for t in ComponentType::ALL {
            assert_eq!(t.name().parse::<ComponentType>().unwrap(), t);
        }
        assert!(matches!(
            "Shield".parse::<ComponentType>(),
            Err(GameError::UnknownComponentName(name)) if name == "Shield"
        ));
    }

    #[test]
    fn test_document_field_errors() {
        let mut doc = ComponentDocument::new(ComponentType::Hull, 1);
        doc.set("maximum_hit_points", "lots".to_string());

        let missing = doc.get::<f32>("armour").unwrap_err();
        assert!(matches!(missing, GameError::MissingField { field, .. } if field == "armour"));

        let invalid = doc.get::<f32>("maximum_hit_points").unwrap_err();
        assert!(matches!(invalid, GameError::InvalidField { expected: "number", .. }));
    }

    #[test]
    fn test_document_int_reads_as_float() {
        let mut doc = ComponentDocument::new(ComponentType::Hull, 1);
        doc.set("maximum_hit_points", 100_i64);
        assert_eq!(doc.get::<f32>("maximum_hit_points").unwrap(), 100.0);
    }

    #[test]
    fn test_negative_int_is_not_u32() {
        let mut doc = ComponentDocument::new(ComponentType::Weapon, 1);
        doc.set("burst", -1_i64);
        assert!(doc.get::<u32>("burst").is_err());
    }

    #[test]
    fn test_get_or_default() {
        let doc = ComponentDocument::new(ComponentType::Sway, 1);
        assert_eq!(doc.get_or("amplitude", 0.5_f32).unwrap(), 0.5);
    }

    #[test]
    fn test_clone_from_component_type_mismatch() {
        let mut hull: Component = Hull::new(100.0).into();
        let reactor: Component = Reactor::new(50.0, 5.0).into();
        let err = hull.clone_from_component(&reactor).unwrap_err();
        assert!(matches!(
            err,
            GameError::TypeMismatch {
                expected: ComponentType::Hull,
                found: ComponentType::Reactor
            }
        ));
    }

    #[test]
    fn test_clone_from_component_keeps_owner() {
        let mut target: Component = Hull::new(10.0).into();
        target.set_owner(Some(7));
        let mut source: Component = Hull::new(250.0).into();
        source.set_owner(Some(99));

        target.clone_from_component(&source).unwrap();

        assert_eq!(target.owner(), Some(7));
        let hull = target.downcast_ref::<Hull>().unwrap();
        assert_eq!(hull.maximum_hit_points(), 250.0);
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut hull: Component = Hull::new(10.0).into();
        let mut doc = hull.serialize();
        doc.version = Hull::VERSION + 1;
        assert!(matches!(
            hull.deserialize(&doc),
            Err(GameError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_document_ron_shape() {
        let mut hull: Component = Hull::new(100.0).into();
        hull.set_name(Some("hull".to_string()));
        let text = ron::to_string(&hull.serialize()).unwrap();
        assert!(text.contains("type:Hull"));
        let doc: ComponentDocument = ron::from_str(&text).unwrap();
        assert_eq!(doc.name.as_deref(), Some("hull"));
        assert_eq!(doc.get::<f32>("maximum_hit_points").unwrap(), 100.0);
    }
}
