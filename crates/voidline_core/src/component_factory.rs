//! Registry mapping component type tags to constructors.
//!
//! The factory is how documents become components: read the type tag,
//! construct a default component of that type, then let it deserialize its
//! own fields.
//!
//! ```
//! use voidline_core::component::ComponentType;
//! use voidline_core::component_factory::ComponentFactory;
//!
//! let factory = ComponentFactory::with_builtin();
//! let hull = factory.create_by_name("Hull").unwrap();
//! assert_eq!(hull.component_type(), ComponentType::Hull);
//! ```

use std::collections::HashMap;

use crate::component::{Component, ComponentDocument, ComponentKind, ComponentType};
use crate::components::{
    Camera, Engine, Hull, Model, Navigation, PlayerController, Reactor, ShipDetails, Sway,
    TrailEmitter, Transform, Weapon,
};
use crate::error::{GameError, Result};

/// Constructor of a default component.
pub type Constructor = fn() -> Component;

fn construct<T: ComponentKind>() -> Component {
    T::default().into()
}

/// Register each listed component type with its constructor and name.
macro_rules! register_components {
    ($factory:expr, [$($ty:ty),+ $(,)?]) => {
        $(
            $factory.register(<$ty as ComponentKind>::TYPE, construct::<$ty>);
        )+
    };
}

/// Table of component constructors indexed by type tag.
#[derive(Debug, Clone)]
pub struct ComponentFactory {
    constructors: [Option<Constructor>; ComponentType::COUNT],
    names: HashMap<String, ComponentType>,
}

impl ComponentFactory {
    /// Create a factory with nothing registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            constructors: [None; ComponentType::COUNT],
            names: HashMap::new(),
        }
    }

    /// Create a factory with every built-in component registered.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut factory = Self::new();
        register_components!(
            factory,
            [
                Transform,
                Model,
                Engine,
                Navigation,
                Camera,
                PlayerController,
                TrailEmitter,
                Sway,
                ShipDetails,
                Hull,
                Reactor,
                Weapon,
            ]
        );
        tracing::debug!(registered = factory.names.len(), "Component factory ready");
        factory
    }

    /// Register or replace the constructor for a type.
    pub fn register(&mut self, component_type: ComponentType, constructor: Constructor) {
        self.constructors[component_type.index()] = Some(constructor);
        self.names
            .insert(component_type.name().to_string(), component_type);
    }

    /// Whether a constructor is registered for `component_type`.
    #[must_use]
    pub fn is_registered(&self, component_type: ComponentType) -> bool {
        self.constructors[component_type.index()].is_some()
    }

    /// Construct a default component of a type.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ComponentNotRegistered`] if nothing is
    /// registered for the type.
    pub fn create(&self, component_type: ComponentType) -> Result<Component> {
        self.constructors[component_type.index()]
            .map(|constructor| constructor())
            .ok_or(GameError::ComponentNotRegistered(component_type))
    }

    /// Construct a default component from a type ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidComponentType`] for an out-of-range
    /// ordinal and [`GameError::ComponentNotRegistered`] if nothing is
    /// registered for it.
    pub fn create_by_index(&self, index: usize) -> Result<Component> {
        self.create(ComponentType::from_index(index)?)
    }

    /// Construct a default component from its programmatic name.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownComponentName`] if no registered type
    /// has that name.
    pub fn create_by_name(&self, name: &str) -> Result<Component> {
        let component_type = self
            .names
            .get(name)
            .copied()
            .ok_or_else(|| GameError::UnknownComponentName(name.to_string()))?;
        self.create(component_type)
    }

    /// Construct a component and load it from a document.
    ///
    /// # Errors
    ///
    /// Fails if the document's type is not registered or its fields do not
    /// deserialize.
    pub fn from_document(&self, doc: &ComponentDocument) -> Result<Component> {
        let mut component = self.create(doc.component_type)?;
        component.deserialize(doc)?;
        Ok(component)
    }

    /// Registered type names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::with_builtin()
    }
}
