//! Entities: aggregates of components keyed by type.
//!
//! An entity owns its components outright. Components are stored in one
//! bucket per [`ComponentType`], so lookup by type is a table index and
//! several components of one type (e.g. two weapons) live side by side.
//!
//! # Tick order
//!
//! [`Entity::update`] runs the components in a fixed order:
//!
//! 1. Navigation turns the heading
//! 2. Engines accelerate, then the transform integrates velocity
//! 3. Sway and reactors advance
//! 4. Weapons cool down and report shots
//! 5. Trail emitters feed their trails

use crate::ammo::HitTarget;
use crate::component::{Component, ComponentKind, ComponentType};
use crate::components::{
    Engine, Hull, Model, Navigation, Reactor, ShipDetails, Shot, Sway, TrailEmitter, Transform,
    Weapon,
};
use crate::effects::Effects;
use crate::math::Vec3;
use crate::render::RenderSink;
use crate::trail::TrailManager;

/// Unique identifier for entities.
pub type EntityId = u64;

/// Collision radius used for ships without [`ShipDetails`].
const DEFAULT_HIT_RADIUS: f32 = 5.0;

/// A game object composed of components.
///
/// `Clone` is a deep copy: every component is cloned along with its
/// fields. [`Component::clone_from_component`] is the type-checked form for
/// copying one component's values onto another.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    slots: Vec<Vec<Component>>,
    editor_instance: bool,
}

impl Entity {
    /// Create an entity with no components.
    #[must_use]
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            slots: vec![Vec::new(); ComponentType::COUNT],
            editor_instance: false,
        }
    }

    /// Identifier of this entity.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Change the identifier and restamp every component's owner.
    pub fn set_id(&mut self, id: EntityId) {
        self.id = id;
        for component in self.slots.iter_mut().flatten() {
            component.set_owner(Some(id));
        }
    }

    /// Whether this entity was created for an editor rather than a game.
    #[must_use]
    pub const fn is_editor_instance(&self) -> bool {
        self.editor_instance
    }

    /// Mark this entity as an editor instance.
    pub fn set_editor_instance(&mut self, editor_instance: bool) {
        self.editor_instance = editor_instance;
    }

    /// Take ownership of a component.
    pub fn add_component(&mut self, component: impl Into<Component>) {
        let mut component = component.into();
        component.set_owner(Some(self.id));
        self.slots[component.component_type().index()].push(component);
    }

    /// Every component of one type, in insertion order.
    #[must_use]
    pub fn components_of(&self, component_type: ComponentType) -> &[Component] {
        &self.slots[component_type.index()]
    }

    /// Every component, grouped by type.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.slots.iter().flatten()
    }

    /// Total number of components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    /// Whether at least one component of `component_type` is attached.
    #[must_use]
    pub fn has(&self, component_type: ComponentType) -> bool {
        !self.slots[component_type.index()].is_empty()
    }

    /// First component of type `T`.
    #[must_use]
    pub fn get<T: ComponentKind>(&self) -> Option<&T> {
        self.slots[T::TYPE.index()].first()?.downcast_ref()
    }

    /// First component of type `T`, mutably.
    pub fn get_mut<T: ComponentKind>(&mut self) -> Option<&mut T> {
        self.slots[T::TYPE.index()].first_mut()?.downcast_mut()
    }

    /// Every component of type `T`.
    pub fn get_all<T: ComponentKind>(&self) -> impl Iterator<Item = &T> {
        self.slots[T::TYPE.index()]
            .iter()
            .filter_map(Component::downcast_ref)
    }

    /// Every component of type `T`, mutably.
    pub fn get_all_mut<T: ComponentKind>(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots[T::TYPE.index()]
            .iter_mut()
            .filter_map(Component::downcast_mut)
    }

    /// Detach and return every component of one type.
    pub fn remove_all(&mut self, component_type: ComponentType) -> Vec<Component> {
        let mut removed = std::mem::take(&mut self.slots[component_type.index()]);
        for component in &mut removed {
            component.set_owner(None);
        }
        removed
    }

    /// World position, if the entity has a transform.
    #[must_use]
    pub fn position(&self) -> Option<Vec3> {
        self.get::<Transform>().map(|t| t.position)
    }

    /// Hit sphere of a damageable entity.
    ///
    /// Only entities with both a transform and a hull can be hit.
    #[must_use]
    pub fn hit_target(&self) -> Option<HitTarget> {
        self.get::<Hull>()?;
        let position = self.position()?;
        let radius = self
            .get::<ShipDetails>()
            .map_or(DEFAULT_HIT_RADIUS, |d| d.collision_radius);
        Some(HitTarget {
            id: self.id,
            position,
            radius,
        })
    }

    /// Start per-instance effects. Call once after spawning.
    pub fn initialize(&mut self, trails: &mut TrailManager) {
        let Some((position, forward)) = self.get::<Transform>().map(|t| (t.position, t.forward))
        else {
            return;
        };
        for emitter in self.get_all_mut::<TrailEmitter>() {
            emitter.update(position, forward, trails);
        }
    }

    /// Advance every component by `delta` seconds and collect the shots
    /// fired this tick.
    pub fn update(&mut self, delta: f32, effects: &mut Effects) -> Vec<Shot> {
        let mut shots = Vec::new();
        let mut transform = self.get::<Transform>().cloned();

        if let Some(transform) = transform.as_mut() {
            for navigation in self.get_all_mut::<Navigation>() {
                transform.forward = navigation.steer(transform.forward, delta);
            }
            for engine in self.get_all_mut::<Engine>() {
                engine.update(delta, transform, &mut effects.particles);
            }
            transform.integrate(delta);
        }

        for sway in self.get_all_mut::<Sway>() {
            sway.update(delta);
        }
        for reactor in self.get_all_mut::<Reactor>() {
            reactor.update(delta);
        }

        let weapons = self.slots[ComponentType::Weapon.index()].len();
        for i in 0..weapons {
            let Some(cost) = self.weapon_mut(i).and_then(|weapon| {
                weapon.update(delta);
                weapon.wants_to_fire().then_some(weapon.energy_cost)
            }) else {
                continue;
            };
            let Some(transform) = transform.as_ref() else {
                continue;
            };
            if cost > 0.0 && !self.get_mut::<Reactor>().is_some_and(|r| r.consume(cost)) {
                continue;
            }
            if let Some(weapon) = self.weapon_mut(i) {
                shots.push(weapon.fire(transform));
            }
        }

        if let Some(transform) = transform {
            for emitter in self.get_all_mut::<TrailEmitter>() {
                emitter.update(transform.position, transform.forward, &mut effects.trails);
            }
            if let Some(slot) = self.get_mut::<Transform>() {
                *slot = transform;
            }
        }

        shots
    }

    fn weapon_mut(&mut self, index: usize) -> Option<&mut Weapon> {
        self.slots[ComponentType::Weapon.index()]
            .get_mut(index)?
            .downcast_mut()
    }

    /// Release every trail this entity feeds. They fade out on their own.
    pub fn detach(&mut self, trails: &mut TrailManager) {
        for emitter in self.get_all_mut::<TrailEmitter>() {
            emitter.detach(trails);
        }
    }

    /// Draw every model at the entity's placement plus sway.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let Some(transform) = self.get::<Transform>() else {
            return;
        };
        let sway = self
            .get_all::<Sway>()
            .fold(Vec3::ZERO, |acc, sway| acc + sway.offset());
        for model in self.get_all::<Model>() {
            sink.draw_model(
                &model.resource,
                transform.position + sway,
                transform.forward,
                model.scale,
            );
        }
    }
}
