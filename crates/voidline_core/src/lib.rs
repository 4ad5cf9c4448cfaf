//! # Voidline Core
//!
//! Gameplay core for the Voidline space-combat game.
//!
//! This crate contains the simulation layer only:
//! - No rendering backend (geometry is handed to a [`render::RenderSink`])
//! - No audio
//! - No input handling
//! - The only IO is template persistence in [`entity_factory`]
//!
//! The whole crate is single-threaded by contract. A frame is one
//! `update(delta)` followed by one `render(sink)`, both driven from the
//! game loop thread.
//!
//! ## Crate Structure
//!
//! - [`component`] - Component sum type, type tags and serialized documents
//! - [`components`] - Concrete components (Transform, Hull, Weapon, ...)
//! - [`component_factory`] - Registry mapping type tags to constructors
//! - [`entity`] - Aggregate of components keyed by type
//! - [`entity_factory`] - Named entity templates persisted as RON
//! - [`pool`] - Fixed-capacity object pool with slot recycling
//! - [`ammo`], [`particle`], [`laser`] - Pooled effect managers
//! - [`trail`] - Decaying trails with orphaning
//! - [`effects`] - All managers bundled with global pause
//! - [`sector`] - Per-tick orchestration of ships and effects
//! - [`context`] - Explicitly constructed owner of both factories

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ammo;
pub mod component;
pub mod component_factory;
pub mod components;
pub mod config;
pub mod context;
pub mod effects;
pub mod entity;
pub mod entity_factory;
pub mod error;
pub mod laser;
pub mod math;
pub mod particle;
pub mod pool;
pub mod render;
pub mod sector;
pub mod trail;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ammo::{AmmoHit, AmmoManager, AmmoParams, HitTarget};
    pub use crate::component::{Component, ComponentDocument, ComponentKind, ComponentType};
    pub use crate::component_factory::ComponentFactory;
    pub use crate::components::*;
    pub use crate::config::EngineConfig;
    pub use crate::context::GameContext;
    pub use crate::effects::Effects;
    pub use crate::entity::{Entity, EntityId};
    pub use crate::entity_factory::EntityFactory;
    pub use crate::error::{GameError, Result};
    pub use crate::laser::{LaserManager, LaserParams};
    pub use crate::math::{Colour, Vec3};
    pub use crate::particle::{EmitterParams, ParticleManager, SpawnPolicy};
    pub use crate::pool::{AllocationPolicy, Pool, Poolable};
    pub use crate::render::{RenderSink, ShaderHandle, VertexBatch};
    pub use crate::sector::Sector;
    pub use crate::trail::{TrailHandle, TrailManager};
}
