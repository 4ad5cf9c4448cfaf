//! Concrete component types.
//!
//! Each type implements [`ComponentKind`](crate::component::ComponentKind)
//! and is a variant of [`Component`](crate::component::Component).

mod engine;
mod hull;
mod navigation;
mod presentation;
mod trail;
mod transform;
mod weapon;

pub use engine::Engine;
pub use hull::{Hull, Reactor};
pub use navigation::{Navigation, NavigationMode};
pub use presentation::{Camera, Model, PlayerController, ShipDetails};
pub use trail::TrailEmitter;
pub use transform::{Sway, Transform};
pub use weapon::{Shot, Weapon, WeaponKind};
