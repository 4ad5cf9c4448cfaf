//! Weapon hardpoints.

use crate::component::{kind_casts, ComponentDocument, ComponentHeader, ComponentKind, ComponentType};
use crate::components::Transform;
use crate::entity::EntityId;
use crate::error::{GameError, Result};
use crate::math::{Colour, Vec3};

/// What a weapon puts into the world when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponKind {
    /// Travelling ammo, hit-tested every tick.
    #[default]
    Projectile,
    /// Instant beam, drawn for a fraction of a second.
    Laser,
}

impl WeaponKind {
    /// Name used in templates.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Projectile => "Projectile",
            Self::Laser => "Laser",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "Projectile" => Some(Self::Projectile),
            "Laser" => Some(Self::Laser),
            _ => None,
        }
    }
}

/// A discharge requested by a weapon during an entity update.
///
/// The sector turns it into ammo or a laser beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Entity that fired.
    pub owner: Option<EntityId>,
    /// Projectile or laser.
    pub kind: WeaponKind,
    /// Muzzle position in world space.
    pub origin: Vec3,
    /// Unit firing direction.
    pub direction: Vec3,
    /// Shooter velocity, added to projectiles.
    pub inherited_velocity: Vec3,
    /// Damage on hit.
    pub damage: f32,
    /// Projectile speed.
    pub speed: f32,
    /// Maximum reach.
    pub range: f32,
    /// Tracer or beam colour.
    pub colour: Colour,
}

/// A weapon hardpoint.
///
/// Firing state and cooldown are runtime only.
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    header: ComponentHeader,
    /// Projectile or laser.
    pub kind: WeaponKind,
    /// Shots per second.
    pub rate_of_fire: f32,
    /// Damage per hit.
    pub damage: f32,
    /// Projectile speed, units per second.
    pub muzzle_speed: f32,
    /// Maximum reach in world units.
    pub range: f32,
    /// Reactor energy drawn per shot.
    pub energy_cost: f32,
    /// Tracer or beam colour.
    pub colour: Colour,
    /// Muzzle position relative to the entity, along its heading.
    pub muzzle_offset: Vec3,
    cooldown: f32,
    firing: bool,
}

impl Weapon {
    /// Create a weapon.
    #[must_use]
    pub fn new(kind: WeaponKind, rate_of_fire: f32, damage: f32) -> Self {
        Self {
            kind,
            rate_of_fire,
            damage,
            ..Self::default()
        }
    }

    /// Hold or release the trigger.
    pub fn set_firing(&mut self, firing: bool) {
        self.firing = firing;
    }

    /// Whether the trigger is held.
    #[must_use]
    pub const fn is_firing(&self) -> bool {
        self.firing
    }

    /// Seconds until the weapon can fire again.
    #[must_use]
    pub const fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Count down the cooldown.
    pub fn update(&mut self, delta: f32) {
        self.cooldown = (self.cooldown - delta).max(0.0);
    }

    /// Trigger held and cooldown elapsed.
    #[must_use]
    pub fn wants_to_fire(&self) -> bool {
        self.firing && self.cooldown <= 0.0 && self.rate_of_fire > 0.0
    }

    /// Record a shot and start the cooldown.
    pub fn trigger(&mut self) {
        self.cooldown = if self.rate_of_fire > 0.0 {
            1.0 / self.rate_of_fire
        } else {
            f32::INFINITY
        };
    }

    /// Start the cooldown and describe the shot fired from `transform`.
    pub fn fire(&mut self, transform: &Transform) -> Shot {
        self.trigger();
        Shot {
            owner: self.header.owner,
            kind: self.kind,
            origin: transform.position
                + transform.forward * self.muzzle_offset.z
                + Vec3::UP * self.muzzle_offset.y,
            direction: transform.forward,
            inherited_velocity: transform.velocity,
            damage: self.damage,
            speed: self.muzzle_speed,
            range: self.range,
            colour: self.colour,
        }
    }

    /// Seconds a projectile lives before it has flown `range`.
    #[must_use]
    pub fn projectile_lifetime(&self) -> f32 {
        if self.muzzle_speed > 0.0 {
            self.range / self.muzzle_speed
        } else {
            0.0
        }
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            kind: WeaponKind::Projectile,
            rate_of_fire: 4.0,
            damage: 10.0,
            muzzle_speed: 200.0,
            range: 400.0,
            energy_cost: 0.0,
            colour: Colour::WHITE,
            muzzle_offset: Vec3::new(0.0, 0.0, 4.0),
            cooldown: 0.0,
            firing: false,
        }
    }
}

impl ComponentKind for Weapon {
    const TYPE: ComponentType = ComponentType::Weapon;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("kind", self.kind.name().to_string());
        doc.set("rate_of_fire", self.rate_of_fire);
        doc.set("damage", self.damage);
        doc.set("muzzle_speed", self.muzzle_speed);
        doc.set("range", self.range);
        doc.set("energy_cost", self.energy_cost);
        doc.set("colour", self.colour);
        doc.set("muzzle_offset", self.muzzle_offset);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        let defaults = Self::default();
        let kind: String = doc.get("kind")?;
        self.kind = WeaponKind::parse(&kind).ok_or_else(|| GameError::InvalidField {
            component: Self::TYPE,
            field: "kind".to_string(),
            expected: "weapon kind (Projectile or Laser)",
        })?;
        self.rate_of_fire = doc.get("rate_of_fire")?;
        self.damage = doc.get("damage")?;
        self.muzzle_speed = doc.get_or("muzzle_speed", defaults.muzzle_speed)?;
        self.range = doc.get_or("range", defaults.range)?;
        self.energy_cost = doc.get_or("energy_cost", defaults.energy_cost)?;
        self.colour = doc.get_or("colour", defaults.colour)?;
        self.muzzle_offset = doc.get_or("muzzle_offset", defaults.muzzle_offset)?;
        self.cooldown = 0.0;
        self.firing = false;
        Ok(())
    }

    kind_casts!(Weapon);
}
