//! Structural hit points and energy supply.

use crate::component::{kind_casts, ComponentDocument, ComponentHeader, ComponentKind, ComponentType};
use crate::error::{GameError, Result};

/// Structural hit points.
///
/// Only the maximum is persisted; a loaded hull starts undamaged.
#[derive(Debug, Clone, PartialEq)]
pub struct Hull {
    header: ComponentHeader,
    maximum_hit_points: f32,
    current_hit_points: f32,
}

impl Hull {
    /// Create an undamaged hull.
    #[must_use]
    pub fn new(maximum_hit_points: f32) -> Self {
        Self {
            header: ComponentHeader::default(),
            maximum_hit_points,
            current_hit_points: maximum_hit_points,
        }
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn maximum_hit_points(&self) -> f32 {
        self.maximum_hit_points
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn current_hit_points(&self) -> f32 {
        self.current_hit_points
    }

    /// Change the maximum, keeping the current value within it.
    pub fn set_maximum_hit_points(&mut self, maximum: f32) {
        self.maximum_hit_points = maximum.max(0.0);
        self.current_hit_points = self.current_hit_points.min(self.maximum_hit_points);
    }

    /// Apply damage, returning the amount actually absorbed.
    pub fn damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current_hit_points);
        self.current_hit_points -= actual;
        actual
    }

    /// Restore hit points, returning the amount actually restored.
    pub fn repair(&mut self, amount: f32) -> f32 {
        let headroom = self.maximum_hit_points - self.current_hit_points;
        let actual = amount.max(0.0).min(headroom);
        self.current_hit_points += actual;
        actual
    }

    /// Whether the hull has no hit points left.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.current_hit_points <= 0.0
    }

    /// Remaining fraction in `[0, 1]`.
    #[must_use]
    pub fn integrity(&self) -> f32 {
        if self.maximum_hit_points <= 0.0 {
            0.0
        } else {
            self.current_hit_points / self.maximum_hit_points
        }
    }
}

impl Default for Hull {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl ComponentKind for Hull {
    const TYPE: ComponentType = ComponentType::Hull;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("maximum_hit_points", self.maximum_hit_points);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        let maximum: f32 = doc.get("maximum_hit_points")?;
        if !(maximum.is_finite() && maximum > 0.0) {
            return Err(GameError::InvalidField {
                component: Self::TYPE,
                field: "maximum_hit_points".to_string(),
                expected: "positive number",
            });
        }
        self.maximum_hit_points = maximum;
        self.current_hit_points = maximum;
        Ok(())
    }

    kind_casts!(Hull);
}

/// Energy supply drawn on by weapons.
///
/// Stored energy is not persisted: a loaded reactor starts full.
#[derive(Debug, Clone, PartialEq)]
pub struct Reactor {
    header: ComponentHeader,
    /// Maximum stored energy.
    pub capacity: f32,
    /// Energy regained per second.
    pub recharge_rate: f32,
    energy: f32,
}

impl Reactor {
    /// Create a full reactor.
    #[must_use]
    pub fn new(capacity: f32, recharge_rate: f32) -> Self {
        Self {
            header: ComponentHeader::default(),
            capacity,
            recharge_rate,
            energy: capacity,
        }
    }

    /// Stored energy.
    #[must_use]
    pub const fn energy(&self) -> f32 {
        self.energy
    }

    /// Recharge towards capacity.
    pub fn update(&mut self, delta: f32) {
        self.energy = (self.energy + self.recharge_rate * delta).min(self.capacity);
    }

    /// Draw `amount` if that much is stored. Returns whether it was drawn.
    pub fn consume(&mut self, amount: f32) -> bool {
        if amount <= self.energy {
            self.energy -= amount.max(0.0);
            true
        } else {
            false
        }
    }
}

impl Default for Reactor {
    fn default() -> Self {
        Self::new(100.0, 10.0)
    }
}

impl ComponentKind for Reactor {
    const TYPE: ComponentType = ComponentType::Reactor;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("capacity", self.capacity);
        doc.set("recharge_rate", self.recharge_rate);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        self.capacity = doc.get("capacity")?;
        self.recharge_rate = doc.get("recharge_rate")?;
        self.energy = self.capacity;
        Ok(())
    }

    kind_casts!(Reactor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    #[test]
    fn test_damage_saturates() {
        let mut hull = Hull::new(50.0);
        assert_eq!(hull.damage(30.0), 30.0);
        assert_eq!(hull.damage(30.0), 20.0);
        assert!(hull.is_destroyed());
        assert_eq!(hull.integrity(), 0.0);
    }

    #[test]
    fn test_repair_caps_at_maximum() {
        let mut hull = Hull::new(50.0);
        hull.damage(10.0);
        assert_eq!(hull.repair(25.0), 10.0);
        assert_eq!(hull.current_hit_points(), 50.0);
    }

    #[test]
    fn test_hull_load_resets_damage() {
        let mut hull = Hull::new(100.0);
        hull.damage(60.0);
        let doc = Component::from(hull.clone()).serialize();

        let mut loaded: Component = Hull::default().into();
        loaded.deserialize(&doc).unwrap();
        let loaded = loaded.downcast_ref::<Hull>().unwrap();
        assert_eq!(loaded.maximum_hit_points(), 100.0);
        assert_eq!(loaded.current_hit_points(), 100.0);
    }

    #[test]
    fn test_hull_rejects_non_positive_maximum() {
        let mut doc = ComponentDocument::new(ComponentType::Hull, 1);
        doc.set("maximum_hit_points", 0.0_f32);
        assert!(matches!(
            Hull::default().read_fields(&doc),
            Err(GameError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_reactor_consume_and_recharge() {
        let mut reactor = Reactor::new(10.0, 2.0);
        assert!(reactor.consume(8.0));
        assert!(!reactor.consume(5.0));
        reactor.update(1.0);
        assert_eq!(reactor.energy(), 4.0);
        reactor.update(100.0);
        assert_eq!(reactor.energy(), 10.0);
    }

    #[test]
    fn test_reactor_load_starts_full() {
        let mut reactor = Reactor::new(40.0, 1.0);
        reactor.consume(30.0);
        let doc = Component::from(reactor).serialize();
        let mut loaded = Reactor::default();
        loaded.read_fields(&doc).unwrap();
        assert_eq!(loaded.energy(), 40.0);
    }
}
