//! Heading control.
//!
//! Navigation owns a two-state machine:
//!
//! ```text
//!           set_direction(d)
//!   None ─────────────────────▶ Direction(d)
//!     ▲                             │
//!     └──── heading reaches d ──────┘
//!     └──── clear() ────────────────┘
//! ```
//!
//! While in `Direction`, each update turns the heading towards the target
//! by at most `turn_rate * delta` radians.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::component::{kind_casts, ComponentDocument, ComponentHeader, ComponentKind, ComponentType};
use crate::error::Result;
use crate::math::Vec3;

/// Angle below which the heading counts as aligned, in radians.
const ALIGNED_EPSILON: f32 = 1e-3;

/// Navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NavigationMode {
    /// Holding the current heading.
    #[default]
    None,
    /// Turning towards a unit direction.
    Direction(Vec3),
}

/// Turns the entity's heading towards a requested direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    header: ComponentHeader,
    /// Maximum turn speed in radians per second.
    pub turn_rate: f32,
    mode: NavigationMode,
}

impl Navigation {
    /// Create a navigation component.
    #[must_use]
    pub fn new(turn_rate: f32) -> Self {
        Self {
            turn_rate,
            ..Self::default()
        }
    }

    /// Current state.
    #[must_use]
    pub const fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Start turning towards `direction`. A zero vector clears the request.
    pub fn set_direction(&mut self, direction: Vec3) {
        let direction = direction.normalize_or_zero();
        self.mode = if direction == Vec3::ZERO {
            NavigationMode::None
        } else {
            NavigationMode::Direction(direction)
        };
    }

    /// Stop turning.
    pub fn clear(&mut self) {
        self.mode = NavigationMode::None;
    }

    /// Turn `forward` towards the target and return the new heading.
    pub fn steer(&mut self, forward: Vec3, delta: f32) -> Vec3 {
        let NavigationMode::Direction(target) = self.mode else {
            return forward;
        };

        let angle = forward.dot(target).clamp(-1.0, 1.0).acos();
        let max_step = (self.turn_rate * delta).max(0.0);

        if angle <= ALIGNED_EPSILON || angle <= max_step {
            self.mode = NavigationMode::None;
            return target;
        }

        // Lerping towards the exact opposite never leaves the line, so swing
        // through a perpendicular first.
        let (goal, goal_angle) = if angle > PI - ALIGNED_EPSILON {
            (forward.any_perpendicular(), FRAC_PI_2)
        } else {
            (target, angle)
        };
        let t = (max_step / goal_angle).min(1.0);
        forward.lerp(goal, t).normalize_or_zero()
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            header: ComponentHeader::default(),
            turn_rate: PI,
            mode: NavigationMode::None,
        }
    }
}

impl ComponentKind for Navigation {
    const TYPE: ComponentType = ComponentType::Navigation;
    const VERSION: u32 = 1;

    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn write_fields(&self, doc: &mut ComponentDocument) {
        doc.set("turn_rate", self.turn_rate);
    }

    fn read_fields(&mut self, doc: &ComponentDocument) -> Result<()> {
        self.turn_rate = doc.get("turn_rate")?;
        self.mode = NavigationMode::None;
        Ok(())
    }

    kind_casts!(Navigation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_keeps_heading() {
        let mut nav = Navigation::new(1.0);
        assert_eq!(nav.steer(Vec3::FORWARD, 1.0), Vec3::FORWARD);
    }

    #[test]
    fn test_turn_is_rate_limited() {
        let mut nav = Navigation::new(0.1);
        nav.set_direction(Vec3::new(1.0, 0.0, 0.0));
        let heading = nav.steer(Vec3::FORWARD, 1.0);
        let turned = Vec3::FORWARD.dot(heading).acos();
        assert!(turned > 0.0 && turned < 0.11);
        assert!(matches!(nav.mode(), NavigationMode::Direction(_)));
    }

    #[test]
    fn test_reaches_target_and_returns_to_none() {
        let mut nav = Navigation::new(PI);
        let target = Vec3::new(1.0, 0.0, 0.0);
        nav.set_direction(target);

        let mut heading = Vec3::FORWARD;
        for _ in 0..10 {
            heading = nav.steer(heading, 0.1);
        }
        assert_eq!(heading, target);
        assert_eq!(nav.mode(), NavigationMode::None);
    }

    #[test]
    fn test_opposite_direction_still_turns() {
        let mut nav = Navigation::new(0.5);
        nav.set_direction(-Vec3::FORWARD);
        let heading = nav.steer(Vec3::FORWARD, 0.1);
        assert!((heading.length() - 1.0).abs() < 1e-4);
        assert!(heading.dot(Vec3::FORWARD) < 1.0);
    }

    #[test]
    fn test_zero_direction_clears() {
        let mut nav = Navigation::new(1.0);
        nav.set_direction(Vec3::new(1.0, 0.0, 0.0));
        nav.set_direction(Vec3::ZERO);
        assert_eq!(nav.mode(), NavigationMode::None);
    }
}
