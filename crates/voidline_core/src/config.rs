//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```ron
//! EngineConfig(
//!     ammo_capacity: 2048,
//!     max_trail_age: None,
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Default ammo pool size.
pub const DEFAULT_AMMO_CAPACITY: usize = 1024;

/// Default particle emitter pool size.
pub const DEFAULT_PARTICLE_EMITTER_CAPACITY: usize = 256;

/// Default particle budget of a single emitter.
pub const DEFAULT_PARTICLES_PER_EMITTER: usize = 64;

/// Default laser buffer size.
pub const DEFAULT_LASER_CAPACITY: usize = 256;

/// Default age in seconds after which a still-fed trail is force-orphaned.
pub const DEFAULT_MAX_TRAIL_AGE: f32 = 600.0;

/// Tunables for the core managers and template store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of ammo slots.
    pub ammo_capacity: usize,
    /// Number of particle emitter slots.
    pub particle_emitter_capacity: usize,
    /// Particle budget of each emitter.
    pub particles_per_emitter: usize,
    /// Number of laser slots. New lasers beyond this are dropped.
    pub laser_capacity: usize,
    /// Safety net for trails whose producer never detaches.
    ///
    /// `None` keeps such trails forever.
    pub max_trail_age: Option<f32>,
    /// Directory scanned for entity templates.
    pub template_directory: PathBuf,
    /// File extension of template files, without the dot.
    pub template_extension: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ammo_capacity: DEFAULT_AMMO_CAPACITY,
            particle_emitter_capacity: DEFAULT_PARTICLE_EMITTER_CAPACITY,
            particles_per_emitter: DEFAULT_PARTICLES_PER_EMITTER,
            laser_capacity: DEFAULT_LASER_CAPACITY,
            max_trail_age: Some(DEFAULT_MAX_TRAIL_AGE),
            template_directory: PathBuf::from("data/templates"),
            template_extension: "ron".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from RON text and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigError`] if parsing or validation fails.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)
            .map_err(|e| GameError::ConfigError(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigError`] if the file cannot be read, parsed
    /// or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GameError::ConfigError(format!("Failed to read '{}': {e}", path.display()))
        })?;
        let config = Self::from_ron_str(&text)?;
        tracing::info!(path = %path.display(), "Loaded engine config");
        Ok(config)
    }

    /// Check the configuration for values the managers cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigError`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let capacities = [
            ("ammo_capacity", self.ammo_capacity),
            ("particle_emitter_capacity", self.particle_emitter_capacity),
            ("particles_per_emitter", self.particles_per_emitter),
            ("laser_capacity", self.laser_capacity),
        ];
        for (name, value) in capacities {
            if value == 0 {
                return Err(GameError::ConfigError(format!("{name} must be non-zero")));
            }
        }

        if let Some(age) = self.max_trail_age {
            if !(age.is_finite() && age > 0.0) {
                return Err(GameError::ConfigError(format!(
                    "max_trail_age must be a positive number of seconds, got {age}"
                )));
            }
        }

        if self.template_extension.is_empty() || self.template_extension.starts_with('.') {
            return Err(GameError::ConfigError(format!(
                "template_extension must be non-empty and given without a dot, got '{}'",
                self.template_extension
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = EngineConfig::from_ron_str("EngineConfig(ammo_capacity: 16)").unwrap();
        assert_eq!(config.ammo_capacity, 16);
        assert_eq!(config.laser_capacity, DEFAULT_LASER_CAPACITY);
        assert_eq!(config.template_extension, "ron");
    }

    #[test]
    fn test_permanent_trails() {
        let config = EngineConfig::from_ron_str("EngineConfig(max_trail_age: None)").unwrap();
        assert_eq!(config.max_trail_age, None);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = EngineConfig::from_ron_str("EngineConfig(laser_capacity: 0)").unwrap_err();
        assert!(matches!(err, GameError::ConfigError(msg) if msg.contains("laser_capacity")));
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let config = EngineConfig {
            template_extension: ".ron".to_string(),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/voidline.ron").unwrap_err();
        assert!(matches!(err, GameError::ConfigError(_)));
    }
}
