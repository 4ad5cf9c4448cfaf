//! Explicitly constructed owner of the component and entity factories.
//!
//! There is no global registry: the game loop builds one [`GameContext`]
//! at start-up and passes it to whatever needs to create entities.

use crate::component_factory::ComponentFactory;
use crate::config::EngineConfig;
use crate::entity_factory::EntityFactory;
use crate::error::Result;
use crate::sector::Sector;

/// Configuration plus both factories.
#[derive(Debug, Clone)]
pub struct GameContext {
    /// Configuration the context was built from.
    pub config: EngineConfig,
    /// Component constructors.
    pub components: ComponentFactory,
    /// Entity templates.
    pub entities: EntityFactory,
}

impl GameContext {
    /// Create a context with built-in components and no templates.
    ///
    /// Templates saved through this context are written to the configured
    /// template directory.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let entities =
            EntityFactory::with_directory(&config.template_directory, &config.template_extension);
        Self {
            config,
            components: ComponentFactory::with_builtin(),
            entities,
        }
    }

    /// Create a context and load templates from the configured directory.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the template directory
    /// exists but cannot be listed.
    pub fn load(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let components = ComponentFactory::with_builtin();
        let entities = EntityFactory::load(
            &config.template_directory,
            &config.template_extension,
            &components,
        )?;
        Ok(Self {
            config,
            components,
            entities,
        })
    }

    /// Empty sector sized from the configuration.
    #[must_use]
    pub fn new_sector(&self) -> Sector {
        Sector::new(&self.config)
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[test]
    fn test_load_reads_templates() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            template_directory: dir.path().to_path_buf(),
            ..EngineConfig::default()
        };

        let mut context = GameContext::new(config.clone());
        context.entities.add_blank_template("probe").unwrap();

        let reloaded = GameContext::load(config).unwrap();
        assert!(reloaded.entities.contains("probe"));
        assert!(reloaded.new_sector().is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let config = EngineConfig {
            ammo_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            GameContext::load(config),
            Err(GameError::ConfigError(_))
        ));
    }
}
