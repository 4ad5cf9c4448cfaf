//! Template authoring.

use std::path::{Path, PathBuf};

use voidline_core::entity_factory::EntityFactory;

use crate::error::{Result, ToolError};

/// Write a blank template `<dir>/<name>.<extension>` holding a default
/// transform. Refuses to overwrite an existing file.
///
/// # Errors
///
/// Returns [`ToolError::AlreadyExists`] if the file exists, or the core
/// error if the name is invalid or the write fails.
pub fn create_blank_template(dir: &Path, name: &str, extension: &str) -> Result<PathBuf> {
    let mut factory = EntityFactory::with_directory(dir, extension);
    let path = factory
        .template_path(name)
        .unwrap_or_else(|| dir.join(name));
    if path.exists() {
        return Err(ToolError::AlreadyExists(path));
    }
    factory.add_blank_template(name)?;
    tracing::info!("Created template {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidline_core::component_factory::ComponentFactory;
    use voidline_core::components::Transform;

    #[test]
    fn test_blank_template_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_blank_template(dir.path(), "probe", "ron").unwrap();
        assert_eq!(path, dir.path().join("probe.ron"));

        let components = ComponentFactory::with_builtin();
        let factory = EntityFactory::load(dir.path(), "ron", &components).unwrap();
        let probe = factory.create("probe").unwrap();
        assert!(probe.get::<Transform>().is_some());
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        create_blank_template(dir.path(), "probe", "ron").unwrap();
        assert!(matches!(
            create_blank_template(dir.path(), "probe", "ron"),
            Err(ToolError::AlreadyExists(_))
        ));
    }
}
