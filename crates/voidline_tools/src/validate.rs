//! Template validation.
//!
//! Unlike [`EntityFactory::load`](voidline_core::entity_factory::EntityFactory::load),
//! which skips bad files, validation reports every file and why it failed.

use std::fs;
use std::path::Path;

use serde::Serialize;
use voidline_core::component_factory::ComponentFactory;
use voidline_core::entity_factory::read_template_file;

use crate::error::{Result, ToolError};

/// Outcome for one template file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// File path.
    pub path: String,
    /// Template name, if the file parsed.
    pub template: Option<String>,
    /// Number of components, if the template instantiated.
    pub components: Option<usize>,
    /// Failure message.
    pub error: Option<String>,
}

impl FileReport {
    /// Whether the file is a usable template.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome for a whole directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// One entry per template file, sorted by path.
    pub files: Vec<FileReport>,
}

impl ValidationReport {
    /// Number of files that failed.
    #[must_use]
    pub fn invalid_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_valid()).count()
    }

    /// Convert into an error if any file failed.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ValidationFailed`] if any file is invalid.
    pub fn into_result(self) -> Result<Self> {
        let invalid = self.invalid_count();
        if invalid > 0 {
            return Err(ToolError::ValidationFailed {
                invalid,
                total: self.files.len(),
            });
        }
        Ok(self)
    }
}

/// Validate one template file.
#[must_use]
pub fn validate_template_file(path: &Path, components: &ComponentFactory) -> FileReport {
    let mut report = FileReport {
        path: path.display().to_string(),
        template: None,
        components: None,
        error: None,
    };
    match read_template_file(path) {
        Ok(doc) => {
            report.template = Some(doc.name.clone());
            match doc.instantiate(components) {
                Ok(entity) => report.components = Some(entity.component_count()),
                Err(e) => report.error = Some(e.to_string()),
            }
        }
        Err(e) => report.error = Some(e.to_string()),
    }
    report
}

/// Validate every `*.<extension>` file in a directory.
///
/// # Errors
///
/// Returns [`ToolError::Io`] if the directory cannot be listed.
pub fn validate_template_directory(path: &Path, extension: &str) -> Result<ValidationReport> {
    let entries = fs::read_dir(path).map_err(|e| ToolError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == extension))
        .collect();
    paths.sort();

    let components = ComponentFactory::with_builtin();
    let files: Vec<FileReport> = paths
        .iter()
        .map(|p| validate_template_file(p, &components))
        .collect();

    for file in files.iter().filter(|f| !f.is_valid()) {
        tracing::warn!(path = %file.path, "{}", file.error.as_deref().unwrap_or_default());
    }
    tracing::info!("Validated {} template files in {}", files.len(), path.display());

    Ok(ValidationReport { files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidline_test_utils::fixtures::{dagger, write_templates, DAGGER};

    #[test]
    fn test_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path(), &[(DAGGER, dagger())]);
        fs::write(dir.path().join("broken.ron"), "(").unwrap();
        fs::write(
            dir.path().join("hollow.ron"),
            "(name: \"hollow\", components: [(type: Hull, version: 1)])",
        )
        .unwrap();

        let report = validate_template_directory(dir.path(), "ron").unwrap();

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.invalid_count(), 2);
        let dagger = report.files.iter().find(|f| f.path.ends_with("dagger.ron")).unwrap();
        assert_eq!(dagger.components, Some(2));
        let hollow = report.files.iter().find(|f| f.path.ends_with("hollow.ron")).unwrap();
        assert_eq!(hollow.template.as_deref(), Some("hollow"));
        assert!(hollow.error.as_deref().unwrap().contains("maximum_hit_points"));

        assert!(matches!(
            report.into_result(),
            Err(ToolError::ValidationFailed { invalid: 2, total: 3 })
        ));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            validate_template_directory(&dir.path().join("absent"), "ron"),
            Err(ToolError::Io { .. })
        ));
    }
}
