//! Named entity templates.
//!
//! A template is an entity kept as a prototype. [`EntityFactory::create`]
//! hands out deep copies, so mutating a created entity never touches the
//! template or other copies.
//!
//! Templates persist as one RON file per template, `<name>.<ext>`:
//!
//! ```ron
//! (
//!     name: "dagger",
//!     components: [
//!         (type: Transform, version: 1, fields: {}),
//!         (type: Hull, version: 1, fields: {"maximum_hit_points": Float(100.0)}),
//!     ],
//! )
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::component::ComponentDocument;
use crate::component_factory::ComponentFactory;
use crate::components::Transform;
use crate::entity::{Entity, EntityId};
use crate::error::{GameError, Result};

/// Id carried by template entities. Spawned copies get a real id.
const TEMPLATE_ID: EntityId = 0;

/// Serialized form of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    /// Template name.
    pub name: String,
    /// Components in entity order.
    #[serde(default)]
    pub components: Vec<ComponentDocument>,
}

impl TemplateDocument {
    /// Capture an entity's components.
    #[must_use]
    pub fn from_entity(name: &str, entity: &Entity) -> Self {
        Self {
            name: name.to_string(),
            components: entity.components().map(|c| c.serialize()).collect(),
        }
    }

    /// Build an entity from the documents.
    ///
    /// # Errors
    ///
    /// Fails on the first component that is unregistered or does not
    /// deserialize.
    pub fn instantiate(&self, factory: &ComponentFactory) -> Result<Entity> {
        let mut entity = Entity::new(TEMPLATE_ID);
        for doc in &self.components {
            entity.add_component(factory.from_document(doc)?);
        }
        Ok(entity)
    }
}

/// Read and parse a template file without instantiating it.
///
/// # Errors
///
/// Returns [`GameError::TemplateIo`] or [`GameError::TemplateParse`].
pub fn read_template_file(path: &Path) -> Result<TemplateDocument> {
    let path_str = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| GameError::TemplateIo {
        path: path_str.clone(),
        source: e,
    })?;
    ron::from_str(&contents).map_err(|e| GameError::TemplateParse {
        path: path_str,
        source: e,
    })
}

/// Write a template document to `path`.
///
/// # Errors
///
/// Returns [`GameError::TemplateSerialize`] or [`GameError::TemplateIo`].
pub fn write_template_file(path: &Path, doc: &TemplateDocument) -> Result<()> {
    let text = ron::ser::to_string_pretty(doc, ron::ser::PrettyConfig::new())?;
    fs::write(path, text).map_err(|e| GameError::TemplateIo {
        path: path.display().to_string(),
        source: e,
    })
}

fn check_template_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(GameError::InvalidArgument(format!(
            "template name '{name}' is not a valid file stem"
        )));
    }
    Ok(())
}

/// Store of named entity templates, optionally backed by a directory.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    templates: HashMap<String, Entity>,
    directory: Option<PathBuf>,
    extension: String,
}

impl EntityFactory {
    /// Create an in-memory factory. Saved templates are not written out.
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            directory: None,
            extension: "ron".to_string(),
        }
    }

    /// Create an empty factory that writes templates to `directory`.
    #[must_use]
    pub fn with_directory(directory: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            templates: HashMap::new(),
            directory: Some(directory.into()),
            extension: extension.to_string(),
        }
    }

    /// Load every `*.<extension>` file in `directory`.
    ///
    /// Malformed templates are logged and skipped. A directory that does
    /// not exist yields an empty factory that will create it on first save.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::TemplateIo`] if the directory exists but cannot
    /// be listed.
    pub fn load(directory: &Path, extension: &str, components: &ComponentFactory) -> Result<Self> {
        let mut factory = Self::with_directory(directory, extension);

        if !directory.exists() {
            tracing::warn!("Template directory does not exist: {}", directory.display());
            return Ok(factory);
        }

        let entries = fs::read_dir(directory).map_err(|e| GameError::TemplateIo {
            path: directory.display().to_string(),
            source: e,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable directory entry: {e}");
                    None
                }
            })
            .filter(|path| path.extension().is_some_and(|ext| ext == extension))
            .collect();
        paths.sort();

        let mut skipped = 0usize;
        for path in paths {
            match Self::load_file(&path, components) {
                Ok((name, entity)) => {
                    if factory.templates.insert(name.clone(), entity).is_some() {
                        tracing::warn!(template = %name, "Duplicate template, keeping {}", path.display());
                    }
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("Skipping template {}: {e}", path.display());
                }
            }
        }

        tracing::info!(
            loaded = factory.templates.len(),
            skipped,
            "Loaded templates from {}",
            directory.display()
        );
        Ok(factory)
    }

    fn load_file(path: &Path, components: &ComponentFactory) -> Result<(String, Entity)> {
        let doc = read_template_file(path)?;
        let entity = doc.instantiate(components)?;
        let name = if doc.name.is_empty() {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            doc.name
        };
        check_template_name(&name)?;
        Ok((name, entity))
    }

    /// Backing directory, if any.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Template file extension, without the dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path a template is saved to.
    #[must_use]
    pub fn template_path(&self, name: &str) -> Option<PathBuf> {
        self.directory
            .as_ref()
            .map(|dir| dir.join(format!("{name}.{}", self.extension)))
    }

    /// Deep copy of a template, or `None` with a warning if unknown.
    #[must_use]
    pub fn create(&self, name: &str) -> Option<Entity> {
        match self.try_create(name) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!(template = %name, "Cannot create entity: {e}");
                None
            }
        }
    }

    /// Deep copy of a template.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::TemplateNotFound`] if no template has `name`.
    pub fn try_create(&self, name: &str) -> Result<Entity> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| GameError::TemplateNotFound(name.to_string()))
    }

    /// Store `entity` as template `name`, then write it to the backing
    /// directory if there is one.
    ///
    /// The in-memory template is replaced even when writing fails.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidArgument`] for a name that is not a
    /// valid file stem, or the write error.
    pub fn save_template(&mut self, name: &str, entity: &Entity) -> Result<()> {
        check_template_name(name)?;

        let mut template = entity.clone();
        template.set_id(TEMPLATE_ID);
        let doc = TemplateDocument::from_entity(name, &template);
        self.templates.insert(name.to_string(), template);

        let Some(path) = self.template_path(name) else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| GameError::TemplateIo {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        write_template_file(&path, &doc)?;
        tracing::debug!(template = %name, "Saved template to {}", path.display());
        Ok(())
    }

    /// Save a template holding only a default transform.
    ///
    /// # Errors
    ///
    /// As [`EntityFactory::save_template`].
    pub fn add_blank_template(&mut self, name: &str) -> Result<()> {
        let mut entity = Entity::new(TEMPLATE_ID);
        entity.add_component(Transform::default());
        self.save_template(name, &entity)
    }

    /// Template prototype.
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&Entity> {
        self.templates.get(name)
    }

    /// Whether a template named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether there are no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for EntityFactory {
    fn default() -> Self {
        Self::new()
    }
}
