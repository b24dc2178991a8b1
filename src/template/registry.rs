//! Template store for loading and retrieving templates by identifier

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::builtin::BUILTIN_TEMPLATES;
use super::document::{DocumentError, Template};
use crate::config::StoreConfig;

const TEMPLATE_EXTENSION: &str = "md";

/// Errors that can occur while loading templates
#[derive(Debug, Error)]
pub enum StoreError {
    /// Two templates share an identifier within one source
    #[error("duplicate template identifier: {id}")]
    Duplicate { id: String },

    /// Configured template directory does not exist
    #[error("template directory not found: {path}")]
    DirNotFound { path: PathBuf },

    /// Error reading a directory or template file
    #[error("error reading {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    /// Template file could not be parsed
    #[error("invalid template {id}: {source}")]
    InvalidTemplate {
        id: String,
        #[source]
        source: DocumentError,
    },
}

/// Immutable mapping from identifier to template
///
/// Built once at start and shared by reference afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateStore {
    templates: BTreeMap<String, Template>,
}

impl TemplateStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the prompts embedded in the binary
    pub fn builtin() -> Result<Self, StoreError> {
        Self::from_sources(BUILTIN_TEMPLATES.iter().copied())
    }

    /// Build a store from `(identifier, document)` pairs
    pub fn from_sources<I, K, S>(sources: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for (id, source) in sources {
            let id = id.into();
            let template = Template::parse(id.clone(), source.as_ref())
                .map_err(|source| StoreError::InvalidTemplate { id, source })?;
            store.register(template)?;
        }
        Ok(store)
    }

    /// Load every `*.md` file under a directory, recursively
    ///
    /// The identifier is the path relative to `dir` without the extension,
    /// using `/` as separator. `README.md` files and dot-entries are skipped.
    /// Symbolic links are followed; a link back to an ancestor directory is
    /// a `ReadError`.
    pub fn from_dir(dir: &Path) -> Result<Self, StoreError> {
        if !dir.is_dir() {
            return Err(StoreError::DirNotFound {
                path: dir.to_path_buf(),
            });
        }

        let files = collect_template_files(dir)?;

        let mut store = Self::new();
        for path in files {
            let id = template_id(dir, &path);
            let content =
                std::fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            let template = Template::parse(id.clone(), &content)
                .map_err(|source| StoreError::InvalidTemplate { id, source })?;
            debug!(id = template.id(), path = %path.display(), "loaded template");
            store.register(template)?;
        }

        info!(count = store.len(), dir = %dir.display(), "loaded template directory");
        Ok(store)
    }

    /// Assemble the store described by the configuration
    ///
    /// Directory templates replace builtins with the same identifier.
    pub fn load(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut store = if config.builtin {
            Self::builtin()?
        } else {
            Self::new()
        };

        if let Some(dir) = &config.dir {
            store.overlay(Self::from_dir(dir)?);
        }

        debug!(count = store.len(), "template store ready");
        Ok(store)
    }

    /// Register a template, rejecting duplicate identifiers
    pub fn register(&mut self, template: Template) -> Result<(), StoreError> {
        if self.templates.contains_key(template.id()) {
            return Err(StoreError::Duplicate {
                id: template.id().to_string(),
            });
        }
        for name in template.unreferenced_placeholders() {
            warn!(
                id = template.id(),
                placeholder = name,
                "declared placeholder never appears in the body"
            );
        }
        self.templates.insert(template.id().to_string(), template);
        Ok(())
    }

    fn overlay(&mut self, other: TemplateStore) {
        for (id, template) in other.templates {
            if self.templates.insert(id.clone(), template).is_some() {
                debug!(id = %id, "directory template replaces builtin");
            }
        }
    }

    /// Get a template by identifier
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    /// Check if a template exists
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// All identifiers in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    /// All templates in identifier order
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Identifiers close to `id`, best match first
    pub fn suggest(&self, id: &str) -> Vec<String> {
        let mut scored: Vec<(usize, &str)> = self
            .names()
            .filter_map(|name| {
                let distance = strsim::damerau_levenshtein(id, name);
                let related = !id.is_empty() && (name.contains(id) || id.contains(name));
                (distance <= 3 || related).then_some((distance, name))
            })
            .collect();
        scored.sort();
        scored
            .into_iter()
            .take(5)
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

/// Template files under `dir`, in file name order
fn collect_template_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| StoreError::ReadError {
            path: e.path().unwrap_or(dir).to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && is_template_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_template_file(path: &Path) -> bool {
    let is_readme = path
        .file_name()
        .is_some_and(|name| name.eq_ignore_ascii_case("README.md"));
    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION));
    is_markdown && !is_readme
}

/// `root/go/unit-test.md` -> `go/unit-test`
fn template_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
