//! Selector: identifier lookup followed by rendering

use tracing::debug;

use crate::error::SelectError;
use crate::template::{render, Bindings, Rendered, Template, TemplateStore};

/// Looks templates up in a store and renders them
///
/// Holds the store by shared reference; any number of selectors may render
/// against the same store at once.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    store: &'a TemplateStore,
}

impl<'a> Selector<'a> {
    pub fn new(store: &'a TemplateStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a TemplateStore {
        self.store
    }

    /// Look up a template without rendering it
    pub fn describe(&self, identifier: &str) -> Result<&'a Template, SelectError> {
        self.store
            .get(identifier)
            .ok_or_else(|| SelectError::NotFound {
                identifier: identifier.to_string(),
                suggestions: self.store.suggest(identifier),
            })
    }

    /// Render the template named `identifier`
    ///
    /// Placeholder problems come back as warnings on the result; only an
    /// unknown identifier is an error.
    pub fn run(&self, identifier: &str, bindings: &Bindings) -> Result<Rendered, SelectError> {
        let template = self.describe(identifier)?;
        debug!(id = identifier, bindings = bindings.len(), "rendering template");

        let rendered = render(template, bindings);
        for warning in &rendered.warnings {
            debug!(
                id = identifier,
                kind = %warning.kind,
                placeholder = %warning.name,
                "{}",
                warning
            );
        }
        Ok(rendered)
    }
}
