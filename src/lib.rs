//! promptbook - prompt templates for AI coding assistants
//!
//! This library stores Markdown prompt templates, looks them up by
//! identifier and fills in their `[name]` placeholders.
//!
//! # Example
//!
//! ```rust
//! use promptbook::{Bindings, Selector, TemplateStore};
//!
//! let store = TemplateStore::builtin().unwrap();
//! let selector = Selector::new(&store);
//!
//! let bindings = Bindings::new().with("code", "func Add(a, b int) int { return a + b }");
//! let rendered = selector.run("godoc-func", &bindings).unwrap();
//!
//! assert!(rendered.text.contains("func Add(a, b int) int"));
//! assert!(rendered.warnings.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod selector;
pub mod template;

pub use config::{Config, ConfigError, LoggingConfig, StoreConfig};
pub use error::SelectError;
pub use selector::Selector;
pub use template::{
    Bindings, DocumentError, PlaceholderDef, RenderWarning, Rendered, StoreError, Template,
    TemplateStore, WarningKind,
};

/// Render template source text directly, without a store
///
/// # Example
///
/// ```rust
/// use promptbook::{render_source, Bindings};
///
/// let out = render_source("Hello [who]!", &Bindings::new().with("who", "Gopher")).unwrap();
/// assert_eq!(out.text, "Hello Gopher!");
/// ```
pub fn render_source(source: &str, bindings: &Bindings) -> Result<Rendered, DocumentError> {
    let template = Template::parse("<inline>", source)?;
    Ok(template::render(&template, bindings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_source_simple() {
        let out = render_source("[greeting], world", &Bindings::new().with("greeting", "Hello"))
            .unwrap();
        assert_eq!(out.text, "Hello, world");
        assert_eq!(out.template, "<inline>");
    }

    #[test]
    fn test_render_source_front_matter_error() {
        let result = render_source("+++\nbroken", &Bindings::new());
        assert!(matches!(result, Err(DocumentError::UnterminatedFrontMatter)));
    }

    #[test]
    fn test_builtins_render_without_required_bindings_warn() {
        let store = TemplateStore::builtin().unwrap();
        let out = Selector::new(&store)
            .run("unit-test", &Bindings::new())
            .unwrap();
        let missing: Vec<_> = out.warnings.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(missing, vec!["code"]);
    }
}
