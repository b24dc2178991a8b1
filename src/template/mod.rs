//! Prompt templates: parsing, storage and placeholder resolution
//!
//! A template is a Markdown document whose `[name]` tokens are substitution
//! points:
//!
//! ```text
//! Write unit tests for the Go code below using [framework].
//! ```
//!
//! Templates are collected into a [`TemplateStore`] once at start and
//! rendered with [`render`] against a [`Bindings`] set.

mod builtin;
mod document;
mod lexer;
mod registry;
mod resolver;

pub use document::{DocumentError, PlaceholderDef, Segment, Template};
pub use lexer::Span;
pub use registry::{StoreError, TemplateStore};
pub use resolver::{render, Bindings, RenderWarning, Rendered, WarningKind};
