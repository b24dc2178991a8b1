//! Placeholder resolution - turns a template and a binding set into text

use std::collections::BTreeMap;
use std::fmt;

use super::document::{Segment, Template};
use super::lexer::Span;

/// Values supplied for placeholders in one render call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    /// Create an empty binding set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a binding
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get the value bound to a name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }

    /// Bound names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a `key=value` assignment
    ///
    /// Only the first `=` separates; the value may contain more of them.
    pub fn parse_assignment(input: &str) -> Result<(String, String), String> {
        match input.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(format!(
                "invalid binding '{}': expected KEY=VALUE",
                input
            )),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for (k, v) in iter {
            bindings.insert(k, v);
        }
        bindings
    }
}

/// Kind of non-fatal problem found while rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A placeholder had neither a binding nor a default
    UnresolvedPlaceholder,
    /// A binding names no declared placeholder
    UnusedBinding,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnresolvedPlaceholder => write!(f, "unresolved-placeholder"),
            WarningKind::UnusedBinding => write!(f, "unused-binding"),
        }
    }
}

/// A warning about a render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderWarning {
    pub kind: WarningKind,
    pub name: String,
    /// Every occurrence in the template body (empty for unused bindings)
    pub spans: Vec<Span>,
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::UnresolvedPlaceholder => write!(
                f,
                "placeholder [{}] has no binding and no default; substituted an empty string",
                self.name
            ),
            WarningKind::UnusedBinding => write!(
                f,
                "binding '{}' does not match any placeholder of this template",
                self.name
            ),
        }
    }
}

/// Output of a render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Identifier of the rendered template
    pub template: String,
    pub text: String,
    /// Unresolved placeholders in order of first occurrence, then unused bindings by name
    pub warnings: Vec<RenderWarning>,
}

impl Rendered {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Render a template with the given bindings
///
/// Each placeholder takes its bound value, else its declared default, else
/// the empty string plus an [`WarningKind::UnresolvedPlaceholder`] warning.
pub fn render(template: &Template, bindings: &Bindings) -> Rendered {
    let mut text = String::with_capacity(template.body().len());
    let mut unresolved: Vec<RenderWarning> = Vec::new();

    for segment in template.segments() {
        match segment {
            Segment::Text(literal) => text.push_str(literal),
            Segment::Placeholder { name, span } => {
                let value = bindings.get(name).or_else(|| {
                    template
                        .placeholder(name)
                        .and_then(|def| def.default.as_deref())
                });

                match value {
                    Some(value) => text.push_str(value),
                    None => match unresolved.iter_mut().find(|w| &w.name == name) {
                        Some(warning) => warning.spans.push(span.clone()),
                        None => unresolved.push(RenderWarning {
                            kind: WarningKind::UnresolvedPlaceholder,
                            name: name.clone(),
                            spans: vec![span.clone()],
                        }),
                    },
                }
            }
        }
    }

    let unused = bindings
        .names()
        .filter(|name| !template.is_declared(name))
        .map(|name| RenderWarning {
            kind: WarningKind::UnusedBinding,
            name: name.to_string(),
            spans: Vec::new(),
        });

    let mut warnings = unresolved;
    warnings.extend(unused);

    Rendered {
        template: template.id().to_string(),
        text,
        warnings,
    }
}
