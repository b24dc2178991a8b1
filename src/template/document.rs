//! Parsed template documents
//!
//! A template file is Markdown with optional TOML front matter fenced by
//! `+++` lines:
//!
//! ```text
//! +++
//! description = "Write a godoc comment for a Go function"
//!
//! [placeholders.code]
//! description = "Source of the function"
//!
//! [placeholders.audience]
//! default = "library users"
//! +++
//! Write a doc comment for [code], aimed at [audience].
//! ```
//!
//! When the front matter declares a `[placeholders]` table only those names
//! are substituted and every other bracketed name stays literal. Without it,
//! every `[name]` in the body is a placeholder.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use super::lexer::{lex, Span, Token};

const FENCE: &str = "+++";
const BOM: char = '\u{feff}';

/// Errors that can occur while parsing a template document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("front matter opened with '+++' is never closed")]
    UnterminatedFrontMatter,

    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] toml::de::Error),
}

/// Metadata for one declared placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceholderDef {
    /// What the value should contain
    pub description: Option<String>,
    /// Value used when no binding is supplied
    pub default: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    description: Option<String>,
    placeholders: Option<BTreeMap<String, PlaceholderDef>>,
}

/// A piece of a parsed body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, escapes already applied
    Text(String),
    /// A substitution point; the span is relative to the body
    Placeholder { name: String, span: Span },
}

/// An immutable, parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    id: String,
    description: Option<String>,
    body: String,
    placeholders: BTreeMap<String, PlaceholderDef>,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template document (front matter and body)
    ///
    /// A leading UTF-8 byte order mark is ignored.
    pub fn parse(id: impl Into<String>, source: &str) -> Result<Self, DocumentError> {
        let source = source.strip_prefix(BOM).unwrap_or(source);
        let (front, body) = split_front_matter(source)?;
        let front: FrontMatter = match front {
            Some(text) => toml::from_str(text)?,
            None => FrontMatter::default(),
        };

        let declared = front.placeholders;
        let segments = parse_segments(body, declared.as_ref());

        let placeholders = match declared {
            Some(declared) => declared,
            None => segments
                .iter()
                .filter_map(|seg| match seg {
                    Segment::Placeholder { name, .. } => {
                        Some((name.clone(), PlaceholderDef::default()))
                    }
                    Segment::Text(_) => None,
                })
                .collect(),
        };

        Ok(Self {
            id: id.into(),
            description: front.description,
            body: body.to_string(),
            placeholders,
            segments,
        })
    }

    /// The unique identifier of this template
    pub fn id(&self) -> &str {
        &self.id
    }

    /// One-line description from the front matter
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Raw body text, front matter removed
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Declared placeholders, sorted by name
    pub fn placeholders(&self) -> &BTreeMap<String, PlaceholderDef> {
        &self.placeholders
    }

    /// Metadata for a declared placeholder
    pub fn placeholder(&self, name: &str) -> Option<&PlaceholderDef> {
        self.placeholders.get(name)
    }

    /// Check if a placeholder name is declared
    pub fn is_declared(&self, name: &str) -> bool {
        self.placeholders.contains_key(name)
    }

    /// The body as literal and placeholder segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Declared placeholders with no occurrence in the body
    pub fn unreferenced_placeholders(&self) -> impl Iterator<Item = &str> {
        self.placeholders.keys().map(|s| s.as_str()).filter(move |name| {
            !self.segments.iter().any(
                |seg| matches!(seg, Segment::Placeholder { name: used, .. } if used == name),
            )
        })
    }

    /// Check if the body contains any substitution point
    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|seg| matches!(seg, Segment::Placeholder { .. }))
    }
}

/// Split `+++` front matter from the body
fn split_front_matter(source: &str) -> Result<(Option<&str>, &str), DocumentError> {
    let Some(rest) = source.strip_prefix(FENCE) else {
        return Ok((None, source));
    };
    // "+++" must be alone on the first line
    let Some(rest) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) else {
        return Ok((None, source));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(|c| c == '\r' || c == '\n') == FENCE {
            return Ok((Some(&rest[..offset]), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(DocumentError::UnterminatedFrontMatter)
}

/// Turn a body into segments, merging adjacent literal runs
fn parse_segments(
    body: &str,
    declared: Option<&BTreeMap<String, PlaceholderDef>>,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();

    for (token, span) in lex(body) {
        let slice = &body[span.clone()];
        match token {
            Token::Placeholder => {
                let name = Token::placeholder_name(slice);
                // `[name](url)` is a Markdown link
                let is_link = body[span.end..].starts_with('(');
                let is_declared = declared.map_or(true, |d| d.contains_key(name));

                if is_link || !is_declared {
                    text.push_str(slice);
                    continue;
                }

                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Placeholder {
                    name: name.to_string(),
                    span,
                });
            }
            // Drop the backslash
            Token::Escape => text.push_str(&slice[1..]),
            Token::Text | Token::OpenBracket | Token::Backslash => text.push_str(slice),
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    segments
}
