//! Lookup errors and warning reports

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::template::{RenderWarning, Span, Template, WarningKind};

/// Errors surfaced by the selector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("no template named '{identifier}'")]
    NotFound {
        identifier: String,
        suggestions: Vec<String>,
    },
}

impl SelectError {
    /// Closest known identifiers, best match first
    pub fn suggestions(&self) -> &[String] {
        match self {
            SelectError::NotFound { suggestions, .. } => suggestions,
        }
    }
}

impl RenderWarning {
    /// Format the warning with template context using ariadne
    ///
    /// Unresolved placeholders get a label on every occurrence in the body;
    /// unused bindings have no location and render as a single line.
    pub fn format(&self, template: &Template, color: bool) -> String {
        if self.spans.is_empty() {
            return format!("Warning: {} [{}]\n", self, self.kind);
        }

        let filename = template.id();
        let help = match self.kind {
            WarningKind::UnresolvedPlaceholder => format!(
                "pass --var {}=<value> or declare a default in the front matter",
                self.name
            ),
            WarningKind::UnusedBinding => "remove the binding".to_string(),
        };

        let body = template.body();
        // ariadne counts chars, spans are bytes
        let to_chars = |span: &Span| {
            let start = body[..span.start].chars().count();
            start..start + body[span.clone()].chars().count()
        };

        let offset = to_chars(&self.spans[0]).start;
        let mut report = Report::build(ReportKind::Warning, filename, offset)
            .with_config(Config::default().with_color(color))
            .with_message(self.to_string())
            .with_help(help);

        for span in &self.spans {
            report = report.with_label(
                Label::new((filename, to_chars(span)))
                    .with_message(format!("no value for [{}]", self.name))
                    .with_color(Color::Yellow),
            );
        }

        let mut buf = Vec::new();
        match report
            .finish()
            .write((filename, Source::from(body)), &mut buf)
        {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("Warning: {} [{}]\n", self, self.kind),
        }
    }
}
