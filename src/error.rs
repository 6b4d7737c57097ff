//! Error types for rendering and input loading

use std::ops::Range;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::model::ViewKind;

/// Errors that abort a render call
///
/// Everything else degrades locally: a malformed record or template entry
/// never takes the whole document down.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The view kind has no DOT rendering
    #[error("unsupported view kind: {kind}")]
    UnsupportedViewKind { kind: ViewKind },
}

/// Errors from reading views, records and option files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl LoadError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Byte range of the offending input, when known
    pub fn span(&self, source: &str) -> Option<Range<usize>> {
        match self {
            LoadError::Io { .. } => None,
            LoadError::Json(e) => {
                let start = line_col_offset(source, e.line(), e.column());
                Some(start..(start + 1).min(source.len()))
            }
            LoadError::Toml(e) => e.span(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span(source) else {
            return self.to_string();
        };
        let message = match self {
            LoadError::Json(e) => e.to_string(),
            LoadError::Toml(e) => e.message().to_string(),
            LoadError::Io { .. } => self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Convert serde_json's 1-based line/column into a byte offset
fn line_col_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}
