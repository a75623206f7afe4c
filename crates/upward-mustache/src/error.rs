/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for compiling and rendering Mustache resources.

use thiserror::Error;
use upward_io::IoError;

/// Errors that can occur during template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The resource was constructed without an I/O capability.
    #[error("MustacheTemplate requires an IoInterface as its second argument")]
    MissingIo,

    /// Error parsing the template syntax.
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// A partial was fetched but its text does not parse.
    #[error("Parse error in partial '{name}': {source}")]
    PartialParse {
        name: String,
        source: Box<TemplateError>,
    },

    /// The I/O capability failed to read a partial.
    #[error("Failed to load partial '{name}': {source}")]
    Io { name: String, source: IoError },

    /// `render()` was called without a successfully compiled artifact.
    #[error("Template has not been compiled; call compile() before render()")]
    NotCompiled,

    /// More distinct partials than the configured limit.
    #[error("Template references more than {limit} distinct partials")]
    TooManyPartials { limit: usize },

    /// Partials nested deeper than the configured limit while rendering.
    #[error("Recursive partial inclusion detected (depth > {max_depth}): {name}")]
    RecursivePartial { name: String, max_depth: usize },
}

impl TemplateError {
    /// Build a parse error pointing at byte `offset` of `source`.
    pub(crate) fn parse_at(message: impl Into<String>, source: &str, offset: usize) -> Self {
        let (line, column) = line_column(source, offset);
        TemplateError::Parse {
            message: message.into(),
            line,
            column,
        }
    }
}

/// 1-based line and column of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
