/*
 * traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Defines the IoInterface capability and its supporting types.
 *
 * Compiled resources never touch storage directly. Everything they need to
 * load (partials, includes) goes through an IoInterface handed to them at
 * construction, so the same resource can run against:
 * - NativeIo: files under a root directory
 * - MemoryIo / FnIo: in-memory sources (bundled templates, tests)
 * - RecordingIo: any of the above, with call tracking
 */

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for I/O capability operations
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading a named resource
#[derive(Debug, Error)]
pub enum IoError {
    /// No resource exists under the requested name
    #[error("Resource not found: {name}")]
    NotFound { name: String },

    /// The name resolves outside the capability's allowed root
    #[error("Path outside allowed root: {}", .0.display())]
    PathViolation(PathBuf),

    /// The resource bytes are not valid in the requested encoding
    #[error("Resource '{name}' is not valid {encoding}")]
    InvalidEncoding { name: String, encoding: Encoding },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure reported by a custom capability
    #[error("{0}")]
    Other(String),
}

impl IoError {
    /// Create an error with a free-form message.
    pub fn other(message: impl Into<String>) -> Self {
        IoError::Other(message.into())
    }
}

/// Text encoding requested from a capability.
///
/// Compiled resources always ask for UTF-8; the value travels with every
/// call so capabilities backed by byte storage know how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8, spelled `"utf8"` on the wire
    #[default]
    Utf8,
}

impl Encoding {
    /// The literal encoding name passed to capabilities.
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf8",
        }
    }

    /// Decode raw bytes read for `name`.
    pub fn decode(self, name: &str, bytes: Vec<u8>) -> IoResult<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes).map_err(|_| IoError::InvalidEncoding {
                name: name.to_string(),
                encoding: self,
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability for reading named text resources.
///
/// This is the only way a compiled resource reaches storage. Implementations
/// decide what a name means (a relative path, a map key, a URL).
///
/// Calls are awaited one at a time by callers that need deterministic
/// ordering, so implementations do not have to guard against overlapping
/// reads from the same resource.
#[async_trait]
pub trait IoInterface: Send + Sync {
    /// Read the resource called `name` as text in the given encoding.
    async fn read_file(&self, name: &str, encoding: Encoding) -> IoResult<String>;
}

#[async_trait]
impl<T: IoInterface + ?Sized> IoInterface for Arc<T> {
    async fn read_file(&self, name: &str, encoding: Encoding) -> IoResult<String> {
        (**self).read_file(name, encoding).await
    }
}

#[async_trait]
impl<T: IoInterface + ?Sized> IoInterface for Box<T> {
    async fn read_file(&self, name: &str, encoding: Encoding) -> IoResult<String> {
        (**self).read_file(name, encoding).await
    }
}
