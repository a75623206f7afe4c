/*
 * native.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * NativeIo: reads resources from a directory on the local filesystem.
 */

use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::traits::{Encoding, IoError, IoInterface, IoResult};

/// Capability that reads resources relative to a root directory.
///
/// Names are relative paths. Absolute names and names that climb out of the
/// root with `..` are rejected with [`IoError::PathViolation`].
#[derive(Debug, Clone)]
pub struct NativeIo {
    root: PathBuf,
    default_extension: Option<String>,
}

impl NativeIo {
    /// Create a capability rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_extension: None,
        }
    }

    /// Append `ext` to names that have no extension (e.g. `"mustache"`).
    pub fn with_default_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.default_extension = Some(ext.trim_start_matches('.').to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a resource name to a path under the root.
    pub fn resolve(&self, name: &str) -> IoResult<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(IoError::PathViolation(relative.to_path_buf()));
        }

        let path = self.root.join(relative);
        match &self.default_extension {
            Some(ext) if relative.extension().is_none() => Ok(path.with_extension(ext)),
            _ => Ok(path),
        }
    }
}

#[async_trait]
impl IoInterface for NativeIo {
    async fn read_file(&self, name: &str, encoding: Encoding) -> IoResult<String> {
        let path = self.resolve(name)?;
        tracing::trace!(resource = name, path = %path.display(), "reading resource");

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => IoError::NotFound {
                name: name.to_string(),
            },
            _ => IoError::Io(e),
        })?;
        encoding.decode(name, bytes)
    }
}
