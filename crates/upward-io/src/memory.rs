/*
 * memory.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * In-memory IoInterface implementations.
 */

use async_trait::async_trait;
use std::collections::HashMap;

use crate::traits::{Encoding, IoError, IoInterface, IoResult};

/// Capability that serves resources from an in-memory map.
///
/// Useful for testing and for templates bundled into the application.
#[derive(Debug, Clone, Default)]
pub struct MemoryIo {
    files: HashMap<String, String>,
}

impl MemoryIo {
    /// Create a new empty memory capability.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource under `name`.
    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.files.insert(name.into(), content.into());
        self
    }

    /// Create a capability holding the given resources.
    pub fn with_files(
        files: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let mut io = Self::new();
        for (name, content) in files {
            io.add(name, content);
        }
        io
    }
}

#[async_trait]
impl IoInterface for MemoryIo {
    async fn read_file(&self, name: &str, _encoding: Encoding) -> IoResult<String> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| IoError::NotFound {
                name: name.to_string(),
            })
    }
}

/// Capability that computes resource text with a closure.
///
/// ```ignore
/// let io = FnIo::new(|name| Ok(format!("<h2>{name}</h2>")));
/// ```
pub struct FnIo<F> {
    read: F,
}

impl<F> FnIo<F>
where
    F: Fn(&str) -> IoResult<String> + Send + Sync,
{
    pub fn new(read: F) -> Self {
        Self { read }
    }
}

#[async_trait]
impl<F> IoInterface for FnIo<F>
where
    F: Fn(&str) -> IoResult<String> + Send + Sync,
{
    async fn read_file(&self, name: &str, _encoding: Encoding) -> IoResult<String> {
        (self.read)(name)
    }
}
