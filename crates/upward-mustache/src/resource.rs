/*
 * resource.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The compiled-resource seam.
//!
//! A dispatcher picks a compiled-resource implementation by file extension,
//! constructs it with the file text and an I/O capability, then drives it
//! through `compile()` and `render()`. This crate only publishes its
//! extensions; matching files against them is the dispatcher's job.

use std::path::Path;

use async_trait::async_trait;

use crate::context::TemplateValue;
use crate::error::TemplateResult;

/// A resource that is compiled once and rendered many times.
#[async_trait]
pub trait CompiledResource: Send + Sync {
    /// File extensions (with leading dot) this resource type handles.
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Resolve everything the resource depends on and build its artifact.
    async fn compile(&mut self) -> TemplateResult<()>;

    /// Render the compiled artifact. `None` renders against an empty map.
    async fn render(&self, data: Option<&TemplateValue>) -> TemplateResult<String>;
}

/// Whether `path` ends in one of `extensions` (compared case-insensitively).
pub fn matches_extension(extensions: &[&str], path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
}
