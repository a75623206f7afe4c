/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The Mustache compiled resource.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use upward_io::IoInterface;

use crate::ast::TemplateNode;
use crate::context::TemplateValue;
use crate::error::{TemplateError, TemplateResult};
use crate::evaluator::Evaluator;
use crate::options::MustacheOptions;
use crate::parser::parse;
use crate::resolver::{PartialTable, resolve_partials};
use crate::resource::{CompiledResource, matches_extension};

/// A parsed template together with every partial it transitively uses.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    nodes: Vec<TemplateNode>,
    partials: PartialTable,
}

impl CompiledTemplate {
    /// Root template nodes.
    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    pub fn partials(&self) -> &PartialTable {
        &self.partials
    }

    /// Render against `data` (an empty map when `None`).
    pub fn render(
        &self,
        data: Option<&TemplateValue>,
        options: &MustacheOptions,
    ) -> TemplateResult<String> {
        let empty = TemplateValue::empty_map();
        let data = data.unwrap_or(&empty);

        let output = Evaluator::new(self.partials.parsed(), options.max_depth)
            .render(&self.nodes, data)?;

        if options.trim_output {
            Ok(output.trim().to_string())
        } else {
            Ok(output)
        }
    }
}

/// Mustache template resource.
///
/// Holds the template text and the I/O capability used to load partials.
/// Construction does no I/O; [`compile`](CompiledResource::compile) loads
/// partials and builds the artifact that [`render`](CompiledResource::render)
/// uses.
///
/// ```ignore
/// let mut template = MustacheTemplate::new("Hi {{> name}}", io);
/// template.compile().await?;
/// let out = template.render(Some(&data)).await?;
/// ```
pub struct MustacheTemplate {
    source: String,
    io: Arc<dyn IoInterface>,
    options: MustacheOptions,
    compiled: Option<CompiledTemplate>,
}

impl MustacheTemplate {
    /// File extensions handled by this resource type.
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] = &[".mst", ".mustache"];

    /// Create a resource from template text and an I/O capability.
    pub fn new(source: impl Into<String>, io: Arc<dyn IoInterface>) -> Self {
        Self {
            source: source.into(),
            io,
            options: MustacheOptions::default(),
            compiled: None,
        }
    }

    /// Start building a resource; the capability is supplied separately.
    pub fn builder(source: impl Into<String>) -> MustacheTemplateBuilder {
        MustacheTemplateBuilder {
            source: source.into(),
            io: None,
            options: MustacheOptions::default(),
        }
    }

    /// Whether `path` has one of [`Self::SUPPORTED_EXTENSIONS`].
    pub fn supports_path(path: &Path) -> bool {
        matches_extension(Self::SUPPORTED_EXTENSIONS, path)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> &MustacheOptions {
        &self.options
    }

    /// The artifact from the last successful compile.
    pub fn compiled(&self) -> Option<&CompiledTemplate> {
        self.compiled.as_ref()
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    async fn build_artifact(&self) -> TemplateResult<CompiledTemplate> {
        let nodes = parse(&self.source)?;
        let partials = resolve_partials(&nodes, &*self.io, self.options.max_partials).await?;
        Ok(CompiledTemplate { nodes, partials })
    }
}

impl fmt::Debug for MustacheTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MustacheTemplate")
            .field("source", &self.source)
            .field("options", &self.options)
            .field("compiled", &self.compiled.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompiledResource for MustacheTemplate {
    fn supported_extensions(&self) -> &'static [&'static str] {
        Self::SUPPORTED_EXTENSIONS
    }

    async fn compile(&mut self) -> TemplateResult<()> {
        tracing::debug!(bytes = self.source.len(), "compiling mustache template");

        // A failed compile must not leave an older artifact renderable.
        self.compiled = None;
        let compiled = self.build_artifact().await?;

        tracing::debug!(
            partials = compiled.partials.len(),
            "mustache template compiled"
        );
        self.compiled = Some(compiled);
        Ok(())
    }

    async fn render(&self, data: Option<&TemplateValue>) -> TemplateResult<String> {
        let compiled = self.compiled.as_ref().ok_or(TemplateError::NotCompiled)?;
        compiled.render(data, &self.options)
    }
}

/// Builder for [`MustacheTemplate`].
pub struct MustacheTemplateBuilder {
    source: String,
    io: Option<Arc<dyn IoInterface>>,
    options: MustacheOptions,
}

impl MustacheTemplateBuilder {
    /// Set the I/O capability used to load partials.
    pub fn io(mut self, io: Arc<dyn IoInterface>) -> Self {
        self.io = Some(io);
        self
    }

    pub fn options(mut self, options: MustacheOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the resource; fails if no I/O capability was supplied.
    pub fn build(self) -> TemplateResult<MustacheTemplate> {
        let io = self.io.ok_or(TemplateError::MissingIo)?;
        Ok(MustacheTemplate {
            source: self.source,
            io,
            options: self.options,
            compiled: None,
        })
    }
}
