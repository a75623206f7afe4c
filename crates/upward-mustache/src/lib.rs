/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mustache compiled-template resource.
//!
//! A [`MustacheTemplate`] takes template text and an
//! [`IoInterface`](upward_io::IoInterface). Compiling it discovers every
//! partial the template uses (including partials of partials), loads each one
//! through the capability exactly once, and builds an artifact that can be
//! rendered any number of times. Supported syntax:
//!
//! - Interpolation: `{{name}}` (HTML-escaped), `{{{name}}}` / `{{& name}}` (raw)
//! - Dotted names and the implicit iterator: `{{a.b}}`, `{{.}}`
//! - Sections and inverted sections: `{{#x}}...{{/x}}`, `{{^x}}...{{/x}}`
//! - Partials: `{{> name}}`
//! - Comments: `{{! ... }}`
//! - Delimiter changes: `{{=<% %>=}}`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use upward_io::MemoryIo;
//! use upward_mustache::{CompiledResource, MustacheTemplate, TemplateValue};
//!
//! let io = Arc::new(MemoryIo::with_files([("foo", "bar {{z}}")]));
//! let mut template = MustacheTemplate::new("{{> foo}}", io);
//! template.compile().await?;
//!
//! let data = TemplateValue::from(serde_json::json!({"z": "baz"}));
//! assert_eq!(template.render(Some(&data)).await?, "bar baz");
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod options;
pub mod parser;
pub mod resolver;
pub mod resource;
pub mod template;

// Re-export main types at crate root
pub use ast::{Name, Partial, Section, TemplateNode, Variable};
pub use context::{ContextStack, TemplateValue};
pub use error::{TemplateError, TemplateResult};
pub use options::MustacheOptions;
pub use parser::{MAX_SECTION_NESTING, parse};
pub use resolver::{PartialTable, resolve_partials};
pub use resource::{CompiledResource, matches_extension};
pub use template::{CompiledTemplate, MustacheTemplate, MustacheTemplateBuilder};
