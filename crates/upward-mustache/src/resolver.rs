/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Partial template resolution.
//!
//! Partials are loaded through an [`IoInterface`] with an explicit FIFO
//! worklist rather than recursion:
//!
//! 1. The root template's partial names are queued in discovery order.
//! 2. The front name is fetched, parsed, and any names it references that
//!    have not been seen yet are queued behind the rest.
//! 3. Repeat until the queue is empty.
//!
//! Every name is fetched at most once, fetches never overlap, and reference
//! cycles terminate because a seen name is never queued again.

use std::collections::{HashMap, HashSet, VecDeque};

use upward_io::{Encoding, IoInterface};

use crate::ast::{TemplateNode, partial_references};
use crate::error::{TemplateError, TemplateResult};
use crate::parser::parse;

/// Partials loaded by one compile: raw text and parsed nodes per name.
#[derive(Debug, Clone, Default)]
pub struct PartialTable {
    /// Names in fetch order.
    order: Vec<String>,
    sources: HashMap<String, String>,
    nodes: HashMap<String, Vec<TemplateNode>>,
}

impl PartialTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: String, source: String, nodes: Vec<TemplateNode>) {
        self.order.push(name.clone());
        self.sources.insert(name.clone(), source);
        self.nodes.insert(name, nodes);
    }

    /// Partial names in the order they were fetched.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Raw text of a partial.
    pub fn source(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    /// Parsed nodes of a partial.
    pub fn nodes(&self, name: &str) -> Option<&[TemplateNode]> {
        self.nodes.get(name).map(Vec::as_slice)
    }

    /// All parsed partials keyed by name.
    pub fn parsed(&self) -> &HashMap<String, Vec<TemplateNode>> {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// FIFO of names still to fetch plus every name ever queued.
struct Worklist {
    queue: VecDeque<String>,
    seen: HashSet<String>,
    limit: usize,
}

impl Worklist {
    fn new(limit: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            limit,
        }
    }

    /// Queue the not-yet-seen partials referenced by `nodes`.
    fn discover(&mut self, nodes: &[TemplateNode]) -> TemplateResult<()> {
        for name in partial_references(nodes) {
            if self.seen.contains(name) {
                continue;
            }
            if self.seen.len() >= self.limit {
                return Err(TemplateError::TooManyPartials { limit: self.limit });
            }
            self.seen.insert(name.to_string());
            self.queue.push_back(name.to_string());
        }
        Ok(())
    }

    fn next(&mut self) -> Option<String> {
        self.queue.pop_front()
    }
}

/// Load every partial reachable from `root`.
///
/// Fails on the first fetch or parse error; nothing fetched so far is
/// returned in that case.
pub async fn resolve_partials(
    root: &[TemplateNode],
    io: &dyn IoInterface,
    max_partials: usize,
) -> TemplateResult<PartialTable> {
    let mut worklist = Worklist::new(max_partials);
    worklist.discover(root)?;

    let mut table = PartialTable::new();
    while let Some(name) = worklist.next() {
        tracing::debug!(partial = %name, fetched = table.len(), "fetching partial");

        let source = io
            .read_file(&name, Encoding::Utf8)
            .await
            .map_err(|source| TemplateError::Io {
                name: name.clone(),
                source,
            })?;

        let nodes = parse(&source).map_err(|e| TemplateError::PartialParse {
            name: name.clone(),
            source: Box::new(e),
        })?;
        worklist.discover(&nodes)?;

        tracing::trace!(partial = %name, bytes = source.len(), "parsed partial");
        table.insert(name, source, nodes);
    }

    Ok(table)
}
