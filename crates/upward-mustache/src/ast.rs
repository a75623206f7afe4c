/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST types.
//!
//! The parser turns Mustache source into a tree of [`TemplateNode`]s.
//! Comments and delimiter changes are consumed by the parser and leave no
//! node behind; standalone-line whitespace has already been stripped.

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Literal text to be output as-is.
    Text(String),

    /// Interpolation: `{{name}}`, `{{{name}}}` or `{{& name}}`
    Variable(Variable),

    /// Section or inverted section: `{{#name}}...{{/name}}`, `{{^name}}...{{/name}}`
    Section(Section),

    /// Partial reference: `{{> name}}`
    Partial(Partial),
}

/// A variable name, possibly dotted (`person.address.city`).
///
/// The implicit iterator `.` has no segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    segments: Vec<String>,
}

impl Name {
    /// Parse a tag name. Surrounding whitespace must already be trimmed.
    pub fn parse(raw: &str) -> Self {
        if raw == "." {
            return Self {
                segments: Vec::new(),
            };
        }
        Self {
            segments: raw.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_implicit(&self) -> bool {
        self.segments.is_empty()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_implicit() {
            f.write_str(".")
        } else {
            f.write_str(&self.segments.join("."))
        }
    }
}

/// Interpolation of a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: Name,
    /// HTML-escape the value (`{{x}}`); false for `{{{x}}}` and `{{& x}}`.
    pub escape: bool,
}

/// Section block.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: Name,
    /// `{{^name}}`: render only when the value is falsy or absent.
    pub inverted: bool,
    pub children: Vec<TemplateNode>,
}

/// Partial (sub-template) reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Partial {
    /// Partial name as passed to the I/O capability.
    pub name: String,
    /// Whitespace preceding a standalone partial tag, applied to every line
    /// of the partial's output.
    pub indent: Option<String>,
}

impl TemplateNode {
    /// Append partial names referenced in `nodes` to `out`.
    ///
    /// Names appear in a depth-first, left-to-right walk, so a partial inside
    /// a section comes before anything after the section closes. Duplicates
    /// are kept; callers dedupe.
    pub fn collect_partials<'a>(nodes: &'a [TemplateNode], out: &mut Vec<&'a str>) {
        for node in nodes {
            match node {
                TemplateNode::Partial(partial) => out.push(&partial.name),
                TemplateNode::Section(section) => {
                    Self::collect_partials(&section.children, out);
                }
                TemplateNode::Text(_) | TemplateNode::Variable(_) => {}
            }
        }
    }
}

/// Partial names referenced anywhere in `nodes`, in discovery order.
pub fn partial_references(nodes: &[TemplateNode]) -> Vec<&str> {
    let mut out = Vec::new();
    TemplateNode::collect_partials(nodes, &mut out);
    out
}
