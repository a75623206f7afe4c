/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mustache template parser.
//!
//! Parsing runs in two passes. The lexer scans tags with the current
//! delimiters and groups tokens by source line, so that standalone lines
//! (a section, inverted, close, comment, partial, or delimiter tag alone on
//! a line with only whitespace around it) lose their whitespace and line
//! ending. The tree builder then matches section open/close tags.

use crate::ast::{Name, Partial, Section, TemplateNode, Variable};
use crate::error::{TemplateError, TemplateResult};

const DEFAULT_OPEN: &str = "{{";
const DEFAULT_CLOSE: &str = "}}";

/// Deepest section nesting a template may use.
pub const MAX_SECTION_NESTING: usize = 512;

/// Parse Mustache source into a node tree.
pub fn parse(source: &str) -> TemplateResult<Vec<TemplateNode>> {
    let tokens = Lexer::new(source).run()?;
    build_tree(source, tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Interpolate { escape: bool },
    Section,
    Inverted,
    Close,
    Partial,
    Comment,
    Delimiters,
}

impl TagKind {
    fn can_stand_alone(self) -> bool {
        !matches!(self, TagKind::Interpolate { .. })
    }
}

#[derive(Debug)]
enum Token {
    /// Text from a single line, including its trailing newline if any.
    Text(String),
    Tag {
        kind: TagKind,
        content: String,
        offset: usize,
        /// Leading whitespace of a standalone line.
        indent: Option<String>,
    },
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    open: String,
    close: String,
    line: Vec<Token>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            open: DEFAULT_OPEN.to_string(),
            close: DEFAULT_CLOSE.to_string(),
            line: Vec::new(),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> TemplateResult<Vec<Token>> {
        let source = self.source;
        while self.pos < source.len() {
            match source[self.pos..].find(self.open.as_str()) {
                Some(rel) => {
                    let tag_start = self.pos + rel;
                    self.push_text(&source[self.pos..tag_start]);
                    self.read_tag(tag_start)?;
                }
                None => {
                    self.push_text(&source[self.pos..]);
                    self.pos = source.len();
                }
            }
        }
        self.finish_line();
        Ok(self.tokens)
    }

    fn push_text(&mut self, text: &str) {
        for piece in text.split_inclusive('\n') {
            self.line.push(Token::Text(piece.to_string()));
            if piece.ends_with('\n') {
                self.finish_line();
            }
        }
    }

    fn read_tag(&mut self, start: usize) -> TemplateResult<()> {
        let source = self.source;
        let after_open = start + self.open.len();

        let (kind, sigil) = match source[after_open..].chars().next() {
            Some('{') => (TagKind::Interpolate { escape: false }, Some('{')),
            Some('&') => (TagKind::Interpolate { escape: false }, Some('&')),
            Some('#') => (TagKind::Section, Some('#')),
            Some('^') => (TagKind::Inverted, Some('^')),
            Some('/') => (TagKind::Close, Some('/')),
            Some('>') => (TagKind::Partial, Some('>')),
            Some('!') => (TagKind::Comment, Some('!')),
            Some('=') => (TagKind::Delimiters, Some('=')),
            _ => (TagKind::Interpolate { escape: true }, None),
        };
        let body_start = after_open + sigil.map_or(0, char::len_utf8);

        let terminator = match sigil {
            Some('{') => format!("}}{}", self.close),
            Some('=') => format!("={}", self.close),
            _ => self.close.clone(),
        };
        let body_end = source[body_start..]
            .find(terminator.as_str())
            .map(|i| body_start + i)
            .ok_or_else(|| {
                TemplateError::parse_at(
                    format!("Unclosed tag: expected '{}'", terminator),
                    source,
                    start,
                )
            })?;
        let content = source[body_start..body_end].trim();
        self.pos = body_end + terminator.len();

        match kind {
            TagKind::Comment => {}
            TagKind::Delimiters => self.set_delimiters(content, start)?,
            _ if content.is_empty() => {
                return Err(TemplateError::parse_at("Empty tag name", source, start));
            }
            _ => {}
        }

        self.line.push(Token::Tag {
            kind,
            content: content.to_string(),
            offset: start,
            indent: None,
        });
        Ok(())
    }

    fn set_delimiters(&mut self, content: &str, start: usize) -> TemplateResult<()> {
        let parts: Vec<&str> = content.split_whitespace().collect();
        match parts.as_slice() {
            [open, close] if !open.contains('=') && !close.contains('=') => {
                self.open = open.to_string();
                self.close = close.to_string();
                Ok(())
            }
            _ => Err(TemplateError::parse_at(
                format!("Invalid delimiter tag '{}'", content),
                self.source,
                start,
            )),
        }
    }

    /// Move the current line's tokens to the output, stripping it if it is
    /// a standalone line.
    fn finish_line(&mut self) {
        let line = std::mem::take(&mut self.line);

        let mut tags = line.iter().filter(|t| matches!(t, Token::Tag { .. }));
        let standalone = match (tags.next(), tags.next()) {
            (Some(Token::Tag { kind, .. }), None) => {
                kind.can_stand_alone()
                    && line.iter().all(|t| match t {
                        Token::Text(s) => s.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n')),
                        Token::Tag { .. } => true,
                    })
            }
            _ => false,
        };

        if !standalone {
            self.tokens.extend(line);
            return;
        }

        let mut leading = String::new();
        for token in line {
            match token {
                Token::Text(text) => leading.push_str(&text),
                Token::Tag {
                    kind,
                    content,
                    offset,
                    ..
                } => {
                    let indent = (!leading.is_empty()).then(|| std::mem::take(&mut leading));
                    self.tokens.push(Token::Tag {
                        kind,
                        content,
                        offset,
                        indent,
                    });
                    // Trailing whitespace and the line ending are dropped.
                    break;
                }
            }
        }
    }
}

struct OpenSection {
    name: String,
    inverted: bool,
    offset: usize,
    children: Vec<TemplateNode>,
}

fn current<'s>(
    root: &'s mut Vec<TemplateNode>,
    stack: &'s mut [OpenSection],
) -> &'s mut Vec<TemplateNode> {
    match stack.last_mut() {
        Some(section) => &mut section.children,
        None => root,
    }
}

fn push_text(nodes: &mut Vec<TemplateNode>, text: String) {
    if text.is_empty() {
        return;
    }
    match nodes.last_mut() {
        Some(TemplateNode::Text(prev)) => prev.push_str(&text),
        _ => nodes.push(TemplateNode::Text(text)),
    }
}

fn build_tree(source: &str, tokens: Vec<Token>) -> TemplateResult<Vec<TemplateNode>> {
    let mut root = Vec::new();
    let mut stack: Vec<OpenSection> = Vec::new();

    for token in tokens {
        match token {
            Token::Text(text) => push_text(current(&mut root, &mut stack), text),
            Token::Tag {
                kind,
                content,
                offset,
                indent,
            } => match kind {
                TagKind::Interpolate { escape } => {
                    current(&mut root, &mut stack).push(TemplateNode::Variable(Variable {
                        name: Name::parse(&content),
                        escape,
                    }));
                }
                TagKind::Section | TagKind::Inverted => {
                    if stack.len() >= MAX_SECTION_NESTING {
                        return Err(TemplateError::parse_at(
                            format!("Sections nested deeper than {}", MAX_SECTION_NESTING),
                            source,
                            offset,
                        ));
                    }
                    stack.push(OpenSection {
                        name: content,
                        inverted: kind == TagKind::Inverted,
                        offset,
                        children: Vec::new(),
                    });
                }
                TagKind::Close => {
                    let section = stack.pop().ok_or_else(|| {
                        TemplateError::parse_at(
                            format!("Unopened section '{}'", content),
                            source,
                            offset,
                        )
                    })?;
                    if section.name != content {
                        return Err(TemplateError::parse_at(
                            format!(
                                "Unclosed section '{}' (found closing tag for '{}')",
                                section.name, content
                            ),
                            source,
                            offset,
                        ));
                    }
                    current(&mut root, &mut stack).push(TemplateNode::Section(Section {
                        name: Name::parse(&section.name),
                        inverted: section.inverted,
                        children: section.children,
                    }));
                }
                TagKind::Partial => {
                    current(&mut root, &mut stack).push(TemplateNode::Partial(Partial {
                        name: content,
                        indent,
                    }));
                }
                TagKind::Comment | TagKind::Delimiters => {}
            },
        }
    }

    if let Some(section) = stack.pop() {
        return Err(TemplateError::parse_at(
            format!("Unclosed section '{}'", section.name),
            source,
            section.offset,
        ));
    }

    Ok(root)
}
