/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! Walks a parsed node tree against a [`ContextStack`], writing output into a
//! `String`. Partials are looked up by name in the resolved partial table.

use std::collections::HashMap;

use crate::ast::{Partial, Section, TemplateNode, Variable};
use crate::context::{ContextStack, TemplateValue};
use crate::error::{TemplateError, TemplateResult};

/// Everything the evaluator needs besides the data.
pub struct Evaluator<'p> {
    partials: &'p HashMap<String, Vec<TemplateNode>>,
    max_depth: usize,
}

impl<'p> Evaluator<'p> {
    pub fn new(partials: &'p HashMap<String, Vec<TemplateNode>>, max_depth: usize) -> Self {
        Self {
            partials,
            max_depth,
        }
    }

    /// Render `nodes` against `data`.
    pub fn render(&self, nodes: &[TemplateNode], data: &TemplateValue) -> TemplateResult<String> {
        let mut stack = ContextStack::new(data);
        let mut out = String::new();
        self.evaluate(nodes, &mut stack, 0, &mut out)?;
        Ok(out)
    }

    fn evaluate<'a>(
        &self,
        nodes: &[TemplateNode],
        stack: &mut ContextStack<'a>,
        depth: usize,
        out: &mut String,
    ) -> TemplateResult<()> {
        for node in nodes {
            match node {
                TemplateNode::Text(text) => out.push_str(text),
                TemplateNode::Variable(var) => render_variable(var, stack, out),
                TemplateNode::Section(section) => {
                    self.evaluate_section(section, stack, depth, out)?;
                }
                TemplateNode::Partial(partial) => {
                    self.evaluate_partial(partial, stack, depth, out)?;
                }
            }
        }
        Ok(())
    }

    fn evaluate_section<'a>(
        &self,
        section: &Section,
        stack: &mut ContextStack<'a>,
        depth: usize,
        out: &mut String,
    ) -> TemplateResult<()> {
        let value = stack.lookup(&section.name);

        if section.inverted {
            if !value.is_some_and(TemplateValue::is_truthy) {
                self.evaluate(&section.children, stack, depth, out)?;
            }
            return Ok(());
        }

        match value {
            Some(TemplateValue::List(items)) => {
                for item in items {
                    stack.push(item);
                    let result = self.evaluate(&section.children, stack, depth, out);
                    stack.pop();
                    result?;
                }
            }
            Some(value) if value.is_truthy() => {
                stack.push(value);
                let result = self.evaluate(&section.children, stack, depth, out);
                stack.pop();
                result?;
            }
            _ => {}
        }
        Ok(())
    }

    fn evaluate_partial<'a>(
        &self,
        partial: &Partial,
        stack: &mut ContextStack<'a>,
        depth: usize,
        out: &mut String,
    ) -> TemplateResult<()> {
        // Unknown partials render as empty, as in mustache.js.
        let Some(nodes) = self.partials.get(&partial.name) else {
            return Ok(());
        };

        if depth >= self.max_depth {
            return Err(TemplateError::RecursivePartial {
                name: partial.name.clone(),
                max_depth: self.max_depth,
            });
        }

        match &partial.indent {
            None => self.evaluate(nodes, stack, depth + 1, out),
            Some(indent) => {
                let mut rendered = String::new();
                self.evaluate(nodes, stack, depth + 1, &mut rendered)?;
                out.push_str(&indent_lines(&rendered, indent));
                Ok(())
            }
        }
    }
}

fn render_variable(var: &Variable, stack: &ContextStack<'_>, out: &mut String) {
    let Some(value) = stack.lookup(&var.name) else {
        return;
    };
    let text = value.to_text();
    if var.escape {
        escape_html(&text, out);
    } else {
        out.push_str(&text);
    }
}

/// Prefix every line of `text` with `indent`.
///
/// A trailing newline does not start a new (indented) line.
pub fn indent_lines(text: &str, indent: &str) -> String {
    let mut out = String::with_capacity(text.len() + indent.len());
    for line in text.split_inclusive('\n') {
        out.push_str(indent);
        out.push_str(line);
    }
    out
}

/// HTML-escape `text` into `out` using the mustache.js entity table.
pub fn escape_html(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render_with(
        source: &str,
        partials: &[(&str, &str)],
        data: serde_json::Value,
    ) -> TemplateResult<String> {
        let partials: HashMap<String, Vec<TemplateNode>> = partials
            .iter()
            .map(|(name, text)| (name.to_string(), parse(text).unwrap()))
            .collect();
        let nodes = parse(source).unwrap();
        Evaluator::new(&partials, 50).render(&nodes, &TemplateValue::from(data))
    }

    fn render(source: &str, data: serde_json::Value) -> String {
        render_with(source, &[], data).unwrap()
    }

    #[test]
    fn test_interpolation_and_escaping() {
        let data = json!({"name": "<b>Tom & \"Jerry\"</b>"});
        assert_eq!(
            render("{{name}}", data.clone()),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;&#x2F;b&gt;"
        );
        assert_eq!(render("{{{name}}}", data.clone()), "<b>Tom & \"Jerry\"</b>");
        assert_eq!(render("{{& name}}", data), "<b>Tom & \"Jerry\"</b>");
    }

    #[test]
    fn test_missing_variable_renders_empty() {
        assert_eq!(render("[{{missing}}]", json!({})), "[]");
    }

    #[test]
    fn test_section_with_map() {
        let source = "{{#x}}A is {{y}}!{{/x}}{{^x}}no x{{/x}}";
        assert_eq!(render(source, json!({"x": {"y": "ok"}})), "A is ok!");
        assert_eq!(render(source, json!({})), "no x");
    }

    #[test]
    fn test_section_with_list() {
        let source = "{{#items}}<{{name}}>{{/items}}";
        assert_eq!(
            render(source, json!({"items": [{"name": "a"}, {"name": "b"}, {"name": "c"}]})),
            "<a><b><c>"
        );
        assert_eq!(render(source, json!({"items": []})), "");
    }

    #[test]
    fn test_inverted_section_falsy_values() {
        let source = "{{^v}}empty{{/v}}";
        for value in [json!(null), json!(false), json!(0), json!(""), json!([])] {
            assert_eq!(render(source, json!({ "v": value })), "empty");
        }
        assert_eq!(render(source, json!({"v": {}})), "");
        assert_eq!(render(source, json!({"v": [1]})), "");
    }

    #[test]
    fn test_implicit_iterator() {
        assert_eq!(
            render("{{#list}}({{.}}){{/list}}", json!({"list": [1, "two", 3.5]})),
            "(1)(two)(3.5)"
        );
    }

    #[test]
    fn test_scalar_section_pushes_value() {
        assert_eq!(render("{{#name}}Hi {{.}}{{/name}}", json!({"name": "Ann"})), "Hi Ann");
    }

    #[test]
    fn test_context_falls_through_to_parent() {
        let data = json!({"greeting": "hi", "people": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(
            render("{{#people}}{{greeting}} {{name}};{{/people}}", data),
            "hi a;hi b;"
        );
    }

    #[test]
    fn test_dotted_names() {
        let data = json!({"person": {"address": {"city": "Paris"}}});
        assert_eq!(render("{{person.address.city}}", data.clone()), "Paris");
        assert_eq!(render("{{#person.address}}{{city}}{{/person.address}}", data), "Paris");
    }

    #[test]
    fn test_partial_uses_current_context() {
        let result = render_with(
            "{{#people}}{{> item}}{{/people}}",
            &[("item", "[{{name}}]")],
            json!({"people": [{"name": "a"}, {"name": "b"}]}),
        )
        .unwrap();
        assert_eq!(result, "[a][b]");
    }

    #[test]
    fn test_standalone_partial_indentation() {
        let result = render_with(
            "<ul>\n  {{> items}}\n</ul>",
            &[("items", "<li>1</li>\n<li>2</li>\n")],
            json!({}),
        )
        .unwrap();
        assert_eq!(result, "<ul>\n  <li>1</li>\n  <li>2</li>\n</ul>");
    }

    #[test]
    fn test_unknown_partial_renders_empty() {
        assert_eq!(render("a{{> nowhere}}b", json!({})), "ab");
    }

    #[test]
    fn test_unbounded_recursion_fails() {
        let err = render_with("{{> loop}}", &[("loop", "x{{> loop}}")], json!({})).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::RecursivePartial { ref name, max_depth: 50 } if name == "loop"
        ));
    }

    #[test]
    fn test_guarded_recursion_terminates() {
        let data = json!({
            "name": "root",
            "children": [
                {"name": "a", "children": [{"name": "a1", "children": []}]},
                {"name": "b", "children": []}
            ]
        });
        let result = render_with(
            "{{> node}}",
            &[("node", "{{name}}({{#children}}{{> node}}{{/children}})")],
            data,
        )
        .unwrap();
        assert_eq!(result, "root(a(a1())b())");
    }

    #[test]
    fn test_indent_lines() {
        assert_eq!(indent_lines("a\nb", "  "), "  a\n  b");
        assert_eq!(indent_lines("a\n", "  "), "  a\n");
        assert_eq!(indent_lines("", "  "), "");
    }
}
