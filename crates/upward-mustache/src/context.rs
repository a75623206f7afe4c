/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template value and context types.
//!
//! [`TemplateValue`] is the data a template renders against. It converts from
//! `serde_json::Value`, so callers can hand over whatever JSON-shaped data
//! they already have. [`ContextStack`] is the Mustache name-resolution stack
//! that sections push onto.

use std::collections::HashMap;

use serde_json::Number;

use crate::ast::Name;

/// A value that can be used in template evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TemplateValue {
    /// A null/missing value.
    #[default]
    Null,

    /// A boolean value.
    Bool(bool),

    /// A numeric value.
    Number(Number),

    /// A string value.
    String(String),

    /// An ordered list of values.
    List(Vec<TemplateValue>),

    /// A map of string keys to values.
    Map(HashMap<String, TemplateValue>),
}

impl TemplateValue {
    /// An empty map, the context used when no data is supplied.
    pub fn empty_map() -> Self {
        TemplateValue::Map(HashMap::new())
    }

    /// Check if this value is "truthy" for section evaluation.
    ///
    /// Truthiness rules (matching mustache.js):
    /// - `null`, `false`, `0`, and `""` are falsy
    /// - An empty list is falsy, any other list is truthy
    /// - Every map is truthy, even an empty one
    pub fn is_truthy(&self) -> bool {
        match self {
            TemplateValue::Null => false,
            TemplateValue::Bool(b) => *b,
            TemplateValue::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
            TemplateValue::String(s) => !s.is_empty(),
            TemplateValue::List(items) => !items.is_empty(),
            TemplateValue::Map(_) => true,
        }
    }

    /// Look up a single key or list index on this value.
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        match self {
            TemplateValue::Map(m) => m.get(key),
            TemplateValue::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Get a nested field by path.
    ///
    /// For example, `get_path(&["employee", "salary"])` on a Map containing
    /// `{"employee": {"salary": 50000}}` returns the salary value.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&TemplateValue> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.get(first.as_ref()).and_then(|v| v.get_path(rest)),
        }
    }

    /// Render this value as interpolated text (before escaping).
    ///
    /// - String: returned as-is
    /// - Number: its JSON representation
    /// - Bool: "true" or "false"
    /// - List: elements joined with ","
    /// - Map, Null: ""
    pub fn to_text(&self) -> String {
        match self {
            TemplateValue::Null | TemplateValue::Map(_) => String::new(),
            TemplateValue::Bool(b) => b.to_string(),
            TemplateValue::Number(n) => n.to_string(),
            TemplateValue::String(s) => s.clone(),
            TemplateValue::List(items) => items
                .iter()
                .map(TemplateValue::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<serde_json::Value> for TemplateValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TemplateValue::Null,
            serde_json::Value::Bool(b) => TemplateValue::Bool(b),
            serde_json::Value::Number(n) => TemplateValue::Number(n),
            serde_json::Value::String(s) => TemplateValue::String(s),
            serde_json::Value::Array(items) => {
                TemplateValue::List(items.into_iter().map(TemplateValue::from).collect())
            }
            serde_json::Value::Object(map) => TemplateValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, TemplateValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::String(s.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::String(s)
    }
}

impl From<bool> for TemplateValue {
    fn from(b: bool) -> Self {
        TemplateValue::Bool(b)
    }
}

impl From<Vec<TemplateValue>> for TemplateValue {
    fn from(items: Vec<TemplateValue>) -> Self {
        TemplateValue::List(items)
    }
}

impl From<HashMap<String, TemplateValue>> for TemplateValue {
    fn from(map: HashMap<String, TemplateValue>) -> Self {
        TemplateValue::Map(map)
    }
}

/// The Mustache context stack.
///
/// The bottom frame is the render data; each section iteration pushes the
/// value it renders against. Names resolve from the top frame down.
#[derive(Debug, Clone)]
pub struct ContextStack<'a> {
    frames: Vec<&'a TemplateValue>,
}

impl<'a> ContextStack<'a> {
    /// Create a stack whose only frame is `root`.
    pub fn new(root: &'a TemplateValue) -> Self {
        Self { frames: vec![root] }
    }

    pub fn push(&mut self, value: &'a TemplateValue) {
        self.frames.push(value);
    }

    pub fn pop(&mut self) {
        // The root frame stays for the stack's whole life.
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Resolve a name.
    ///
    /// The implicit iterator `.` is the top frame. Otherwise the first
    /// segment is found in the nearest frame that has it, and the remaining
    /// segments are looked up inside that value.
    pub fn lookup(&self, name: &Name) -> Option<&'a TemplateValue> {
        let Some((first, rest)) = name.segments().split_first() else {
            return self.frames.last().copied();
        };

        self.frames
            .iter()
            .rev()
            .copied()
            .find_map(|frame| frame.get(first))
            .and_then(|value| value.get_path(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(TemplateValue::Bool(true).is_truthy());
        assert!(!TemplateValue::Bool(false).is_truthy());

        assert!(TemplateValue::from("hello").is_truthy());
        assert!(TemplateValue::from("false").is_truthy()); // "false" string is truthy!
        assert!(!TemplateValue::from("").is_truthy());

        assert!(TemplateValue::from(json!(1)).is_truthy());
        assert!(!TemplateValue::from(json!(0)).is_truthy());
        assert!(!TemplateValue::from(json!(0.0)).is_truthy());

        assert!(TemplateValue::List(vec![TemplateValue::Bool(false)]).is_truthy());
        assert!(!TemplateValue::List(vec![]).is_truthy());

        assert!(TemplateValue::empty_map().is_truthy());
        assert!(!TemplateValue::Null.is_truthy());
    }

    #[test]
    fn test_from_json() {
        let value = TemplateValue::from(json!({
            "name": "x",
            "tags": ["a", "b"],
            "count": 3,
            "ok": true,
            "none": null
        }));

        assert_eq!(value.get("name"), Some(&TemplateValue::from("x")));
        assert_eq!(value.get_path(&["tags", "1"]), Some(&TemplateValue::from("b")));
        assert_eq!(value.get("count").map(|v| v.to_text()), Some("3".to_string()));
        assert_eq!(value.get("ok"), Some(&TemplateValue::Bool(true)));
        assert_eq!(value.get("none"), Some(&TemplateValue::Null));
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(TemplateValue::Null.to_text(), "");
        assert_eq!(TemplateValue::Bool(false).to_text(), "false");
        assert_eq!(TemplateValue::from(json!(1.5)).to_text(), "1.5");
        assert_eq!(TemplateValue::from(json!(["a", 1, true])).to_text(), "a,1,true");
        assert_eq!(TemplateValue::from(json!({"a": 1})).to_text(), "");
    }

    #[test]
    fn test_stack_scoping() {
        let root = TemplateValue::from(json!({"x": "root_x", "y": "root_y"}));
        let inner = TemplateValue::from(json!({"x": "inner_x"}));

        let mut stack = ContextStack::new(&root);
        stack.push(&inner);

        // Inner frame shadows root for 'x'
        assert_eq!(stack.lookup(&Name::parse("x")), Some(&TemplateValue::from("inner_x")));
        // Inner frame falls through to root for 'y'
        assert_eq!(stack.lookup(&Name::parse("y")), Some(&TemplateValue::from("root_y")));
        // Implicit iterator is the top frame
        assert_eq!(stack.lookup(&Name::parse(".")), Some(&inner));

        stack.pop();
        assert_eq!(stack.lookup(&Name::parse("x")), Some(&TemplateValue::from("root_x")));

        // The root frame is never popped
        stack.pop();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_dotted_lookup_does_not_fall_through() {
        let root = TemplateValue::from(json!({"a": {"b": {"c": "deep"}}, "c": "shallow"}));
        let inner = TemplateValue::from(json!({"a": {}}));

        let mut stack = ContextStack::new(&root);
        assert_eq!(
            stack.lookup(&Name::parse("a.b.c")),
            Some(&TemplateValue::from("deep"))
        );

        // 'a' is found on the inner frame first, so 'a.b.c' does not resolve
        stack.push(&inner);
        assert_eq!(stack.lookup(&Name::parse("a.b.c")), None);
    }
}
