/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compile and render options for Mustache resources.

use serde::Deserialize;

/// Default limit on distinct partials loaded by one compile.
pub const DEFAULT_MAX_PARTIALS: usize = 256;

/// Default limit on nested partial rendering.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Options for a [`MustacheTemplate`](crate::MustacheTemplate).
///
/// Can be embedded in a larger configuration file:
///
/// ```ignore
/// [mustache]
/// trim-output = false
/// max-partials = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MustacheOptions {
    /// Trim leading and trailing whitespace from rendered output.
    pub trim_output: bool,
    /// Maximum number of distinct partials one compile may load.
    pub max_partials: usize,
    /// Maximum partial nesting depth while rendering.
    pub max_depth: usize,
}

impl Default for MustacheOptions {
    fn default() -> Self {
        Self {
            trim_output: true,
            max_partials: DEFAULT_MAX_PARTIALS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MustacheOptions {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trim_output(mut self, trim_output: bool) -> Self {
        self.trim_output = trim_output;
        self
    }

    pub fn with_max_partials(mut self, max_partials: usize) -> Self {
        self.max_partials = max_partials;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = MustacheOptions::default();
        assert!(options.trim_output);
        assert_eq!(options.max_partials, DEFAULT_MAX_PARTIALS);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let options: MustacheOptions =
            serde_json::from_value(json!({"trim-output": false, "max-depth": 8})).unwrap();

        assert_eq!(
            options,
            MustacheOptions::new()
                .with_trim_output(false)
                .with_max_depth(8)
        );
    }

    #[test]
    fn test_deserialize_empty_config() {
        let options: MustacheOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, MustacheOptions::default());
    }
}
