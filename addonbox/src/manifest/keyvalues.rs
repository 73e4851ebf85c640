//! Insertion-ordered nested key/value document.
//!
//! The legacy client parses manifests with a strict script parser, so key
//! order is part of the wire contract. Entries are kept in a `Vec` and
//! rendered exactly in the order they were pushed.
//!
//! # Text Layout
//!
//! ```text
//! "key"<TAB>"value"<LF>          scalar entry
//! "key"<LF>{<LF> ... }<LF>       nested block
//! ```
//!
//! Every value is rendered as a quoted string, including numbers. Keys and
//! values are written verbatim without escaping.

use std::fmt::{self, Write};

/// A value in a key/value document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    Block(KeyValues),
}

/// An ordered sequence of key/value entries.
///
/// # Example
///
/// ```
/// use addonbox::manifest::KeyValues;
///
/// let mut item = KeyValues::new();
/// item.push("id", 5);
///
/// let mut root = KeyValues::new();
/// root.push("name", "demo");
/// root.push_block("item", item);
///
/// assert_eq!(
///     root.render(),
///     "\"name\"\t\"demo\"\n\"item\"\n{\n\"id\"\t\"5\"\n}\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValues {
    entries: Vec<(String, Value)>,
}

impl KeyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar entry. Any displayable value is accepted and rendered
    /// as a string.
    pub fn push(&mut self, key: impl Into<String>, value: impl fmt::Display) -> &mut Self {
        self.entries
            .push((key.into(), Value::Scalar(value.to_string())));
        self
    }

    /// Append a scalar entry only when the value is non-empty.
    pub fn push_non_empty(&mut self, key: impl Into<String>, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.push(key, value);
        }
        self
    }

    /// Append a nested block.
    pub fn push_block(&mut self, key: impl Into<String>, block: KeyValues) -> &mut Self {
        self.entries.push((key.into(), Value::Block(block)));
        self
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// First scalar stored under `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::Scalar(s) => Some(s),
            Value::Block(_) => None,
        }
    }

    /// First block stored under `key`.
    pub fn get_block(&self, key: &str) -> Option<&KeyValues> {
        match self.get(key)? {
            Value::Block(b) => Some(b),
            Value::Scalar(_) => None,
        }
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the entries in the legacy text layout.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        for (key, value) in &self.entries {
            // Writing to a String cannot fail.
            let _ = match value {
                Value::Scalar(s) => writeln!(out, "\"{}\"\t\"{}\"", key, s),
                Value::Block(block) => {
                    let _ = write!(out, "\"{}\"\n{{\n", key);
                    block.render_into(out);
                    writeln!(out, "}}")
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_renders_nothing() {
        assert_eq!(KeyValues::new().render(), "");
        assert!(KeyValues::new().is_empty());
    }

    #[test]
    fn test_scalar_layout() {
        let mut kv = KeyValues::new();
        kv.push("revision", 3);
        assert_eq!(kv.render(), "\"revision\"\t\"3\"\n");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut kv = KeyValues::new();
        kv.push("z", 1).push("a", 2).push("m", 3);
        let keys: Vec<&str> = kv.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(kv.render(), "\"z\"\t\"1\"\n\"a\"\t\"2\"\n\"m\"\t\"3\"\n");
    }

    #[test]
    fn test_nested_blocks() {
        let mut inner = KeyValues::new();
        inner.push("x", "1");
        let mut middle = KeyValues::new();
        middle.push_block("inner", inner);
        let mut root = KeyValues::new();
        root.push_block("middle", middle);

        assert_eq!(
            root.render(),
            "\"middle\"\n{\n\"inner\"\n{\n\"x\"\t\"1\"\n}\n}\n"
        );
    }

    #[test]
    fn test_empty_block_renders_braces() {
        let mut root = KeyValues::new();
        root.push_block("empty", KeyValues::new());
        assert_eq!(root.render(), "\"empty\"\n{\n}\n");
    }

    #[test]
    fn test_push_non_empty_skips_empty() {
        let mut kv = KeyValues::new();
        kv.push_non_empty("a", "").push_non_empty("b", "x");
        assert_eq!(kv.len(), 1);
        assert_eq!(kv.get_str("b"), Some("x"));
        assert!(kv.get("a").is_none());
    }

    #[test]
    fn test_duplicate_keys_kept() {
        let mut kv = KeyValues::new();
        kv.push("k", 1).push("k", 2);
        assert_eq!(kv.len(), 2);
        assert_eq!(kv.get_str("k"), Some("1"));
    }

    #[test]
    fn test_get_block_type_mismatch() {
        let mut kv = KeyValues::new();
        kv.push("scalar", "v");
        assert!(kv.get_block("scalar").is_none());
        assert!(kv.get_str("missing").is_none());
    }
}
