//! Raw query string parsing.
//!
//! Pairs are split at `&`, each pair at its first `=`, and keys and values
//! are percent-decoded independently (`+` decodes to a space). Every value of
//! a repeated key is retained in order; validation downstream uses the first.
//! A `;` appearing in a key is reported as an invalid separator, but parsing
//! continues.

use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// A parsed query string with first-occurrence key order preserved
#[derive(Debug, Clone, Default)]
pub struct QueryValues {
    keys: Vec<String>,
    map: HashMap<String, Vec<String>>,
    invalid_separator: bool,
}

impl QueryValues {
    /// Parse a raw query string (without the leading `?`)
    pub fn parse(raw: &str) -> Self {
        let mut values = Self::default();
        for piece in raw.split('&') {
            if piece.is_empty() {
                continue;
            }
            let (raw_key, raw_value) = match piece.find('=') {
                Some(i) => (&piece[..i], &piece[i + 1..]),
                None => (piece, ""),
            };
            if raw_key.contains(';') {
                values.invalid_separator = true;
            }
            let key = decode(raw_key);
            let value = decode(raw_value);
            if !values.map.contains_key(&key) {
                values.keys.push(key.clone());
            }
            values.map.entry(key).or_default().push(value);
        }
        values
    }

    /// The first value supplied for a key
    pub fn first(&self, name: &str) -> Option<&str> {
        self.map
            .get(name)
            .and_then(|v| v.first())
            .map(|v| v.as_str())
    }

    /// Every value supplied for a key, in order
    pub fn all(&self, name: &str) -> &[String] {
        self.map.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Whether the key appeared at all
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Keys in first-occurrence order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.as_str())
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no pairs were parsed
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether a `;` separator was seen inside a key
    pub fn had_invalid_separator(&self) -> bool {
        self.invalid_separator
    }
}

fn decode(raw: &str) -> String {
    let unplussed = raw.replace('+', " ");
    percent_decode_str(&unplussed).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let q = QueryValues::parse("a=1&b=2&c=3");
        let keys: Vec<&str> = q.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(q.first("b"), Some("2"));
    }

    #[test]
    fn test_repeats_keep_all_values_first_wins() {
        let q = QueryValues::parse("x=1&y=9&x=2&x=3");
        assert_eq!(q.first("x"), Some("1"));
        assert_eq!(q.all("x"), &["1", "2", "3"]);
        let keys: Vec<&str> = q.keys().collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn test_percent_decoding() {
        let q = QueryValues::parse("name=caf%C3%A9&path=a%2Fb");
        assert_eq!(q.first("name"), Some("café"));
        assert_eq!(q.first("path"), Some("a/b"));
    }

    #[test]
    fn test_plus_decodes_to_space() {
        let q = QueryValues::parse("q=hello+world");
        assert_eq!(q.first("q"), Some("hello world"));
    }

    #[test]
    fn test_encoded_plus_stays_plus() {
        let q = QueryValues::parse("q=1%2B1");
        assert_eq!(q.first("q"), Some("1+1"));
    }

    #[test]
    fn test_key_without_value() {
        let q = QueryValues::parse("flag&x=1");
        assert_eq!(q.first("flag"), Some(""));
        assert!(q.contains("flag"));
    }

    #[test]
    fn test_empty_pieces_skipped() {
        let q = QueryValues::parse("a=1&&b=2&");
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_empty_query() {
        let q = QueryValues::parse("");
        assert!(q.is_empty());
        assert!(!q.had_invalid_separator());
    }

    #[test]
    fn test_semicolon_in_key_is_flagged_but_parsing_continues() {
        let q = QueryValues::parse("a=1&b;c=2&d=3");
        assert!(q.had_invalid_separator());
        assert_eq!(q.first("a"), Some("1"));
        assert_eq!(q.first("d"), Some("3"));
    }
}
