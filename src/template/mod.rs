//! Compiled URL templates.
//!
//! A template owns its segment list, its ordered parameter map and the single
//! anchored regex compiled for its path. Templates are immutable once a route
//! holds them and are shared read-only across concurrent match calls.

pub mod compiler;
pub mod param;
pub mod parser;
pub mod segment;

pub use param::{ParamLocation, Parameter};
pub use segment::Segment;

use crate::errors::TemplateError;
use crate::values::ValueMap;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Ordered parameter collection keyed by name: path parameters first in
/// declaration order, then query parameters
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    params: Vec<Parameter>,
    index: HashMap<String, usize>,
}

impl ParamMap {
    /// Append a parameter; duplicate names are rejected
    pub(crate) fn insert(&mut self, parameter: Parameter) -> Result<(), ()> {
        let name = parameter.name().to_string();
        if self.index.contains_key(&name) {
            return Err(());
        }
        self.index.insert(name, self.params.len());
        self.params.push(parameter);
        Ok(())
    }

    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&i| &self.params[i])
    }

    /// Whether a parameter with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Path parameters in capture order
    pub fn path_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params
            .iter()
            .filter(|p| p.location() == ParamLocation::Path)
    }

    /// Query parameters in declaration order
    pub fn query_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params
            .iter()
            .filter(|p| p.location() == ParamLocation::Query)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the template declares no parameters
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// A parsed and compiled URL template
#[derive(Debug, Clone)]
pub struct Template {
    original: String,
    segments: Vec<Segment>,
    params: ParamMap,
    pattern: Regex,
}

impl Template {
    /// Parse and compile a template string
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        parser::parse_template(text)
    }

    pub(crate) fn assemble(
        original: String,
        segments: Vec<Segment>,
        params: ParamMap,
        pattern: Regex,
    ) -> Self {
        Self {
            original,
            segments,
            params,
            pattern,
        }
    }

    /// The template text exactly as written
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Path segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The template's parameters
    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// The anchored path pattern
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Merge one more query parameter; used when routes declare parameters
    /// outside the template text. Existing names are never overwritten.
    pub(crate) fn push_query_param(&mut self, parameter: Parameter) {
        // Err means the name is present; the merge contract is to keep it
        let _ = self.params.insert(parameter);
    }

    /// Fill the template with concrete values, the inverse of matching.
    ///
    /// Path parameters and required query parameters must be present in the
    /// map; optional query parameters are emitted only when present.
    pub fn expand(&self, values: &ValueMap) -> Result<String, TemplateError> {
        let mut url = String::new();
        for segment in &self.segments {
            url.push('/');
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Parameter {
                    prefix,
                    name,
                    suffix,
                } => {
                    let value = values.get(name).ok_or_else(|| {
                        TemplateError::syntax(
                            self.original.as_str(),
                            format!("cannot expand template: missing value for `{}`", name),
                        )
                    })?;
                    url.push_str(prefix);
                    url.push_str(value);
                    url.push_str(suffix);
                }
            }
        }

        let mut query_pairs = Vec::new();
        for parameter in self.params.query_params() {
            match values.get(parameter.name()) {
                Some(value) => query_pairs.push(format!("{}={}", parameter.name(), value)),
                None if parameter.is_optional() => {}
                None => {
                    return Err(TemplateError::syntax(
                        self.original.as_str(),
                        format!(
                            "cannot expand template: missing value for `{}`",
                            parameter.name()
                        ),
                    ))
                }
            }
        }
        if !query_pairs.is_empty() {
            url.push('?');
            url.push_str(&query_pairs.join("&"));
        }
        Ok(url)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_round_trips_verbatim() {
        let text = "/users/{id:int}?{limit?20:int}";
        let template = Template::parse(text).unwrap();
        assert_eq!(template.original(), text);
        assert_eq!(template.to_string(), text);
    }

    #[test]
    fn test_param_map_ordering() {
        let t = Template::parse("/a/{x:int}/{y:int}?{q:string}&{r?:string}").unwrap();
        let names: Vec<&str> = t.params().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["x", "y", "q", "r"]);
        let path: Vec<&str> = t.params().path_params().map(|p| p.name()).collect();
        assert_eq!(path, vec!["x", "y"]);
        let query: Vec<&str> = t.params().query_params().map(|p| p.name()).collect();
        assert_eq!(query, vec!["q", "r"]);
    }

    #[test]
    fn test_expand_fills_path_and_query() {
        let t = Template::parse("/users/{id:int}?{limit?20:int}&{q:string}").unwrap();
        let mut values = ValueMap::new();
        values.insert("id", "42");
        values.insert("q", "books");
        assert_eq!(t.expand(&values).unwrap(), "/users/42?q=books");

        values.insert("limit", "10");
        assert_eq!(t.expand(&values).unwrap(), "/users/42?limit=10&q=books");
    }

    #[test]
    fn test_expand_requires_path_values() {
        let t = Template::parse("/users/{id:int}").unwrap();
        assert!(t.expand(&ValueMap::new()).is_err());
    }

    #[test]
    fn test_expanded_url_matches_own_template() {
        let t = Template::parse("/users/{id:int}/posts/{slug:slug}").unwrap();
        let mut values = ValueMap::new();
        values.insert("id", "7");
        values.insert("slug", "hello-world");
        let url = t.expand(&values).unwrap();
        assert!(t.pattern().is_match(&url));
    }
}
