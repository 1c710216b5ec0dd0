//! Routes and match results.

pub mod matcher;
pub mod router;

pub use router::Router;

use crate::template::Template;
use crate::values::ValueMap;

/// How many rows an endpoint is expected to produce; declarative metadata
/// carried on the route for callers that map routes onto result sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    One,
    #[default]
    Many,
}

/// Additional route configuration supplied to `add_route`
#[derive(Debug, Clone, Default)]
pub struct RouteArgs {
    pub description: Option<String>,
    pub cardinality: Cardinality,
    pub row_type: Option<String>,
    pub column_types: Vec<String>,
    /// Extra query parameter specs (the text that would sit inside braces)
    /// merged into the template; names already present are left untouched
    pub query_params: Vec<String>,
}

impl RouteArgs {
    /// Create empty route args
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the route description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the expected result cardinality
    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Set the row type name
    pub fn row_type(mut self, row_type: impl Into<String>) -> Self {
        self.row_type = Some(row_type.into());
        self
    }

    /// Set the column type names
    pub fn column_types(mut self, column_types: Vec<String>) -> Self {
        self.column_types = column_types;
        self
    }

    /// Declare one more query parameter spec to merge into the template
    pub fn query_param(mut self, spec: impl Into<String>) -> Self {
        self.query_params.push(spec.into());
        self
    }
}

/// A compiled route held by the router
#[derive(Debug, Clone)]
pub struct Route {
    method: String,
    template: Template,
    index: usize,
    description: Option<String>,
    cardinality: Cardinality,
    row_type: Option<String>,
    column_types: Vec<String>,
}

impl Route {
    pub(crate) fn new(method: String, template: Template, index: usize, args: RouteArgs) -> Self {
        Self {
            method,
            template,
            index,
            description: args.description,
            cardinality: args.cardinality,
            row_type: args.row_type,
            column_types: args.column_types,
        }
    }

    /// The upper-cased method; empty matches any method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The compiled template
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Declaration-order index
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn row_type(&self) -> Option<&str> {
        self.row_type.as_deref()
    }

    pub fn column_types(&self) -> &[String] {
        &self.column_types
    }
}

/// A successful match: the selected route plus the ordered extracted values
#[derive(Debug)]
pub struct MatchResult<'r> {
    index: usize,
    route: &'r Route,
    values: ValueMap,
}

impl<'r> MatchResult<'r> {
    pub(crate) fn new(index: usize, route: &'r Route, values: ValueMap) -> Self {
        Self {
            index,
            route,
            values,
        }
    }

    /// Declaration-order index of the matched route
    pub fn index(&self) -> usize {
        self.index
    }

    /// The matched route
    pub fn route(&self) -> &'r Route {
        self.route
    }

    /// Look up one extracted value
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.values.get(name)
    }

    /// Iterate `(name, value)` pairs in insertion order
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter()
    }

    /// Visit every value in insertion order
    pub fn for_each_value(&self, mut visit: impl FnMut(&str, &str)) {
        for (name, value) in self.values.iter() {
            visit(name, value);
        }
    }

    /// Take ownership of the values map
    pub fn into_values(self) -> ValueMap {
        self.values
    }

    /// The values as an order-preserving JSON array
    pub fn values_json(&self) -> serde_json::Value {
        self.values.to_json()
    }
}
