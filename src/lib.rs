//! Typed URL path-template routing.
//!
//! `routespec` compiles templates like
//! `GET /users/{id:int:range[1..1000]}/posts/{slug:slug:length[5..50]}?{limit?20:int:range[1..100]}`
//! ahead of request traffic, then matches `(method, path, query)` triples
//! against them: the first route whose method and anchored path pattern apply
//! is selected, named parameter values are extracted from the path and query
//! string, validated against typed and constrained rules, and either an
//! insertion-ordered values map or a structured error with a suggested
//! example URL comes back.
//!
//! ```
//! use routespec::{RouteArgs, Router};
//!
//! let mut router = Router::new();
//! router
//!     .add_route(
//!         "GET",
//!         "/products?{category:string}&{limit?20:int:range[1..100]}",
//!         RouteArgs::new(),
//!     )
//!     .unwrap();
//!
//! let result = router
//!     .match_request("GET", "/products", "category=books")
//!     .unwrap();
//! assert_eq!(result.get_value("category"), Some("books"));
//! assert_eq!(result.get_value("limit"), Some("20"));
//! ```
//!
//! Compiled routes are immutable after registration; `match_request`
//! allocates a fresh values map per call and is safe to invoke concurrently.

pub mod constraint;
pub mod datatype;
pub mod errors;
pub mod query;
pub mod routing;
pub mod template;
pub mod values;

mod decompose;
mod example;
mod validate;


pub use constraint::{Constraint, ConstraintKind};
pub use datatype::{Classifier, DataType};
pub use errors::{
    find_cause, ConstraintError, FaultSource, MatchError, ParameterError, RouteErrorKind,
    TemplateError,
};
pub use query::QueryValues;
pub use routing::{Cardinality, MatchResult, Route, RouteArgs, Router};
pub use template::{ParamLocation, ParamMap, Parameter, Segment, Template};
pub use values::ValueMap;
