//! Layered structured errors.
//!
//! Failures surface as three nested layers: a [`ConstraintError`] from one
//! failing constraint, a [`ParameterError`] wrapping everything that went
//! wrong with one parameter, and a [`TemplateError`] adding the endpoint,
//! evaluated source text and a suggestion URL. Every layer stays reachable
//! from the top: by sentinel kind ([`TemplateError::is`]), by field access on
//! the joined collections, or by walking the `std::error::Error` cause chain
//! with [`find_cause`].

use crate::constraint::ConstraintKind;
use crate::template::ParamLocation;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Attribution of a failure, used by transport layers to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultSource {
    /// The request was malformed; maps to 422 or a protocol equivalent
    Client,
    /// The router or template was misconfigured; maps to 500
    Server,
}

/// Sentinel kinds matchable regardless of how deeply an error is wrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteErrorKind {
    InvalidTemplate,
    InvalidParameter,
    InvalidConstraint,
}

impl fmt::Display for RouteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteErrorKind::InvalidTemplate => write!(f, "invalid template"),
            RouteErrorKind::InvalidParameter => write!(f, "invalid parameter"),
            RouteErrorKind::InvalidConstraint => write!(f, "invalid constraint"),
        }
    }
}

/// One failing constraint check
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{detail}")]
pub struct ConstraintError {
    /// Which constraint kind failed
    pub kind: ConstraintKind,
    /// The textual rule, e.g. `range[1..100]`
    pub rule: String,
    /// The offending value
    pub received: String,
    /// Human-readable description of the violation
    pub detail: String,
}

impl ConstraintError {
    /// Create a new constraint error
    pub fn new(
        kind: ConstraintKind,
        rule: impl Into<String>,
        received: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            rule: rule.into(),
            received: received.into(),
            detail: detail.into(),
        }
    }

    /// Constraint violations are always the client's fault
    pub fn fault_source(&self) -> FaultSource {
        FaultSource::Client
    }

    /// Sentinel kind of this layer
    pub fn error_kind(&self) -> RouteErrorKind {
        RouteErrorKind::InvalidConstraint
    }
}

/// Everything that went wrong with one parameter.
///
/// Wraps zero or more [`ConstraintError`]s; `type_mismatch` marks a data-type
/// failure as the root cause.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterError {
    /// The parameter name
    pub parameter: String,
    /// Slug of the expected data type
    pub expected_type: String,
    /// The offending value (empty when the parameter was missing)
    pub received: String,
    /// Whether the parameter lives in the path or the query string
    pub location: ParamLocation,
    /// Human-readable description of the root cause
    pub detail: String,
    /// Kind of the first failing constraint, when one failed
    pub constraint_kind: Option<ConstraintKind>,
    /// Whether the value failed data-type validation
    pub type_mismatch: bool,
    constraints: Vec<ConstraintError>,
}

impl ParameterError {
    /// Create a parameter error with no inner constraint failures
    pub fn new(
        parameter: impl Into<String>,
        expected_type: impl Into<String>,
        received: impl Into<String>,
        location: ParamLocation,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            expected_type: expected_type.into(),
            received: received.into(),
            location,
            detail: detail.into(),
            constraint_kind: None,
            type_mismatch: false,
            constraints: Vec::new(),
        }
    }

    /// Attach joined constraint failures; the first one supplies
    /// `constraint_kind` and, unless a type mismatch took precedence, the
    /// detail text
    pub fn with_constraints(mut self, constraints: Vec<ConstraintError>) -> Self {
        if let Some(first) = constraints.first() {
            self.constraint_kind = Some(first.kind);
            if !self.type_mismatch {
                self.detail = first.detail.clone();
            }
        }
        self.constraints = constraints;
        self
    }

    /// Mark the data type itself as the root cause
    pub fn with_type_mismatch(mut self, detail: impl Into<String>) -> Self {
        self.type_mismatch = true;
        self.detail = detail.into();
        self
    }

    /// Error for a required parameter absent from the request
    pub fn missing(
        parameter: impl Into<String>,
        expected_type: impl Into<String>,
        location: ParamLocation,
    ) -> Self {
        let parameter = parameter.into();
        let detail = format!("required parameter `{}` is missing", parameter);
        Self::new(parameter, expected_type, "", location, detail)
    }

    /// The joined constraint failures, in constraint declaration order
    pub fn constraint_errors(&self) -> &[ConstraintError] {
        &self.constraints
    }

    /// Parameter failures are attributed to the client
    pub fn fault_source(&self) -> FaultSource {
        FaultSource::Client
    }

    /// Sentinel kind of this layer
    pub fn error_kind(&self) -> RouteErrorKind {
        RouteErrorKind::InvalidParameter
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} parameter `{}`: {}",
            self.location, self.parameter, self.detail
        )
    }
}

impl StdError for ParameterError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.constraints.first().map(|c| c as &(dyn StdError + 'static))
    }
}

/// The outermost error layer: endpoint context plus a suggestion URL.
///
/// Produced at `add_route` for syntactic and semantic template failures, and
/// at `match_request` wrapping the joined validation failures of one route
/// attempt.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateError {
    /// The template text of the endpoint
    pub endpoint: String,
    /// The source text (template, path or query) that was being evaluated
    pub source_text: String,
    /// Location of the first failing parameter, when one exists
    pub location: Option<ParamLocation>,
    /// Example URL the engine would accept
    pub example: Option<String>,
    /// Human-readable correction hint embedding the example URL
    pub suggestion: Option<String>,
    /// Human-readable description of the root cause
    pub detail: String,
    kind: RouteErrorKind,
    parameters: Vec<ParameterError>,
}

impl TemplateError {
    /// Syntactic template failure (unmatched braces, malformed segment, …)
    pub fn syntax(endpoint: impl Into<String>, detail: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            source_text: endpoint.clone(),
            endpoint,
            location: None,
            example: None,
            suggestion: None,
            detail: detail.into(),
            kind: RouteErrorKind::InvalidTemplate,
            parameters: Vec::new(),
        }
    }

    /// Wrap a parameter-level failure raised while parsing a template
    pub fn from_parameter(
        endpoint: impl Into<String>,
        source_text: impl Into<String>,
        error: ParameterError,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            source_text: source_text.into(),
            location: Some(error.location),
            example: None,
            suggestion: None,
            detail: error.detail.clone(),
            kind: RouteErrorKind::InvalidTemplate,
            parameters: vec![error],
        }
    }

    /// Wrap the joined validation failures of one route attempt
    pub fn validation(
        endpoint: impl Into<String>,
        source_text: impl Into<String>,
        example: Option<String>,
        suggestion: Option<String>,
        parameters: Vec<ParameterError>,
    ) -> Self {
        let (location, detail) = match parameters.first() {
            Some(p) => (Some(p.location), p.detail.clone()),
            None => (None, "validation failed".to_string()),
        };
        Self {
            endpoint: endpoint.into(),
            source_text: source_text.into(),
            location,
            example,
            suggestion,
            detail,
            kind: RouteErrorKind::InvalidTemplate,
            parameters,
        }
    }

    /// The joined parameter failures, in declaration order
    pub fn parameter_errors(&self) -> &[ParameterError] {
        &self.parameters
    }

    /// The first failing parameter, when one exists
    pub fn first_parameter(&self) -> Option<&ParameterError> {
        self.parameters.first()
    }

    /// Sentinel kind of this layer
    pub fn error_kind(&self) -> RouteErrorKind {
        self.kind
    }

    /// Check a sentinel kind against this error and every wrapped layer
    pub fn is(&self, kind: RouteErrorKind) -> bool {
        if self.kind == kind {
            return true;
        }
        match kind {
            RouteErrorKind::InvalidParameter => !self.parameters.is_empty(),
            RouteErrorKind::InvalidConstraint => self
                .parameters
                .iter()
                .any(|p| !p.constraint_errors().is_empty()),
            RouteErrorKind::InvalidTemplate => false,
        }
    }

    /// Delegates to the first wrapped parameter error; a bare template error
    /// is the server's fault
    pub fn fault_source(&self) -> FaultSource {
        match self.parameters.first() {
            Some(p) => p.fault_source(),
            None => FaultSource::Server,
        }
    }

    /// JSON payload for transport layers
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.kind,
                "message": self.detail,
                "endpoint": self.endpoint,
                "source": self.source_text,
                "fault": self.fault_source(),
                "example": self.example,
                "suggestion": self.suggestion,
                "parameters": self.parameters,
            }
        })
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template `{}`: {}", self.endpoint, self.detail)
    }
}

impl StdError for TemplateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.parameters.first().map(|p| p as &(dyn StdError + 'static))
    }
}

/// Error returned by `Router::match_request`
#[derive(Error, Debug)]
pub enum MatchError {
    /// No route's method and path pattern applied to the request
    #[error("no route matched {method} {path}")]
    NoRoute { method: String, path: String },
    /// A route's path matched but one or more parameters failed validation
    #[error("{0}")]
    Validation(#[source] Box<TemplateError>),
}

impl MatchError {
    /// The wrapped template error, when validation failed
    pub fn template_error(&self) -> Option<&TemplateError> {
        match self {
            MatchError::Validation(e) => Some(e),
            MatchError::NoRoute { .. } => None,
        }
    }

    /// Both variants describe requests the engine could not serve
    pub fn fault_source(&self) -> FaultSource {
        match self {
            MatchError::NoRoute { .. } => FaultSource::Client,
            MatchError::Validation(e) => e.fault_source(),
        }
    }
}

/// Search the cause chain for a layer of type `T`, regardless of depth
pub fn find_cause<'a, T: StdError + 'static>(
    err: &'a (dyn StdError + 'static),
) -> Option<&'a T> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(found) = e.downcast_ref::<T>() {
            return Some(found);
        }
        current = e.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_violation() -> ConstraintError {
        ConstraintError::new(
            ConstraintKind::Range,
            "range[1..100]",
            "500",
            "value 500 is outside the allowed range of 1..100",
        )
    }

    #[test]
    fn test_sentinel_matching_through_wrapping() {
        let constraint = range_violation();
        let parameter = ParameterError::new(
            "limit",
            "integer",
            "500",
            ParamLocation::Query,
            "placeholder",
        )
        .with_constraints(vec![constraint]);
        let template = TemplateError::validation(
            "/products?{limit:int:range[1..100]}",
            "limit=500",
            None,
            None,
            vec![parameter],
        );

        assert!(template.is(RouteErrorKind::InvalidTemplate));
        assert!(template.is(RouteErrorKind::InvalidParameter));
        assert!(template.is(RouteErrorKind::InvalidConstraint));
    }

    #[test]
    fn test_cause_chain_retrieval() {
        let parameter = ParameterError::new(
            "limit",
            "integer",
            "500",
            ParamLocation::Query,
            "placeholder",
        )
        .with_constraints(vec![range_violation()]);
        let template = TemplateError::validation("/x", "limit=500", None, None, vec![parameter]);

        let found: &ParameterError = find_cause(&template).unwrap();
        assert_eq!(found.parameter, "limit");

        let found: &ConstraintError = find_cause(&template).unwrap();
        assert_eq!(found.kind, ConstraintKind::Range);
        assert_eq!(found.received, "500");
    }

    #[test]
    fn test_joined_errors_keep_every_layer() {
        let first = ParameterError::new("id", "integer", "abc", ParamLocation::Path, "bad id")
            .with_type_mismatch("value `abc` is not an integer");
        let second = ParameterError::new(
            "limit",
            "integer",
            "500",
            ParamLocation::Query,
            "placeholder",
        )
        .with_constraints(vec![range_violation()]);
        let template =
            TemplateError::validation("/x", "/users/abc", None, None, vec![first, second]);

        assert_eq!(template.parameter_errors().len(), 2);
        assert_eq!(template.parameter_errors()[0].parameter, "id");
        assert_eq!(template.parameter_errors()[1].parameter, "limit");
        assert_eq!(
            template.parameter_errors()[1].constraint_errors()[0].rule,
            "range[1..100]"
        );
    }

    #[test]
    fn test_fault_source_delegation() {
        let syntactic = TemplateError::syntax("/bad{", "unmatched `{`");
        assert_eq!(syntactic.fault_source(), FaultSource::Server);

        let parameter =
            ParameterError::new("id", "integer", "abc", ParamLocation::Path, "bad id");
        let wrapped = TemplateError::from_parameter("/users/{id:int}", "{id:int}", parameter);
        assert_eq!(wrapped.fault_source(), FaultSource::Client);
    }

    #[test]
    fn test_constraint_detail_promotes_to_parameter_detail() {
        let parameter = ParameterError::new(
            "limit",
            "integer",
            "500",
            ParamLocation::Query,
            "placeholder",
        )
        .with_constraints(vec![range_violation()]);
        assert_eq!(
            parameter.detail,
            "value 500 is outside the allowed range of 1..100"
        );
        assert_eq!(parameter.constraint_kind, Some(ConstraintKind::Range));
    }

    #[test]
    fn test_type_mismatch_wins_detail_tiebreak() {
        let parameter = ParameterError::new(
            "when",
            "date",
            "not-a-date",
            ParamLocation::Path,
            "placeholder",
        )
        .with_type_mismatch("value `not-a-date` is not a date")
        .with_constraints(vec![ConstraintError::new(
            ConstraintKind::Format,
            "format[dateonly]",
            "not-a-date",
            "value `not-a-date` does not match format dateonly",
        )]);
        assert_eq!(parameter.detail, "value `not-a-date` is not a date");
        assert!(parameter.type_mismatch);
        assert_eq!(parameter.constraint_kind, Some(ConstraintKind::Format));
    }

    #[test]
    fn test_to_json_payload_shape() {
        let parameter = ParameterError::new(
            "limit",
            "integer",
            "500",
            ParamLocation::Query,
            "placeholder",
        )
        .with_constraints(vec![range_violation()]);
        let template = TemplateError::validation(
            "/products?{limit:int:range[1..100]}",
            "limit=500",
            Some("/GET /products?limit=123".to_string()),
            None,
            vec![parameter],
        );

        let json = template.to_json();
        assert_eq!(json["error"]["fault"], "client");
        assert_eq!(json["error"]["example"], "/GET /products?limit=123");
        assert_eq!(json["error"]["parameters"][0]["parameter"], "limit");
    }

    #[test]
    fn test_no_route_error_display() {
        let err = MatchError::NoRoute {
            method: "GET".to_string(),
            path: "/missing".to_string(),
        };
        assert_eq!(err.to_string(), "no route matched GET /missing");
        assert_eq!(err.fault_source(), FaultSource::Client);
    }
}
