//! Request matching.
//!
//! Routes are tried in declaration order. The first route whose method
//! applies and whose anchored path pattern matches is authoritative: its
//! parameters are validated, every failure is collected, and a single error
//! bundle with one suggestion URL is returned. Later routes are never
//! consulted once a path has matched.

use super::{MatchResult, Route, Router};
use crate::decompose::decompose;
use crate::errors::{MatchError, ParameterError, TemplateError};
use crate::example;
use crate::query::QueryValues;
use crate::template::ParamLocation;
use crate::validate::validate_parameter;
use crate::values::ValueMap;

impl Router {
    /// Match a `(method, path, query)` triple against the registered routes.
    ///
    /// Safe for concurrent use: a fresh values map is allocated per call and
    /// no shared state is written.
    pub fn match_request(
        &self,
        method: &str,
        path: &str,
        query: &str,
    ) -> Result<MatchResult<'_>, MatchError> {
        let method = method.trim().to_ascii_uppercase();
        let path = normalize_path(path);

        for route in self.routes() {
            if !route.method().is_empty() && route.method() != method {
                continue;
            }
            let captures = match route.template().pattern().captures(&path) {
                Some(captures) => captures,
                None => continue,
            };
            tracing::trace!(
                method = %method,
                path = %path,
                index = route.index(),
                template = route.template().original(),
                "path matched"
            );
            return evaluate(route, &method, &path, query, captures);
        }
        Err(MatchError::NoRoute { method, path })
    }
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Validate every parameter of the authoritative route and assemble either
/// the ordered values map or the joined error bundle
fn evaluate<'r>(
    route: &'r Route,
    method: &str,
    path: &str,
    query: &str,
    captures: regex::Captures<'_>,
) -> Result<MatchResult<'r>, MatchError> {
    let template = route.template();
    let mut values = ValueMap::new();
    let mut errors: Vec<ParameterError> = Vec::new();

    for parameter in template.params().path_params() {
        let raw = captures
            .get(parameter.position() + 1)
            .map(|m| m.as_str())
            .unwrap_or("");
        if let Err(error) = validate_parameter(parameter, raw) {
            errors.push(error);
        }
        values.insert(parameter.name(), raw);
        if parameter.is_multi_segment() {
            decompose(&mut values, parameter.name(), raw, parameter.data_type());
        }
    }

    let parsed_query = QueryValues::parse(query);
    if parsed_query.had_invalid_separator() {
        tracing::warn!(query = query, "semicolon separator in query string");
    }

    // Declared parameters the user actually supplied, in request order; this
    // drives the suggestion URL's query ordering
    let supplied: Vec<(String, String)> = parsed_query
        .keys()
        .filter(|key| {
            template
                .params()
                .get(key)
                .map(|p| p.location() == ParamLocation::Query)
                .unwrap_or(false)
        })
        .map(|key| {
            (
                key.to_string(),
                parsed_query.first(key).unwrap_or("").to_string(),
            )
        })
        .collect();

    for parameter in template.params().query_params() {
        let supplied_value = parsed_query.first(parameter.name());
        // an optional parameter supplied as the empty string counts as absent
        let absent = match supplied_value {
            None => true,
            Some(value) => value.is_empty() && parameter.is_optional(),
        };
        if !absent {
            let value = supplied_value.unwrap_or("");
            if let Err(error) = validate_parameter(parameter, value) {
                errors.push(error);
            }
            values.insert(parameter.name(), value);
        } else if !parameter.is_optional() {
            errors.push(ParameterError::missing(
                parameter.name(),
                parameter.data_type().slug(),
                parameter.location(),
            ));
        } else if let Some(default) = parameter.default_value() {
            // validated when the template was parsed
            values.insert(parameter.name(), default);
        } else if let Some(implicit) = parameter.classifier().implicit_default() {
            values.insert(parameter.name(), implicit);
        }
    }

    if let Some(problem) = errors.first() {
        let effective_method = if route.method().is_empty() {
            method
        } else {
            route.method()
        };
        let (example, suggestion) =
            example::build_suggestion(effective_method, template, problem, &supplied);
        let source_text = match problem.location {
            ParamLocation::Path => path.to_string(),
            ParamLocation::Query => query.to_string(),
        };
        return Err(MatchError::Validation(Box::new(TemplateError::validation(
            template.original(),
            source_text,
            Some(example),
            Some(suggestion),
            errors,
        ))));
    }

    Ok(MatchResult::new(route.index(), route, values))
}
