//! `regex[pattern]` constraints.
//!
//! Patterns are compiled as `^(?:pattern)$` so a match always covers the full
//! value; authors must not supply their own anchors.

use super::registry::ConstraintCtx;
use super::{Constraint, ConstraintKind};
use crate::errors::ConstraintError;
use regex::Regex;

/// Full-value match against an author-supplied pattern
#[derive(Debug, Clone)]
pub struct RegexConstraint {
    pattern: String,
    compiled: Regex,
}

pub(crate) fn parse(
    payload: Option<&str>,
    _ctx: &ConstraintCtx,
) -> Result<Constraint, ConstraintError> {
    let payload = payload.ok_or_else(|| {
        parse_error("", "regex constraint requires a `[pattern]` payload")
    })?;
    if payload.is_empty() {
        return Err(parse_error(payload, "regex pattern must not be empty"));
    }
    if payload.starts_with('^') || payload.ends_with('$') {
        return Err(parse_error(
            payload,
            "regex pattern must not carry `^`/`$` anchors; the full value is matched automatically",
        ));
    }
    let compiled = Regex::new(&format!("^(?:{})$", payload))
        .map_err(|e| parse_error(payload, format!("invalid regex pattern: {}", e)))?;
    Ok(Constraint::Regex(RegexConstraint {
        pattern: payload.to_string(),
        compiled,
    }))
}

impl RegexConstraint {
    /// The textual rule, e.g. `regex[[0-9]+]`
    pub fn rule(&self) -> String {
        format!("regex[{}]", self.pattern)
    }

    /// The pattern as the author wrote it, without the added anchors
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check that the pattern matches the entire value
    pub fn validate(&self, value: &str) -> Result<(), ConstraintError> {
        if self.compiled.is_match(value) {
            return Ok(());
        }
        Err(ConstraintError::new(
            ConstraintKind::Regex,
            self.rule(),
            value,
            format!("value `{}` does not match pattern `{}`", value, self.pattern),
        ))
    }
}

impl PartialEq for RegexConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

fn parse_error(payload: &str, detail: impl Into<String>) -> ConstraintError {
    ConstraintError::new(
        ConstraintKind::Regex,
        format!("regex[{}]", payload),
        payload,
        detail,
    )
}
