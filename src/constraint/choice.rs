//! `enum[v1,v2,…]` membership constraints.

use super::registry::ConstraintCtx;
use super::{Constraint, ConstraintKind};
use crate::errors::ConstraintError;

/// Case-sensitive membership in a fixed set of values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstraint {
    members: Vec<String>,
}

pub(crate) fn parse(
    payload: Option<&str>,
    _ctx: &ConstraintCtx,
) -> Result<Constraint, ConstraintError> {
    let payload = payload.ok_or_else(|| {
        parse_error("", "enum constraint requires a `[v1,v2,…]` payload")
    })?;
    let members: Vec<String> = payload
        .split(',')
        .map(|m| m.trim().to_string())
        .collect();
    if members.is_empty() || members.iter().all(|m| m.is_empty()) {
        return Err(parse_error(payload, "enum requires at least one member"));
    }
    if members.iter().any(|m| m.is_empty()) {
        return Err(parse_error(payload, "enum members must not be empty"));
    }
    Ok(Constraint::Enum(EnumConstraint { members }))
}

impl EnumConstraint {
    /// The textual rule, e.g. `enum[a,b,c]`
    pub fn rule(&self) -> String {
        format!("enum[{}]", self.members.join(","))
    }

    /// The declared members, in declaration order
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Check that the value equals one of the members
    pub fn validate(&self, value: &str) -> Result<(), ConstraintError> {
        if self.members.iter().any(|m| m == value) {
            return Ok(());
        }
        Err(ConstraintError::new(
            ConstraintKind::Enum,
            self.rule(),
            value,
            format!(
                "value `{}` is not one of {}",
                value,
                self.members.join(", ")
            ),
        ))
    }

    /// The first member doubles as the example value
    pub fn example(&self, _error: &ConstraintError) -> Option<String> {
        self.members.first().cloned()
    }
}

fn parse_error(payload: &str, detail: impl Into<String>) -> ConstraintError {
    ConstraintError::new(
        ConstraintKind::Enum,
        format!("enum[{}]", payload),
        payload,
        detail,
    )
}
