//! `notempty` constraints.

use super::registry::ConstraintCtx;
use super::{Constraint, ConstraintKind};
use crate::errors::ConstraintError;

/// Rejects the empty string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotEmptyConstraint;

pub(crate) fn parse(
    payload: Option<&str>,
    _ctx: &ConstraintCtx,
) -> Result<Constraint, ConstraintError> {
    if let Some(payload) = payload {
        return Err(ConstraintError::new(
            ConstraintKind::NotEmpty,
            "notempty",
            payload,
            "notempty does not take a payload",
        ));
    }
    Ok(Constraint::NotEmpty(NotEmptyConstraint))
}

impl NotEmptyConstraint {
    /// The textual rule
    pub fn rule(&self) -> String {
        "notempty".to_string()
    }

    /// Check that the value is not the empty string
    pub fn validate(&self, value: &str) -> Result<(), ConstraintError> {
        if !value.is_empty() {
            return Ok(());
        }
        Err(ConstraintError::new(
            ConstraintKind::NotEmpty,
            self.rule(),
            value,
            "value must not be empty",
        ))
    }
}
