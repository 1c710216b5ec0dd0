//! `length[min..max]` constraints.

use super::registry::ConstraintCtx;
use super::{Constraint, ConstraintKind};
use crate::errors::ConstraintError;

/// Inclusive byte-length bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthConstraint {
    min: usize,
    max: usize,
}

pub(crate) fn parse(
    payload: Option<&str>,
    _ctx: &ConstraintCtx,
) -> Result<Constraint, ConstraintError> {
    let payload = payload.ok_or_else(|| {
        parse_error("", "length constraint requires a `[min..max]` payload")
    })?;
    let parts: Vec<&str> = payload.split("..").collect();
    let (min_text, max_text) = match parts.as_slice() {
        [min, max] => (min.trim(), max.trim()),
        _ => return Err(parse_error(payload, "length payload must be `min..max`")),
    };

    let min = parse_bound(min_text, payload)?;
    let max = parse_bound(max_text, payload)?;
    if min > max {
        return Err(parse_error(payload, "length minimum exceeds maximum"));
    }
    Ok(Constraint::Length(LengthConstraint {
        min: min as usize,
        max: max as usize,
    }))
}

fn parse_bound(text: &str, payload: &str) -> Result<i64, ConstraintError> {
    let bound: i64 = text.parse().map_err(|_| {
        parse_error(payload, format!("`{}` is not a valid length bound", text))
    })?;
    if bound < 0 {
        return Err(parse_error(payload, "length bounds must not be negative"));
    }
    Ok(bound)
}

impl LengthConstraint {
    /// The textual rule, e.g. `length[5..50]`
    pub fn rule(&self) -> String {
        format!("length[{}..{}]", self.min, self.max)
    }

    /// Check the value's byte length against the inclusive bounds
    pub fn validate(&self, value: &str) -> Result<(), ConstraintError> {
        let length = value.len();
        if (self.min..=self.max).contains(&length) {
            return Ok(());
        }
        Err(ConstraintError::new(
            ConstraintKind::Length,
            self.rule(),
            value,
            format!(
                "value must be between {} and {} characters long (got {})",
                self.min, self.max, length
            ),
        ))
    }
}

fn parse_error(payload: &str, detail: impl Into<String>) -> ConstraintError {
    ConstraintError::new(
        ConstraintKind::Length,
        format!("length[{}]", payload),
        payload,
        detail,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;

    fn ctx() -> ConstraintCtx {
        ConstraintCtx {
            data_type: DataType::String,
            multi_segment: false,
        }
    }

    #[test]
    fn test_length_bounds() {
        let c = parse(Some("5..50"), &ctx()).unwrap();
        assert!(c.validate("hello").is_ok());
        assert!(c.validate("hi").is_err());
        assert!(c.validate(&"x".repeat(50)).is_ok());
        assert!(c.validate(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_zero_minimum_accepts_empty() {
        let c = parse(Some("0..3"), &ctx()).unwrap();
        assert!(c.validate("").is_ok());
    }

    #[test]
    fn test_negative_bound_rejected() {
        let err = parse(Some("-1..5"), &ctx()).unwrap_err();
        assert!(err.detail.contains("negative"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(parse(Some("10..5"), &ctx()).is_err());
    }

    #[test]
    fn test_rule_text() {
        let c = parse(Some("5..50"), &ctx()).unwrap();
        assert_eq!(c.rule(), "length[5..50]");
    }
}
