//! `range[min..max]` constraints for numeric and date parameters.

use super::registry::ConstraintCtx;
use super::{Constraint, ConstraintKind};
use crate::datatype::DataType;
use crate::errors::ConstraintError;
use chrono::NaiveDate;

/// Inclusive bounds check, parsed into the domain of the owning data type
#[derive(Debug, Clone, PartialEq)]
pub enum RangeConstraint {
    /// Signed 64-bit bounds for `integer`
    Int { min: i64, max: i64 },
    /// 64-bit float bounds for `real` and `decimal`
    Float { min: f64, max: f64 },
    /// Calendar-date bounds for `date`
    Date { min: NaiveDate, max: NaiveDate },
}

pub(crate) fn parse(
    payload: Option<&str>,
    ctx: &ConstraintCtx,
) -> Result<Constraint, ConstraintError> {
    let payload = payload.ok_or_else(|| {
        parse_error("", "range constraint requires a `[min..max]` payload")
    })?;
    let (min_text, max_text) = split_bounds(payload)
        .ok_or_else(|| parse_error(payload, "range payload must be `min..max`"))?;

    let range = match ctx.data_type {
        DataType::Integer => {
            let min = parse_i64(min_text, payload)?;
            let max = parse_i64(max_text, payload)?;
            if min > max {
                return Err(parse_error(payload, "range minimum exceeds maximum"));
            }
            RangeConstraint::Int { min, max }
        }
        DataType::Real | DataType::Decimal => {
            let min = parse_f64(min_text, payload)?;
            let max = parse_f64(max_text, payload)?;
            if min > max {
                return Err(parse_error(payload, "range minimum exceeds maximum"));
            }
            RangeConstraint::Float { min, max }
        }
        DataType::Date => {
            let min = parse_date(min_text, payload)?;
            let max = parse_date(max_text, payload)?;
            if min > max {
                return Err(parse_error(payload, "range minimum exceeds maximum"));
            }
            RangeConstraint::Date { min, max }
        }
        other => {
            return Err(parse_error(
                payload,
                format!("range does not apply to {} values", other),
            ))
        }
    };
    Ok(Constraint::Range(range))
}

impl RangeConstraint {
    /// The textual rule, e.g. `range[1..100]`
    pub fn rule(&self) -> String {
        match self {
            RangeConstraint::Int { min, max } => format!("range[{}..{}]", min, max),
            RangeConstraint::Float { min, max } => format!("range[{}..{}]", min, max),
            RangeConstraint::Date { min, max } => format!("range[{}..{}]", min, max),
        }
    }

    /// Check that the value parses in the same domain and falls inside the
    /// inclusive bounds
    pub fn validate(&self, value: &str) -> Result<(), ConstraintError> {
        match self {
            RangeConstraint::Int { min, max } => match value.parse::<i64>() {
                Ok(n) if (*min..=*max).contains(&n) => Ok(()),
                Ok(n) => Err(self.violation(value, n)),
                Err(_) => Err(self.unparseable(value)),
            },
            RangeConstraint::Float { min, max } => match value.parse::<f64>() {
                Ok(n) if n >= *min && n <= *max => Ok(()),
                Ok(n) => Err(self.violation(value, n)),
                Err(_) => Err(self.unparseable(value)),
            },
            RangeConstraint::Date { min, max } => {
                let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"));
                match parsed {
                    Ok(d) if d >= *min && d <= *max => Ok(()),
                    Ok(d) => Err(self.violation(value, d)),
                    Err(_) => Err(self.unparseable(value)),
                }
            }
        }
    }

    fn bounds_text(&self) -> String {
        match self {
            RangeConstraint::Int { min, max } => format!("{}..{}", min, max),
            RangeConstraint::Float { min, max } => format!("{}..{}", min, max),
            RangeConstraint::Date { min, max } => format!("{}..{}", min, max),
        }
    }

    fn violation(&self, value: &str, parsed: impl std::fmt::Display) -> ConstraintError {
        ConstraintError::new(
            ConstraintKind::Range,
            self.rule(),
            value,
            format!(
                "value {} is outside the allowed range of {}",
                parsed,
                self.bounds_text()
            ),
        )
    }

    fn unparseable(&self, value: &str) -> ConstraintError {
        ConstraintError::new(
            ConstraintKind::Range,
            self.rule(),
            value,
            format!(
                "value `{}` cannot be compared against the range {}",
                value,
                self.bounds_text()
            ),
        )
    }
}

fn split_bounds(payload: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = payload.split("..").collect();
    match parts.as_slice() {
        [min, max] => Some((min.trim(), max.trim())),
        _ => None,
    }
}

fn parse_i64(text: &str, payload: &str) -> Result<i64, ConstraintError> {
    text.parse::<i64>().map_err(|_| {
        parse_error(payload, format!("`{}` is not a valid integer bound", text))
    })
}

fn parse_f64(text: &str, payload: &str) -> Result<f64, ConstraintError> {
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(parse_error(
            payload,
            format!("`{}` is not a valid numeric bound", text),
        )),
    }
}

fn parse_date(text: &str, payload: &str) -> Result<NaiveDate, ConstraintError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
        parse_error(payload, format!("`{}` is not a valid date bound", text))
    })
}

fn parse_error(payload: &str, detail: impl Into<String>) -> ConstraintError {
    ConstraintError::new(
        ConstraintKind::Range,
        format!("range[{}]", payload),
        payload,
        detail,
    )
}
