//! `format[spec]` constraints.
//!
//! The payload grammar depends on the data type: dates take builtin aliases or
//! a token grammar, uuids take version selectors and alternative id schemes,
//! and strings accept only the `ulid`/`ksuid`/`nanoid` identifier aliases.
//! Format constraints subsume data-type validation.

pub mod date;
pub mod id;

use super::registry::ConstraintCtx;
use super::{Constraint, ConstraintKind};
use crate::datatype::DataType;
use crate::errors::ConstraintError;
use date::DateFormat;
use id::IdFormat;

/// A parsed format constraint
#[derive(Debug, Clone, PartialEq)]
pub struct FormatConstraint {
    spec: String,
    body: FormatBody,
}

#[derive(Debug, Clone, PartialEq)]
enum FormatBody {
    Date(DateFormat),
    Id(IdFormat),
}

pub(crate) fn parse(
    payload: Option<&str>,
    ctx: &ConstraintCtx,
) -> Result<Constraint, ConstraintError> {
    let payload = payload
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| parse_error("", "format constraint requires a `[spec]` payload"))?;

    let body = match ctx.data_type {
        DataType::Date => DateFormat::parse(payload, ctx.multi_segment)
            .map(FormatBody::Date)
            .map_err(|detail| parse_error(payload, detail))?,
        DataType::Uuid => IdFormat::parse_uuid_spec(payload)
            .map(FormatBody::Id)
            .map_err(|detail| parse_error(payload, detail))?,
        DataType::String => IdFormat::parse_string_alias(payload)
            .map(FormatBody::Id)
            .map_err(|detail| parse_error(payload, detail))?,
        other => {
            return Err(parse_error(
                payload,
                format!("format does not apply to {} values", other),
            ))
        }
    };
    Ok(Constraint::Format(FormatConstraint {
        spec: payload.to_string(),
        body,
    }))
}

impl FormatConstraint {
    /// The textual rule, e.g. `format[yyyy/mm/dd]`
    pub fn rule(&self) -> String {
        format!("format[{}]", self.spec)
    }

    /// Check the value against the parsed format
    pub fn validate(&self, value: &str) -> Result<(), ConstraintError> {
        let result = match &self.body {
            FormatBody::Date(f) => f.validate(value),
            FormatBody::Id(f) => f.validate(value),
        };
        result.map_err(|detail| {
            ConstraintError::new(ConstraintKind::Format, self.rule(), value, detail)
        })
    }

    /// A value matching the requested format
    pub fn example(&self, _error: &ConstraintError) -> Option<String> {
        Some(match &self.body {
            FormatBody::Date(f) => f.example(),
            FormatBody::Id(f) => f.example(),
        })
    }
}

fn parse_error(payload: &str, detail: impl Into<String>) -> ConstraintError {
    ConstraintError::new(
        ConstraintKind::Format,
        format!("format[{}]", payload),
        payload,
        detail,
    )
}
