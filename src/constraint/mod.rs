//! Constraints on parameter values.
//!
//! A constraint is selected by kind (`range`, `length`, `enum`, `regex`,
//! `notempty`, `format`) and parameterized by a bracketed payload. Which kinds
//! apply to which data types is decided by the constraint registry; parsing a
//! list that names an unsupported combination fails at template-compile time.

pub mod choice;
pub mod format;
pub mod length;
pub mod not_empty;
pub mod pattern;
pub mod range;
pub mod registry;

pub use choice::EnumConstraint;
pub use format::FormatConstraint;
pub use length::LengthConstraint;
pub use not_empty::NotEmptyConstraint;
pub use pattern::RegexConstraint;
pub use range::RangeConstraint;

use crate::datatype::DataType;
use crate::errors::ConstraintError;
use registry::ConstraintCtx;
use serde::Serialize;
use std::fmt;

/// The constraint kinds a parameter spec can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Range,
    Length,
    Enum,
    Regex,
    NotEmpty,
    Format,
}

impl ConstraintKind {
    /// Canonical lowercase slug
    pub fn slug(&self) -> &'static str {
        match self {
            ConstraintKind::Range => "range",
            ConstraintKind::Length => "length",
            ConstraintKind::Enum => "enum",
            ConstraintKind::Regex => "regex",
            ConstraintKind::NotEmpty => "notempty",
            ConstraintKind::Format => "format",
        }
    }

    pub(crate) fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "range" => Some(ConstraintKind::Range),
            "length" => Some(ConstraintKind::Length),
            "enum" => Some(ConstraintKind::Enum),
            "regex" => Some(ConstraintKind::Regex),
            "notempty" => Some(ConstraintKind::NotEmpty),
            "format" => Some(ConstraintKind::Format),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A parsed constraint, ready to validate values
#[derive(Debug, Clone)]
pub enum Constraint {
    Range(RangeConstraint),
    Length(LengthConstraint),
    Enum(EnumConstraint),
    Regex(RegexConstraint),
    NotEmpty(NotEmptyConstraint),
    Format(FormatConstraint),
}

impl Constraint {
    /// The kind this constraint was declared with
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Range(_) => ConstraintKind::Range,
            Constraint::Length(_) => ConstraintKind::Length,
            Constraint::Enum(_) => ConstraintKind::Enum,
            Constraint::Regex(_) => ConstraintKind::Regex,
            Constraint::NotEmpty(_) => ConstraintKind::NotEmpty,
            Constraint::Format(_) => ConstraintKind::Format,
        }
    }

    /// The textual rule, e.g. `range[1..100]`
    pub fn rule(&self) -> String {
        match self {
            Constraint::Range(c) => c.rule(),
            Constraint::Length(c) => c.rule(),
            Constraint::Enum(c) => c.rule(),
            Constraint::Regex(c) => c.rule(),
            Constraint::NotEmpty(c) => c.rule(),
            Constraint::Format(c) => c.rule(),
        }
    }

    /// Validate a raw value
    pub fn validate(&self, value: &str) -> Result<(), ConstraintError> {
        match self {
            Constraint::Range(c) => c.validate(value),
            Constraint::Length(c) => c.validate(value),
            Constraint::Enum(c) => c.validate(value),
            Constraint::Regex(c) => c.validate(value),
            Constraint::NotEmpty(c) => c.validate(value),
            Constraint::Format(c) => c.validate(value),
        }
    }

    /// An example value that would satisfy this constraint, when the
    /// constraint can offer one for the given failure
    pub fn example(&self, error: &ConstraintError) -> Option<String> {
        match self {
            Constraint::Enum(c) => c.example(error),
            Constraint::Format(c) => c.example(error),
            _ => None,
        }
    }

    /// Whether this constraint subsumes data-type validation.
    ///
    /// Format constraints fully decide what a valid value looks like, so the
    /// validation engine skips the data-type pre-check when one is present.
    pub fn validates_type(&self) -> bool {
        matches!(self, Constraint::Format(_))
    }
}

/// Failure while parsing a constraint list
#[derive(Debug, Clone)]
pub(crate) enum ConstraintParseError {
    /// The list itself is malformed (unknown kind, stray text, empty entry)
    Syntax(String),
    /// A named constraint rejected its payload or data type
    Constraint(ConstraintError),
}

impl ConstraintParseError {
    pub(crate) fn detail(&self) -> &str {
        match self {
            ConstraintParseError::Syntax(detail) => detail,
            ConstraintParseError::Constraint(error) => &error.detail,
        }
    }

    pub(crate) fn into_constraint_error(self) -> Option<ConstraintError> {
        match self {
            ConstraintParseError::Syntax(_) => None,
            ConstraintParseError::Constraint(error) => Some(error),
        }
    }
}

/// Parse a comma-separated constraint list for a parameter of the given type.
///
/// `regex[…]` bodies may contain `[`, `]` and `,`; the closing bracket is
/// resolved by scanning candidate `]` positions from the right and accepting
/// the first whose suffix is empty or itself a parseable `,`-led list.
pub(crate) fn parse_list(
    text: &str,
    data_type: DataType,
    multi_segment: bool,
) -> Result<Vec<Constraint>, ConstraintParseError> {
    let ctx = ConstraintCtx {
        data_type,
        multi_segment,
    };
    let mut constraints = Vec::new();
    parse_into(text, &ctx, &mut constraints)?;
    Ok(constraints)
}

fn parse_into(
    text: &str,
    ctx: &ConstraintCtx,
    out: &mut Vec<Constraint>,
) -> Result<(), ConstraintParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ConstraintParseError::Syntax(
            "empty constraint in constraint list".to_string(),
        ));
    }

    let bracket = text.find('[');
    let comma = text.find(',');
    let kind_end = match (bracket, comma) {
        (Some(b), Some(c)) => b.min(c),
        (Some(b), None) => b,
        (None, Some(c)) => c,
        (None, None) => text.len(),
    };
    let kind_text = text[..kind_end].trim();
    let kind = ConstraintKind::from_slug(kind_text).ok_or_else(|| {
        ConstraintParseError::Syntax(format!("unknown constraint kind `{}`", kind_text))
    })?;
    let parse_fn = registry::lookup(ctx.data_type, kind).ok_or_else(|| {
        ConstraintParseError::Constraint(ConstraintError::new(
            kind,
            kind.slug(),
            text,
            format!(
                "constraint `{}` is not supported for {} {} parameter",
                kind,
                ctx.data_type.indefinite_article(),
                ctx.data_type
            ),
        ))
    })?;

    let has_payload = match (bracket, comma) {
        (Some(b), Some(c)) => b < c,
        (Some(_), None) => true,
        (None, _) => false,
    };

    // Constraint without payload: bare kind, then end of list or a comma
    if !has_payload {
        out.push(parse_fn(None, ctx).map_err(ConstraintParseError::Constraint)?);
        let rest = text[kind_end..].trim_start();
        return match rest.strip_prefix(',') {
            Some(tail) => parse_into(tail, ctx, out),
            None if rest.is_empty() => Ok(()),
            None => Err(ConstraintParseError::Syntax(format!(
                "unexpected text after `{}` constraint",
                kind
            ))),
        };
    }

    // kind_end sits on the `[` when a payload is present
    let remainder = &text[kind_end + 1..];

    if kind == ConstraintKind::Regex {
        return parse_regex_tail(remainder, ctx, parse_fn, out);
    }

    let close = remainder.find(']').ok_or_else(|| {
        ConstraintParseError::Syntax(format!("missing `]` in `{}` constraint", kind))
    })?;
    let payload = &remainder[..close];
    out.push(parse_fn(Some(payload), ctx).map_err(ConstraintParseError::Constraint)?);

    let rest = remainder[close + 1..].trim_start();
    match rest.strip_prefix(',') {
        Some(tail) => parse_into(tail, ctx, out),
        None if rest.is_empty() => Ok(()),
        None => Err(ConstraintParseError::Syntax(format!(
            "unexpected text after `{}` constraint",
            kind
        ))),
    }
}

/// Resolve the closing bracket of a `regex[` body: candidates are tried from
/// the rightmost `]` down, keeping the first split whose suffix is empty or a
/// parseable continuation
fn parse_regex_tail(
    remainder: &str,
    ctx: &ConstraintCtx,
    parse_fn: registry::ParseFn,
    out: &mut Vec<Constraint>,
) -> Result<(), ConstraintParseError> {
    let closes: Vec<usize> = remainder
        .char_indices()
        .filter(|(_, c)| *c == ']')
        .map(|(i, _)| i)
        .collect();
    if closes.is_empty() {
        return Err(ConstraintParseError::Syntax(
            "missing `]` in `regex` constraint".to_string(),
        ));
    }

    let mut first_failure: Option<ConstraintParseError> = None;
    for &close in closes.iter().rev() {
        let body = &remainder[..close];
        let suffix = remainder[close + 1..].trim_start();
        let continuation = match suffix.strip_prefix(',') {
            Some(tail) => Some(tail),
            None if suffix.is_empty() => None,
            None => continue,
        };
        let parsed = match parse_fn(Some(body), ctx) {
            Ok(c) => c,
            Err(e) => {
                first_failure.get_or_insert(ConstraintParseError::Constraint(e));
                continue;
            }
        };
        match continuation {
            None => {
                out.push(parsed);
                return Ok(());
            }
            Some(tail) => {
                let mut rest_constraints = Vec::new();
                match parse_into(tail, ctx, &mut rest_constraints) {
                    Ok(()) => {
                        out.push(parsed);
                        out.append(&mut rest_constraints);
                        return Ok(());
                    }
                    Err(e) => {
                        first_failure.get_or_insert(e);
                        continue;
                    }
                }
            }
        }
    }
    Err(first_failure.unwrap_or_else(|| {
        ConstraintParseError::Syntax("invalid `regex` constraint".to_string())
    }))
}
