//! Data types for route parameters.
//!
//! Every parameter carries a data type such as `integer` or `uuid`. A type
//! knows how to validate a raw string, produce an example value for suggestion
//! URLs, and report whether an optional parameter without an explicit default
//! resolves to an implicit one.

pub mod registry;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub use registry::lookup;

/// Error produced when a value does not belong to a parameter's data type
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{detail}")]
pub struct TypeError {
    /// The data type the value was checked against
    pub expected: DataType,
    /// The offending value
    pub received: String,
    /// Human-readable description of the mismatch
    pub detail: String,
}

impl TypeError {
    fn new(expected: DataType, received: &str) -> Self {
        Self {
            expected,
            received: received.to_string(),
            detail: format!(
                "value `{}` is not {} {}",
                received,
                expected.indefinite_article(),
                expected.slug()
            ),
        }
    }
}

/// The data types a route parameter can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Integer,
    Real,
    Decimal,
    Identifier,
    Date,
    Uuid,
    Alphanumeric,
    Slug,
    Boolean,
    Email,
}

static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").expect("decimal pattern"));

static REAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("real pattern")
});

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern"));

static UUID_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid shape pattern")
});

// ASCII-only with TLD requirement, no leading/trailing separator in either part
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$",
    )
    .expect("email pattern")
});

impl DataType {
    /// Every registered data type, in registration order
    pub fn all() -> [DataType; 11] {
        [
            DataType::String,
            DataType::Integer,
            DataType::Real,
            DataType::Decimal,
            DataType::Identifier,
            DataType::Date,
            DataType::Uuid,
            DataType::Alphanumeric,
            DataType::Slug,
            DataType::Boolean,
            DataType::Email,
        ]
    }

    /// Canonical lowercase slug
    pub fn slug(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Real => "real",
            DataType::Decimal => "decimal",
            DataType::Identifier => "identifier",
            DataType::Date => "date",
            DataType::Uuid => "uuid",
            DataType::Alphanumeric => "alphanumeric",
            DataType::Slug => "slug",
            DataType::Boolean => "boolean",
            DataType::Email => "email",
        }
    }

    /// Alternate slugs accepted in templates
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            DataType::Integer => &["int"],
            DataType::Boolean => &["bool"],
            DataType::Alphanumeric => &["alphanum"],
            _ => &[],
        }
    }

    /// The article to use when naming the type in a sentence
    pub fn indefinite_article(&self) -> &'static str {
        match self {
            DataType::Integer
            | DataType::Identifier
            | DataType::Alphanumeric
            | DataType::Email => "an",
            _ => "a",
        }
    }

    /// A representative valid value, used in suggestion URLs
    pub fn example_value(&self) -> &'static str {
        match self {
            DataType::String => "example",
            DataType::Integer => "123",
            DataType::Real => "12.34",
            DataType::Decimal => "99.99",
            DataType::Identifier => "example_id",
            DataType::Date => "2025-09-18",
            DataType::Uuid => "550e8400-e29b-41d4-a716-446655440000",
            DataType::Alphanumeric => "abc123",
            DataType::Slug => "example-slug",
            DataType::Boolean => "true",
            DataType::Email => "user@example.com",
        }
    }

    /// The implicit default for an optional parameter declared without one.
    ///
    /// String-derived types resolve to the empty string; types that cannot
    /// represent "no value" (numbers, dates, uuids, booleans, emails) have no
    /// implicit default and are omitted from the values map instead.
    pub fn implicit_default(&self) -> Option<&'static str> {
        match self {
            DataType::String
            | DataType::Identifier
            | DataType::Alphanumeric
            | DataType::Slug => Some(""),
            _ => None,
        }
    }

    fn validate_single(&self, value: &str) -> Result<(), TypeError> {
        let ok = match self {
            DataType::String => true,
            DataType::Integer => value.parse::<i64>().is_ok(),
            DataType::Real => {
                REAL_RE.is_match(value)
                    && value.parse::<f64>().map(|f| f.is_finite()).unwrap_or(false)
            }
            DataType::Decimal => DECIMAL_RE.is_match(value),
            DataType::Identifier => is_identifier(value),
            DataType::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            DataType::Uuid => {
                UUID_SHAPE_RE.is_match(value) && uuid::Uuid::parse_str(value).is_ok()
            }
            DataType::Alphanumeric => {
                !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
            }
            DataType::Slug => SLUG_RE.is_match(value),
            DataType::Boolean => {
                matches!(value, "1" | "0") || {
                    let lower = value.to_ascii_lowercase();
                    lower == "true" || lower == "false"
                }
            }
            DataType::Email => !value.contains("..") && EMAIL_RE.is_match(value),
        };
        if ok {
            Ok(())
        } else {
            Err(TypeError::new(*self, value))
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Check the identifier shape: a letter or underscore, then letters, digits
/// and underscores
pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A data type instantiated for one parameter.
///
/// The classifier carries the parameter's multi-segment flag: a multi-segment
/// date accepts the partial `yyyy[/mm[/dd]]` form instead of `yyyy-mm-dd`.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    data_type: DataType,
    multi_segment: bool,
}

impl Classifier {
    /// Instantiate a classifier for one parameter
    pub fn new(data_type: DataType, multi_segment: bool) -> Self {
        Self {
            data_type,
            multi_segment,
        }
    }

    /// The underlying data type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Whether the owning parameter spans multiple path segments
    pub fn is_multi_segment(&self) -> bool {
        self.multi_segment
    }

    /// Validate a raw value against the data type
    pub fn validate(&self, value: &str) -> Result<(), TypeError> {
        if self.multi_segment && self.data_type == DataType::Date {
            return validate_partial_date(value)
                .then_some(())
                .ok_or_else(|| TypeError::new(self.data_type, value));
        }
        self.data_type.validate_single(value)
    }

    /// Example value for suggestion URLs
    pub fn example(&self) -> String {
        if self.multi_segment && self.data_type == DataType::Date {
            return "2025/09/18".to_string();
        }
        self.data_type.example_value().to_string()
    }

    /// Implicit default for an optional parameter without an explicit one
    pub fn implicit_default(&self) -> Option<&'static str> {
        self.data_type.implicit_default()
    }

    /// The article to use when naming the type in a sentence
    pub fn indefinite_article(&self) -> &'static str {
        self.data_type.indefinite_article()
    }
}

/// Accept `yyyy`, `yyyy/mm` or `yyyy/mm/dd`, rejecting impossible calendar
/// dates when all three parts are present
fn validate_partial_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.is_empty() || parts.len() > 3 {
        return false;
    }
    if parts[0].len() != 4 || !parts[0].chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let year: i32 = match parts[0].parse() {
        Ok(y) => y,
        Err(_) => return false,
    };
    let month: u32 = match parts.get(1) {
        Some(p) if !p.is_empty() && p.len() <= 2 && p.chars().all(|c| c.is_ascii_digit()) => {
            match p.parse() {
                Ok(m) if (1..=12).contains(&m) => m,
                _ => return false,
            }
        }
        Some(_) => return false,
        None => return true,
    };
    match parts.get(2) {
        Some(p) if !p.is_empty() && p.len() <= 2 && p.chars().all(|c| c.is_ascii_digit()) => {
            match p.parse::<u32>() {
                Ok(day) => NaiveDate::from_ymd_opt(year, month, day).is_some(),
                Err(_) => false,
            }
        }
        Some(_) => false,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(data_type: DataType) -> Classifier {
        Classifier::new(data_type, false)
    }

    #[test]
    fn test_integer_validation() {
        assert!(single(DataType::Integer).validate("123").is_ok());
        assert!(single(DataType::Integer).validate("-42").is_ok());
        assert!(single(DataType::Integer).validate("abc").is_err());
        assert!(single(DataType::Integer).validate("1.5").is_err());
    }

    #[test]
    fn test_real_and_decimal_validation() {
        assert!(single(DataType::Real).validate("12.34").is_ok());
        assert!(single(DataType::Real).validate("-0.5").is_ok());
        assert!(single(DataType::Real).validate("1e3").is_ok());
        assert!(single(DataType::Real).validate("inf").is_err());
        assert!(single(DataType::Real).validate("NaN").is_err());

        assert!(single(DataType::Decimal).validate("99.99").is_ok());
        assert!(single(DataType::Decimal).validate("100").is_ok());
        assert!(single(DataType::Decimal).validate("1e3").is_err());
    }

    #[test]
    fn test_identifier_validation() {
        assert!(single(DataType::Identifier).validate("_private").is_ok());
        assert!(single(DataType::Identifier).validate("user_1").is_ok());
        assert!(single(DataType::Identifier).validate("1user").is_err());
        assert!(single(DataType::Identifier).validate("").is_err());
    }

    #[test]
    fn test_date_validation() {
        assert!(single(DataType::Date).validate("2025-09-18").is_ok());
        assert!(single(DataType::Date).validate("2025-02-30").is_err());
        assert!(single(DataType::Date).validate("2025/09/18").is_err());
    }

    #[test]
    fn test_multi_segment_date_accepts_partial_forms() {
        let classifier = Classifier::new(DataType::Date, true);
        assert!(classifier.validate("2025").is_ok());
        assert!(classifier.validate("2025/09").is_ok());
        assert!(classifier.validate("2025/09/18").is_ok());
        assert!(classifier.validate("2025/02/30").is_err());
        assert!(classifier.validate("2025/13").is_err());
        assert!(classifier.validate("25/09/18").is_err());
    }

    #[test]
    fn test_uuid_validation() {
        assert!(single(DataType::Uuid)
            .validate("550e8400-e29b-41d4-a716-446655440000")
            .is_ok());
        assert!(single(DataType::Uuid).validate("not-a-uuid").is_err());
        // non-hyphenated form does not satisfy the 8-4-4-4-12 shape
        assert!(single(DataType::Uuid)
            .validate("550e8400e29b41d4a716446655440000")
            .is_err());
    }

    #[test]
    fn test_slug_validation() {
        assert!(single(DataType::Slug).validate("hello-world").is_ok());
        assert!(single(DataType::Slug).validate("a1-b2-c3").is_ok());
        assert!(single(DataType::Slug).validate("-leading").is_err());
        assert!(single(DataType::Slug).validate("trailing-").is_err());
        assert!(single(DataType::Slug).validate("double--hyphen").is_err());
        assert!(single(DataType::Slug).validate("Upper").is_err());
    }

    #[test]
    fn test_boolean_validation() {
        for ok in ["true", "false", "TRUE", "False", "1", "0"] {
            assert!(single(DataType::Boolean).validate(ok).is_ok(), "{}", ok);
        }
        assert!(single(DataType::Boolean).validate("yes").is_err());
        assert!(single(DataType::Boolean).validate("2").is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(single(DataType::Email).validate("user@example.com").is_ok());
        assert!(single(DataType::Email)
            .validate("first.last+tag@sub.example.org")
            .is_ok());
        assert!(single(DataType::Email).validate("no-at-sign").is_err());
        assert!(single(DataType::Email).validate("a..b@example.com").is_err());
        assert!(single(DataType::Email).validate("user@nodot").is_err());
    }

    #[test]
    fn test_examples_validate_against_their_own_type() {
        for data_type in DataType::all() {
            let classifier = single(data_type);
            assert!(
                classifier.validate(data_type.example_value()).is_ok(),
                "example for {} failed its own validation",
                data_type
            );
        }
    }

    #[test]
    fn test_type_error_mentions_type_and_value() {
        let err = single(DataType::Integer).validate("abc").unwrap_err();
        assert!(err.detail.contains("integer"));
        assert!(err.detail.contains("abc"));
        assert_eq!(err.expected, DataType::Integer);
    }
}
