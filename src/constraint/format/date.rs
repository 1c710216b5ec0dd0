//! Date format specs.
//!
//! Builtin aliases cover the common ISO-8601 shapes; anything else is parsed
//! with the token grammar `yyyy|yy|mm|dd|hh|ii|ss` interleaved with literal
//! characters. `ii` always means minutes; `mm` means month until an `hh` has
//! been seen, after which it means minutes. A spec whose only field token is
//! a bare `mm` is ambiguous and rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A parsed date format spec
#[derive(Debug, Clone, PartialEq)]
pub enum DateFormat {
    /// `dateonly`: `YYYY-MM-DD`
    DateOnly,
    /// `utc`: ISO-8601 with a required trailing `Z`
    Utc,
    /// `local`: ISO-8601 without a zone; `Z` is forbidden
    Local,
    /// `datetime`: ISO-8601 with an optional `Z`; a missing `Z` is read as UTC
    DateTime,
    /// Token-grammar spec such as `yyyy/mm/dd`
    Custom(CustomFormat),
}

/// A tokenized custom spec
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFormat {
    tokens: Vec<DateToken>,
    multi_segment: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateToken {
    Year4,
    Year2,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Literal(char),
}

impl DateFormat {
    /// Parse a format spec; `multi_segment` enables partial-date validation
    /// for values spanning fewer `/`-separated segments than the format
    pub(crate) fn parse(spec: &str, multi_segment: bool) -> Result<Self, String> {
        match spec.to_ascii_lowercase().as_str() {
            "dateonly" => return Ok(DateFormat::DateOnly),
            "utc" => return Ok(DateFormat::Utc),
            "local" => return Ok(DateFormat::Local),
            "datetime" => return Ok(DateFormat::DateTime),
            _ => {}
        }
        let tokens = tokenize(spec)?;
        Ok(DateFormat::Custom(CustomFormat {
            tokens,
            multi_segment,
        }))
    }

    /// Check a value against the format
    pub(crate) fn validate(&self, value: &str) -> Result<(), String> {
        match self {
            DateFormat::DateOnly => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| format!("value `{}` is not a YYYY-MM-DD date", value)),
            DateFormat::Utc => {
                if !value.ends_with('Z') {
                    return Err(format!(
                        "value `{}` must be an ISO-8601 datetime ending in `Z`",
                        value
                    ));
                }
                DateTime::parse_from_rfc3339(value)
                    .map(|_| ())
                    .map_err(|_| format!("value `{}` is not an ISO-8601 datetime", value))
            }
            DateFormat::Local => {
                if value.ends_with('Z') || value.ends_with('z') {
                    return Err(format!(
                        "value `{}` must not carry a zone designator",
                        value
                    ));
                }
                parse_naive_datetime(value)
                    .map(|_| ())
                    .map_err(|_| format!("value `{}` is not a local ISO-8601 datetime", value))
            }
            DateFormat::DateTime => {
                if value.ends_with('Z') {
                    DateTime::parse_from_rfc3339(value)
                        .map(|_| ())
                        .map_err(|_| format!("value `{}` is not an ISO-8601 datetime", value))
                } else {
                    parse_naive_datetime(value)
                        .map(|_| ())
                        .map_err(|_| format!("value `{}` is not an ISO-8601 datetime", value))
                }
            }
            DateFormat::Custom(custom) => custom.validate(value),
        }
    }

    /// A value matching the format
    pub(crate) fn example(&self) -> String {
        match self {
            DateFormat::DateOnly => "2025-09-18".to_string(),
            DateFormat::Utc | DateFormat::DateTime => "2025-09-18T12:30:00Z".to_string(),
            DateFormat::Local => "2025-09-18T12:30:00".to_string(),
            DateFormat::Custom(custom) => custom.example(),
        }
    }
}

fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
}

fn tokenize(spec: &str) -> Result<Vec<DateToken>, String> {
    let mut tokens = Vec::new();
    let mut seen_hour = false;
    let mut rest = spec;
    while !rest.is_empty() {
        let (token, width) = if rest.starts_with("yyyy") {
            (DateToken::Year4, 4)
        } else if rest.starts_with("yy") {
            (DateToken::Year2, 2)
        } else if rest.starts_with("mm") {
            (
                if seen_hour {
                    DateToken::Minute
                } else {
                    DateToken::Month
                },
                2,
            )
        } else if rest.starts_with("dd") {
            (DateToken::Day, 2)
        } else if rest.starts_with("hh") {
            seen_hour = true;
            (DateToken::Hour, 2)
        } else if rest.starts_with("ii") {
            (DateToken::Minute, 2)
        } else if rest.starts_with("ss") {
            (DateToken::Second, 2)
        } else {
            let c = match rest.chars().next() {
                Some(c) => c,
                None => break,
            };
            tokens.push(DateToken::Literal(c));
            rest = &rest[c.len_utf8()..];
            continue;
        };
        tokens.push(token);
        rest = &rest[width..];
    }

    let fields: Vec<&DateToken> = tokens
        .iter()
        .filter(|t| !matches!(t, DateToken::Literal(_)))
        .collect();
    if fields.is_empty() {
        return Err(format!("format `{}` contains no recognized tokens", spec));
    }
    if fields.len() == 1 && matches!(fields[0], DateToken::Month) {
        return Err(format!(
            "format `{}` is ambiguous: a bare `mm` could mean month or minute",
            spec
        ));
    }
    Ok(tokens)
}

impl CustomFormat {
    /// Match the value token by token. Field tokens consume a fixed number of
    /// ASCII digits and are range-checked; complete dates additionally get a
    /// real-calendar check.
    fn validate(&self, value: &str) -> Result<(), String> {
        let tokens = self.effective_tokens(value);
        let mut rest = value;
        let mut year: Option<i32> = None;
        let mut month: Option<u32> = None;
        let mut day: Option<u32> = None;

        for token in &tokens {
            if let DateToken::Literal(c) = token {
                rest = rest.strip_prefix(*c).ok_or_else(|| self.mismatch(value))?;
                continue;
            }
            let width = match token {
                DateToken::Year4 => 4,
                _ => 2,
            };
            let bytes = rest.as_bytes();
            if bytes.len() < width || !bytes[..width].iter().all(u8::is_ascii_digit) {
                return Err(self.mismatch(value));
            }
            let number: u32 = rest[..width].parse().map_err(|_| self.mismatch(value))?;
            rest = &rest[width..];

            let in_range = match token {
                DateToken::Year4 => {
                    year = Some(number as i32);
                    true
                }
                DateToken::Year2 => {
                    year = Some(2000 + number as i32);
                    true
                }
                DateToken::Month => {
                    month = Some(number);
                    (1..=12).contains(&number)
                }
                DateToken::Day => {
                    day = Some(number);
                    (1..=31).contains(&number)
                }
                DateToken::Hour => number <= 23,
                DateToken::Minute | DateToken::Second => number <= 59,
                DateToken::Literal(_) => true,
            };
            if !in_range {
                return Err(self.mismatch(value));
            }
        }
        if !rest.is_empty() {
            return Err(self.mismatch(value));
        }
        if let (Some(y), Some(m), Some(d)) = (year, month, day) {
            if NaiveDate::from_ymd_opt(y, m, d).is_none() {
                return Err(self.mismatch(value));
            }
        }
        Ok(())
    }

    /// Multi-segment values may present fewer `/`-separated segments than the
    /// format; truncate the format to the segments actually present
    fn effective_tokens(&self, value: &str) -> Vec<DateToken> {
        if !self.multi_segment {
            return self.tokens.clone();
        }
        let value_segments = value.split('/').count();
        let groups = self.segment_groups();
        if value_segments >= groups.len() {
            return self.tokens.clone();
        }
        let mut tokens = Vec::new();
        for (i, group) in groups.iter().take(value_segments).enumerate() {
            if i > 0 {
                tokens.push(DateToken::Literal('/'));
            }
            tokens.extend(group.iter().copied());
        }
        tokens
    }

    fn segment_groups(&self) -> Vec<Vec<DateToken>> {
        let mut groups: Vec<Vec<DateToken>> = vec![Vec::new()];
        for token in &self.tokens {
            if matches!(token, DateToken::Literal('/')) {
                groups.push(Vec::new());
            } else if let Some(last) = groups.last_mut() {
                last.push(*token);
            }
        }
        groups
    }

    fn mismatch(&self, value: &str) -> String {
        format!(
            "value `{}` does not match the date format `{}`",
            value,
            render_spec(&self.tokens)
        )
    }

    fn example(&self) -> String {
        self.tokens
            .iter()
            .map(|t| match t {
                DateToken::Year4 => "2025".to_string(),
                DateToken::Year2 => "25".to_string(),
                DateToken::Month => "09".to_string(),
                DateToken::Day => "18".to_string(),
                DateToken::Hour => "12".to_string(),
                DateToken::Minute => "30".to_string(),
                DateToken::Second => "45".to_string(),
                DateToken::Literal(c) => c.to_string(),
            })
            .collect()
    }
}

fn render_spec(tokens: &[DateToken]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            DateToken::Year4 => "yyyy".to_string(),
            DateToken::Year2 => "yy".to_string(),
            DateToken::Month => "mm".to_string(),
            DateToken::Day => "dd".to_string(),
            DateToken::Hour => "hh".to_string(),
            DateToken::Minute => "ii".to_string(),
            DateToken::Second => "ss".to_string(),
            DateToken::Literal(c) => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dateonly_alias() {
        let f = DateFormat::parse("dateonly", false).unwrap();
        assert!(f.validate("2025-09-18").is_ok());
        assert!(f.validate("2025-02-30").is_err());
        assert!(f.validate("2025-09-18T00:00:00").is_err());
    }

    #[test]
    fn test_utc_alias_requires_z() {
        let f = DateFormat::parse("utc", false).unwrap();
        assert!(f.validate("2025-09-18T12:30:00Z").is_ok());
        assert!(f.validate("2025-09-18T12:30:00").is_err());
        assert!(f.validate("2025-09-18T12:30:00+02:00").is_err());
    }

    #[test]
    fn test_local_alias_forbids_z() {
        let f = DateFormat::parse("local", false).unwrap();
        assert!(f.validate("2025-09-18T12:30:00").is_ok());
        assert!(f.validate("2025-09-18T12:30:00.250").is_ok());
        assert!(f.validate("2025-09-18T12:30:00Z").is_err());
    }

    #[test]
    fn test_datetime_alias_optional_z() {
        let f = DateFormat::parse("datetime", false).unwrap();
        assert!(f.validate("2025-09-18T12:30:00Z").is_ok());
        assert!(f.validate("2025-09-18T12:30:00").is_ok());
        assert!(f.validate("not-a-datetime").is_err());
    }

    #[test]
    fn test_custom_date_tokens() {
        let f = DateFormat::parse("yyyy/mm/dd", false).unwrap();
        assert!(f.validate("2025/09/18").is_ok());
        assert!(f.validate("2025-09-18").is_err());
        assert!(f.validate("2025/02/30").is_err());
    }

    #[test]
    fn test_field_widths_are_fixed() {
        let f = DateFormat::parse("yyyy/mm/dd", false).unwrap();
        assert!(f.validate("2025/9/18").is_err());
        assert!(f.validate("25/09/18").is_err());
    }

    #[test]
    fn test_mm_means_minute_after_hh() {
        let f = DateFormat::parse("hh:mm", false).unwrap();
        assert!(f.validate("23:59").is_ok());
        assert!(f.validate("23:72").is_err());
    }

    #[test]
    fn test_ii_always_means_minute() {
        let f = DateFormat::parse("yyyy-mm-dd hh:ii:ss", false).unwrap();
        assert!(f.validate("2025-09-18 12:30:45").is_ok());
        assert!(f.validate("2025-09-18 12:72:45").is_err());
    }

    #[test]
    fn test_bare_mm_is_ambiguous() {
        let err = DateFormat::parse("mm", false).unwrap_err();
        assert!(err.contains("ambiguous"));
    }

    #[test]
    fn test_no_recognized_tokens_rejected() {
        assert!(DateFormat::parse("xyz", false).is_err());
    }

    #[test]
    fn test_two_digit_year() {
        let f = DateFormat::parse("yy-mm-dd", false).unwrap();
        assert!(f.validate("25-09-18").is_ok());
        assert!(f.validate("2025-09-18").is_err());
    }

    #[test]
    fn test_multi_segment_partial_dates() {
        let f = DateFormat::parse("yyyy/mm/dd", true).unwrap();
        assert!(f.validate("2025/09/18").is_ok());
        assert!(f.validate("2025/09").is_ok());
        assert!(f.validate("2025").is_ok());
        assert!(f.validate("2025/13").is_err());
        assert!(f.validate("99").is_err());
    }

    #[test]
    fn test_single_segment_format_stays_strict() {
        let f = DateFormat::parse("yyyy/mm/dd", false).unwrap();
        assert!(f.validate("2025").is_err());
    }

    #[test]
    fn test_custom_example_round_trips() {
        for spec in ["yyyy/mm/dd", "dd.mm.yyyy", "yyyy-mm-dd hh:ii:ss", "hh:ii"] {
            let f = DateFormat::parse(spec, false).unwrap();
            let example = f.example();
            assert!(f.validate(&example).is_ok(), "{} -> {}", spec, example);
        }
    }
}
