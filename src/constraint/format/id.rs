//! Identifier format specs: uuid versions and alternative id schemes.
//!
//! UUID validation decodes the 8-4-4-4-12 shape, requires the RFC 4122
//! variant (`10xx`) and a version in 1..8, then enforces the requested
//! version or version range. ULID, KSUID, NanoID and CUID are fixed-length
//! alphabet checks; snowflakes are decoded and their embedded timestamp is
//! bounded by one year past the current clock.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

/// Twitter's epoch, the conventional default for snowflake ids
pub const DEFAULT_SNOWFLAKE_EPOCH_MS: i64 = 1_288_834_974_657;

const ONE_YEAR_MS: i64 = 365 * 24 * 60 * 60 * 1000;

static UUID_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid shape pattern")
});

static ULID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[0-7][0-9a-hjkmnp-tv-z]{25}$").expect("ulid pattern"));

static KSUID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z]{27}$").expect("ksuid pattern"));

static NANOID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{21}$").expect("nanoid pattern"));

static CUID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^c[a-z0-9]{24}$").expect("cuid pattern"));

/// A parsed identifier format spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdFormat {
    /// `v1`..`v8`, `v1-5`/`v1to5`, `v6-8`/`v6to8`, `any`/`generic`
    Uuid(UuidRule),
    Ulid,
    Ksuid,
    NanoId,
    Cuid,
    /// `snowflake` or `snowflake:<epoch-ms>`
    Snowflake { epoch_ms: i64 },
}

/// Which UUID versions the spec accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UuidRule {
    Exact(u8),
    Between(u8, u8),
    Any,
}

impl IdFormat {
    /// Parse a format spec declared on a `uuid` parameter
    pub(crate) fn parse_uuid_spec(spec: &str) -> Result<Self, String> {
        let lower = spec.to_ascii_lowercase();
        match lower.as_str() {
            "any" | "generic" => return Ok(IdFormat::Uuid(UuidRule::Any)),
            "v1-5" | "v1to5" => return Ok(IdFormat::Uuid(UuidRule::Between(1, 5))),
            "v6-8" | "v6to8" => return Ok(IdFormat::Uuid(UuidRule::Between(6, 8))),
            "ulid" => return Ok(IdFormat::Ulid),
            "ksuid" => return Ok(IdFormat::Ksuid),
            "nanoid" => return Ok(IdFormat::NanoId),
            "cuid" => return Ok(IdFormat::Cuid),
            _ => {}
        }
        if let Some(rest) = lower.strip_prefix("snowflake") {
            let epoch_ms = match rest {
                "" => DEFAULT_SNOWFLAKE_EPOCH_MS,
                _ => rest
                    .strip_prefix(':')
                    .and_then(|epoch| epoch.parse::<i64>().ok())
                    .filter(|epoch| *epoch >= 0)
                    .ok_or_else(|| {
                        format!("`{}` is not a valid snowflake epoch", spec)
                    })?,
            };
            return Ok(IdFormat::Snowflake { epoch_ms });
        }
        if let Some(version) = lower.strip_prefix('v') {
            if let Ok(v) = version.parse::<u8>() {
                if (1..=8).contains(&v) {
                    return Ok(IdFormat::Uuid(UuidRule::Exact(v)));
                }
            }
        }
        Err(format!("unknown uuid format `{}`", spec))
    }

    /// Parse a format spec declared on a `string` parameter; only the
    /// identifier aliases are accepted there
    pub(crate) fn parse_string_alias(spec: &str) -> Result<Self, String> {
        match spec.to_ascii_lowercase().as_str() {
            "ulid" => Ok(IdFormat::Ulid),
            "ksuid" => Ok(IdFormat::Ksuid),
            "nanoid" => Ok(IdFormat::NanoId),
            _ => Err(format!(
                "format `{}` is not available for string parameters",
                spec
            )),
        }
    }

    /// Check a value against the format
    pub(crate) fn validate(&self, value: &str) -> Result<(), String> {
        match self {
            IdFormat::Uuid(rule) => validate_uuid(value, *rule),
            IdFormat::Ulid => shape_check(value, &ULID_RE, "ULID"),
            IdFormat::Ksuid => shape_check(value, &KSUID_RE, "KSUID"),
            IdFormat::NanoId => shape_check(value, &NANOID_RE, "NanoID"),
            IdFormat::Cuid => shape_check(value, &CUID_RE, "CUID"),
            IdFormat::Snowflake { epoch_ms } => validate_snowflake(value, *epoch_ms),
        }
    }

    /// A value matching the format
    pub(crate) fn example(&self) -> String {
        match self {
            IdFormat::Uuid(UuidRule::Exact(v)) => uuid_example(*v),
            IdFormat::Uuid(UuidRule::Between(lo, _)) => uuid_example(*lo),
            IdFormat::Uuid(UuidRule::Any) => uuid_example(4),
            IdFormat::Ulid => "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
            IdFormat::Ksuid => "0ujsswThIGTUYm2K8FjOOfXtY1K".to_string(),
            IdFormat::NanoId => "V1StGXR8_Z5jdHi6B-myT".to_string(),
            IdFormat::Cuid => "ch72gsb320000udocl363eofy".to_string(),
            IdFormat::Snowflake { .. } => "1541815603606036480".to_string(),
        }
    }
}

fn uuid_example(version: u8) -> String {
    // Third group leads with the version nibble; the `a` in the fourth group
    // carries the 10xx variant bits
    format!("550e8400-e29b-{}1d4-a716-446655440000", version)
}

fn validate_uuid(value: &str, rule: UuidRule) -> Result<(), String> {
    if !UUID_SHAPE_RE.is_match(value) {
        return Err(format!("value `{}` is not an 8-4-4-4-12 uuid", value));
    }
    let parsed = uuid::Uuid::parse_str(value)
        .map_err(|_| format!("value `{}` is not a valid uuid", value))?;
    if parsed.get_variant() != uuid::Variant::RFC4122 {
        return Err(format!("value `{}` does not carry the 10xx uuid variant", value));
    }
    let version = parsed.get_version_num();
    if !(1..=8).contains(&version) {
        return Err(format!("value `{}` has unsupported uuid version {}", value, version));
    }
    let version = version as u8;
    let accepted = match rule {
        UuidRule::Exact(v) => version == v,
        UuidRule::Between(lo, hi) => (lo..=hi).contains(&version),
        UuidRule::Any => true,
    };
    if accepted {
        Ok(())
    } else {
        Err(match rule {
            UuidRule::Exact(v) => {
                format!("value `{}` is a v{} uuid, expected v{}", value, version, v)
            }
            UuidRule::Between(lo, hi) => format!(
                "value `{}` is a v{} uuid, expected v{}-{}",
                value, version, lo, hi
            ),
            UuidRule::Any => format!("value `{}` is not an accepted uuid", value),
        })
    }
}

fn shape_check(value: &str, shape: &Regex, scheme: &str) -> Result<(), String> {
    if shape.is_match(value) {
        Ok(())
    } else {
        Err(format!("value `{}` is not a valid {}", value, scheme))
    }
}

/// Decode the 41-bit timestamp above the 10-bit machine id and 12-bit
/// sequence, then bound it against the clock
fn validate_snowflake(value: &str, epoch_ms: i64) -> Result<(), String> {
    if value.is_empty() || value.len() > 19 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("value `{}` is not a 1-19 digit snowflake", value));
    }
    let id: u64 = value
        .parse()
        .map_err(|_| format!("value `{}` is not a valid snowflake", value))?;
    let timestamp_ms = (id >> 22) as i64;
    let absolute_ms = epoch_ms.saturating_add(timestamp_ms);
    let horizon = Utc::now().timestamp_millis().saturating_add(ONE_YEAR_MS);
    if absolute_ms > horizon {
        return Err(format!(
            "value `{}` decodes to a timestamp more than a year in the future",
            value
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const V4: &str = "550e8400-e29b-41d4-a716-446655440000";
    const V1: &str = "550e8400-e29b-11d4-a716-446655440000";
    const V7: &str = "01890a5d-ac96-774b-bcce-b302099a8057";

    #[test]
    fn test_exact_version() {
        let f = IdFormat::parse_uuid_spec("v4").unwrap();
        assert!(f.validate(V4).is_ok());
        assert!(f.validate(V1).is_err());
    }

    #[test]
    fn test_version_ranges() {
        let f = IdFormat::parse_uuid_spec("v1-5").unwrap();
        assert!(f.validate(V1).is_ok());
        assert!(f.validate(V4).is_ok());
        assert!(f.validate(V7).is_err());

        let f = IdFormat::parse_uuid_spec("v6to8").unwrap();
        assert!(f.validate(V7).is_ok());
        assert!(f.validate(V4).is_err());
    }

    #[test]
    fn test_any_accepts_all_rfc_versions() {
        let f = IdFormat::parse_uuid_spec("any").unwrap();
        for value in [V1, V4, V7] {
            assert!(f.validate(value).is_ok(), "{}", value);
        }
        assert!(f.validate("not-a-uuid").is_err());
        // nil uuid has version 0
        assert!(f.validate("00000000-0000-0000-0000-000000000000").is_err());
    }

    #[test]
    fn test_variant_bits_enforced() {
        let f = IdFormat::parse_uuid_spec("any").unwrap();
        // fourth group starting with `c` carries the 110x variant, not 10xx
        assert!(f
            .validate("550e8400-e29b-41d4-c716-446655440000")
            .is_err());
    }

    #[test]
    fn test_ulid_shape() {
        let f = IdFormat::parse_uuid_spec("ulid").unwrap();
        assert!(f.validate("01ARZ3NDEKTSV4RRFFQ69G5FAV").is_ok());
        assert!(f.validate("01arz3ndektsv4rrffq69g5fav").is_ok());
        // `I` is not in the Crockford alphabet
        assert!(f.validate("01ARZ3NDEKTSV4RRFFQ69G5FAI").is_err());
        // first character limited to 0-7
        assert!(f.validate("81ARZ3NDEKTSV4RRFFQ69G5FAV").is_err());
        assert!(f.validate("tooshort").is_err());
    }

    #[test]
    fn test_ksuid_shape() {
        let f = IdFormat::parse_uuid_spec("ksuid").unwrap();
        assert!(f.validate("0ujsswThIGTUYm2K8FjOOfXtY1K").is_ok());
        assert!(f.validate("0ujsswThIGTUYm2K8FjOOfXtY1").is_err());
        assert!(f.validate("0ujsswThIGTUYm2K8FjOOfXtY1-").is_err());
    }

    #[test]
    fn test_nanoid_shape() {
        let f = IdFormat::parse_uuid_spec("nanoid").unwrap();
        assert!(f.validate("V1StGXR8_Z5jdHi6B-myT").is_ok());
        assert!(f.validate("V1StGXR8_Z5jdHi6B-my").is_err());
        assert!(f.validate("V1StGXR8_Z5jdHi6B-my!").is_err());
    }

    #[test]
    fn test_cuid_shape() {
        let f = IdFormat::parse_uuid_spec("cuid").unwrap();
        assert!(f.validate("ch72gsb320000udocl363eofy").is_ok());
        assert!(f.validate("xh72gsb320000udocl363eofy").is_err());
        assert!(f.validate("ch72gsb320000udocl363eof").is_err());
    }

    #[test]
    fn test_snowflake_default_epoch() {
        let f = IdFormat::parse_uuid_spec("snowflake").unwrap();
        assert!(f.validate("1541815603606036480").is_ok());
        assert!(f.validate("abc").is_err());
        assert!(f.validate("").is_err());
        // 20 digits is out of shape
        assert!(f.validate("12345678901234567890").is_err());
    }

    #[test]
    fn test_snowflake_custom_epoch() {
        let f = IdFormat::parse_uuid_spec("snowflake:1288834974657").unwrap();
        assert_eq!(
            f,
            IdFormat::Snowflake {
                epoch_ms: DEFAULT_SNOWFLAKE_EPOCH_MS
            }
        );
        assert!(IdFormat::parse_uuid_spec("snowflake:notanumber").is_err());
    }

    #[test]
    fn test_snowflake_future_timestamp_rejected() {
        // decodes to roughly year 2150 against the default epoch
        let f = IdFormat::parse_uuid_spec("snowflake").unwrap();
        assert!(f.validate("9999999999999999999").is_err());
    }

    #[test]
    fn test_unknown_spec_rejected() {
        assert!(IdFormat::parse_uuid_spec("v9").is_err());
        assert!(IdFormat::parse_uuid_spec("v0").is_err());
        assert!(IdFormat::parse_uuid_spec("guid").is_err());
    }

    #[test]
    fn test_examples_match_their_own_format() {
        for spec in [
            "v1", "v4", "v7", "v1-5", "v6-8", "any", "ulid", "ksuid", "nanoid", "cuid",
            "snowflake",
        ] {
            let f = IdFormat::parse_uuid_spec(spec).unwrap();
            let example = f.example();
            assert!(f.validate(&example).is_ok(), "{} -> {}", spec, example);
        }
    }
}
