//! Parameter records and the brace-spec parser.
//!
//! A parameter spec is the text inside one pair of braces:
//! `name[*][?[default]][:type][:constraints]`. The `*` marker spans multiple
//! path segments, `?` marks the parameter optional with an optional default
//! text, and the two marker characters may appear in either order around the
//! default (`post_date*?2025` and `post_date?*2025` are equivalent).

use crate::constraint::{self, Constraint};
use crate::datatype::{self, Classifier, DataType};
use crate::errors::ParameterError;
use serde::Serialize;
use std::fmt;

/// Where a parameter lives in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamLocation::Path => write!(f, "path"),
            ParamLocation::Query => write!(f, "query"),
        }
    }
}

/// A fully parsed template parameter, immutable after construction
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    location: ParamLocation,
    data_type: DataType,
    type_explicit: bool,
    classifier: Classifier,
    constraints: Vec<Constraint>,
    position: usize,
    original: String,
    multi_segment: bool,
    optional: bool,
    default_value: Option<String>,
}

impl Parameter {
    /// Parse the text inside one pair of braces.
    ///
    /// When no explicit type is given the name itself may be a type slug
    /// (`{int}`, `{date*}`); otherwise the type defaults to `string`. An
    /// explicit default must pass the parameter's own validation.
    pub fn parse(spec: &str, location: ParamLocation) -> Result<Self, ParameterError> {
        let original = spec.to_string();
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ParameterError::new(
                "",
                "",
                original.as_str(),
                location,
                "empty parameter spec",
            ));
        }

        let (name_spec, type_text, constraint_text) = split_spec(spec);
        let (name, multi_segment, optional, default_value) =
            parse_name_spec(name_spec, &original, location)?;

        let (data_type, type_explicit) = match type_text {
            Some(text) if !text.trim().is_empty() => {
                let text = text.trim();
                let data_type = datatype::lookup(text).ok_or_else(|| {
                    ParameterError::new(
                        name.as_str(),
                        text,
                        original.as_str(),
                        location,
                        format!("unknown data type `{}`", text),
                    )
                })?;
                (data_type, true)
            }
            _ => (
                datatype::lookup(&name).unwrap_or(DataType::String),
                false,
            ),
        };

        let constraints = match constraint_text {
            Some(text) => constraint::parse_list(text, data_type, multi_segment).map_err(
                |err| {
                    let detail = format!("invalid constraint: {}", err.detail());
                    let base = ParameterError::new(
                        name.as_str(),
                        data_type.slug(),
                        original.as_str(),
                        location,
                        detail.clone(),
                    );
                    match err.into_constraint_error() {
                        Some(ce) => {
                            let mut wrapped = base.with_constraints(vec![ce]);
                            wrapped.detail = detail;
                            wrapped
                        }
                        None => base,
                    }
                },
            )?,
            None => Vec::new(),
        };

        let parameter = Self {
            classifier: Classifier::new(data_type, multi_segment),
            name,
            location,
            data_type,
            type_explicit,
            constraints,
            position: 0,
            original,
            multi_segment,
            optional,
            default_value,
        };

        if let Some(default) = parameter.default_value.clone() {
            if let Err(err) = crate::validate::validate_parameter(&parameter, &default) {
                let detail = format!("default value `{}` is invalid: {}", default, err.detail);
                let mut wrapped = ParameterError::new(
                    parameter.name.as_str(),
                    parameter.data_type.slug(),
                    default.as_str(),
                    location,
                    detail.clone(),
                )
                .with_constraints(err.constraint_errors().to_vec());
                wrapped.detail = detail;
                return Err(wrapped);
            }
        }
        Ok(parameter)
    }

    /// The lower-cased parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path or query
    pub fn location(&self) -> ParamLocation {
        self.location
    }

    /// The declared or inferred data type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The classifier instantiated for this parameter
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Declared constraints, in declaration order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Ordinal among the template's path parameters; pairs the parameter with
    /// its regex capture group
    pub fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// The spec text exactly as written
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Whether the parameter may span multiple path segments
    pub fn is_multi_segment(&self) -> bool {
        self.multi_segment
    }

    /// Whether the parameter may be absent from the request
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The explicit default, when one was declared
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// The canonical spec form: `name[*][?default][:type][:constraints]`
    pub fn canonical(&self) -> String {
        let mut out = self.name.clone();
        if self.multi_segment {
            out.push('*');
        }
        if self.optional {
            out.push('?');
            if let Some(default) = &self.default_value {
                out.push_str(default);
            }
        }
        let rules: Vec<String> = self.constraints.iter().map(|c| c.rule()).collect();
        if self.type_explicit {
            out.push(':');
            out.push_str(self.data_type.slug());
        } else if !rules.is_empty() {
            out.push(':');
        }
        if !rules.is_empty() {
            out.push(':');
            out.push_str(&rules.join(","));
        }
        out
    }
}

/// Split a spec into name, optional type text and optional constraint text at
/// the first two colons
fn split_spec(spec: &str) -> (&str, Option<&str>, Option<&str>) {
    match spec.find(':') {
        None => (spec, None, None),
        Some(first) => {
            let name = &spec[..first];
            let rest = &spec[first + 1..];
            match rest.find(':') {
                None => (name, Some(rest), None),
                Some(second) => (name, Some(&rest[..second]), Some(&rest[second + 1..])),
            }
        }
    }
}

fn parse_name_spec(
    name_spec: &str,
    original: &str,
    location: ParamLocation,
) -> Result<(String, bool, bool, Option<String>), ParameterError> {
    let mut multi_segment = false;
    let mut optional = false;
    let mut default_value = None;

    let name_part = match name_spec.find('?') {
        None => name_spec,
        Some(q) => {
            optional = true;
            let mut tail = &name_spec[q + 1..];
            if let Some(stripped) = tail.strip_prefix('*') {
                multi_segment = true;
                tail = stripped;
            }
            let trimmed = tail.trim();
            if !trimmed.is_empty() {
                default_value = Some(trimmed.to_string());
            }
            &name_spec[..q]
        }
    };
    let name_part = match name_part.trim().strip_suffix('*') {
        Some(stripped) => {
            multi_segment = true;
            stripped
        }
        None => name_part.trim(),
    };

    let name = name_part.trim().to_ascii_lowercase();
    if name.is_empty() {
        return Err(ParameterError::new(
            "",
            "",
            original,
            location,
            "parameter name is missing",
        ));
    }
    if !datatype::is_identifier(&name) {
        return Err(ParameterError::new(
            name.as_str(),
            "",
            original,
            location,
            format!("parameter name `{}` is not a valid identifier", name),
        ));
    }
    Ok((name, multi_segment, optional, default_value))
}
