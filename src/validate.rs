//! The per-parameter validation engine.
//!
//! When a parameter carries a type-validating constraint (`format`), the
//! constraints run first and their errors are primary; otherwise the data
//! type is checked before any constraint. All constraint failures for one
//! value are collected, not just the first.

use crate::errors::ParameterError;
use crate::template::Parameter;

/// Validate one raw value against a parameter's data type and constraints
pub(crate) fn validate_parameter(
    parameter: &Parameter,
    value: &str,
) -> Result<(), ParameterError> {
    let type_validating = parameter.constraints().iter().any(|c| c.validates_type());

    if !type_validating {
        if let Err(type_err) = parameter.classifier().validate(value) {
            return Err(ParameterError::new(
                parameter.name(),
                parameter.data_type().slug(),
                value,
                parameter.location(),
                type_err.detail.clone(),
            )
            .with_type_mismatch(type_err.detail));
        }
        let failures: Vec<_> = parameter
            .constraints()
            .iter()
            .filter_map(|c| c.validate(value).err())
            .collect();
        if failures.is_empty() {
            return Ok(());
        }
        return Err(ParameterError::new(
            parameter.name(),
            parameter.data_type().slug(),
            value,
            parameter.location(),
            "",
        )
        .with_constraints(failures));
    }

    // Format-style constraints subsume the type check; when one of them fails
    // and the data type also fails, the type failure is the root cause
    let mut failures = Vec::new();
    let mut type_conflict = None;
    for constraint in parameter.constraints() {
        if let Err(failure) = constraint.validate(value) {
            if constraint.validates_type() && type_conflict.is_none() {
                type_conflict = parameter.classifier().validate(value).err();
            }
            failures.push(failure);
        }
    }
    if failures.is_empty() {
        return Ok(());
    }
    let mut error = ParameterError::new(
        parameter.name(),
        parameter.data_type().slug(),
        value,
        parameter.location(),
        "",
    );
    if let Some(type_err) = type_conflict {
        error = error.with_type_mismatch(type_err.detail);
    }
    Err(error.with_constraints(failures))
}
