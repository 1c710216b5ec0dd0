//! Process-wide constraint registry.
//!
//! Constraint parsers are registered per `(data type, kind)` pair; a lookup
//! miss means the combination is unsupported and the template is rejected.
//! The registry is built on first use and read-only afterwards.

use super::{choice, format, length, not_empty, pattern, range};
use super::{Constraint, ConstraintKind};
use crate::datatype::DataType;
use crate::errors::ConstraintError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Parameter context handed to constraint parsers
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConstraintCtx {
    pub data_type: DataType,
    pub multi_segment: bool,
}

pub(crate) type ParseFn =
    fn(Option<&str>, &ConstraintCtx) -> Result<Constraint, ConstraintError>;

/// Lookup table from `(data type, kind)` to the kind's payload parser
pub(crate) struct ConstraintRegistry {
    entries: HashMap<(DataType, ConstraintKind), ParseFn>,
}

impl ConstraintRegistry {
    fn bootstrap() -> Self {
        use DataType::*;

        let mut registry = Self {
            entries: HashMap::new(),
        };
        for data_type in [Integer, Real, Decimal, Date] {
            registry.register(data_type, ConstraintKind::Range, range::parse);
        }
        for data_type in [String, Identifier, Alphanumeric, Slug, Email, Uuid] {
            registry.register(data_type, ConstraintKind::Length, length::parse);
        }
        for data_type in [String, Integer, Identifier, Alphanumeric, Slug] {
            registry.register(data_type, ConstraintKind::Enum, choice::parse);
        }
        for data_type in [String, Identifier, Alphanumeric, Slug, Email] {
            registry.register(data_type, ConstraintKind::Regex, pattern::parse);
            registry.register(data_type, ConstraintKind::NotEmpty, not_empty::parse);
        }
        for data_type in [Date, Uuid, String] {
            registry.register(data_type, ConstraintKind::Format, format::parse);
        }
        registry
    }

    fn register(&mut self, data_type: DataType, kind: ConstraintKind, parse: ParseFn) {
        self.entries.insert((data_type, kind), parse);
    }

    fn lookup(&self, data_type: DataType, kind: ConstraintKind) -> Option<ParseFn> {
        self.entries.get(&(data_type, kind)).copied()
    }
}

static REGISTRY: Lazy<ConstraintRegistry> = Lazy::new(ConstraintRegistry::bootstrap);

pub(crate) fn lookup(data_type: DataType, kind: ConstraintKind) -> Option<ParseFn> {
    REGISTRY.lookup(data_type, kind)
}
