//! Process-wide data-type registry.
//!
//! Slugs and aliases resolve to [`DataType`] values. The registry is built on
//! first use and treated as read-only afterwards; routers only consult it
//! while templates are being compiled.

use super::DataType;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lookup table from slug (canonical or alias) to data type
#[derive(Debug)]
pub struct DataTypeRegistry {
    by_slug: HashMap<&'static str, DataType>,
}

impl DataTypeRegistry {
    fn bootstrap() -> Self {
        let mut registry = Self {
            by_slug: HashMap::new(),
        };
        for data_type in DataType::all() {
            registry.register(data_type.slug(), data_type);
            for alias in data_type.aliases() {
                registry.register(alias, data_type);
            }
        }
        registry
    }

    fn register(&mut self, slug: &'static str, data_type: DataType) {
        self.by_slug.insert(slug, data_type);
    }

    /// Resolve a slug or alias to its data type
    pub fn lookup(&self, slug: &str) -> Option<DataType> {
        self.by_slug.get(slug).copied()
    }
}

static REGISTRY: Lazy<DataTypeRegistry> = Lazy::new(DataTypeRegistry::bootstrap);

/// Resolve a type slug or alias, case-insensitively
pub fn lookup(slug: &str) -> Option<DataType> {
    REGISTRY.lookup(slug.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_slugs_resolve() {
        assert_eq!(lookup("integer"), Some(DataType::Integer));
        assert_eq!(lookup("string"), Some(DataType::String));
        assert_eq!(lookup("uuid"), Some(DataType::Uuid));
        assert_eq!(lookup("email"), Some(DataType::Email));
    }

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(lookup("int"), Some(DataType::Integer));
        assert_eq!(lookup("bool"), Some(DataType::Boolean));
        assert_eq!(lookup("alphanum"), Some(DataType::Alphanumeric));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("INT"), Some(DataType::Integer));
        assert_eq!(lookup("Date"), Some(DataType::Date));
    }

    #[test]
    fn test_unknown_slug() {
        assert_eq!(lookup("float32"), None);
        assert_eq!(lookup(""), None);
    }
}
