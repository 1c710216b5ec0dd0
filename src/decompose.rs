//! Multi-segment value decomposition.
//!
//! After a multi-segment capture, the joined value is stored under the
//! parameter name and split into sub-keys: `name_year`/`name_month`/`name_day`
//! for dates, `name_1`, `name_2`, … for everything else.

use crate::datatype::DataType;
use crate::values::ValueMap;

/// Add the decomposed sub-keys of a multi-segment value to the values map
pub(crate) fn decompose(values: &mut ValueMap, name: &str, value: &str, data_type: DataType) {
    if data_type == DataType::Date {
        let suffixes = ["year", "month", "day"];
        for (part, suffix) in value.split('/').take(3).zip(suffixes) {
            if !part.is_empty() {
                values.insert(format!("{}_{}", name, suffix), part);
            }
        }
        return;
    }
    let mut index = 0usize;
    for part in value.split('/') {
        if part.is_empty() {
            continue;
        }
        index += 1;
        values.insert(format!("{}_{}", name, index), part);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_decomposition() {
        let mut values = ValueMap::new();
        decompose(&mut values, "post_date", "2025/09/18", DataType::Date);
        assert_eq!(values.get("post_date_year"), Some("2025"));
        assert_eq!(values.get("post_date_month"), Some("09"));
        assert_eq!(values.get("post_date_day"), Some("18"));
    }

    #[test]
    fn test_partial_date_decomposition() {
        let mut values = ValueMap::new();
        decompose(&mut values, "d", "2025", DataType::Date);
        assert_eq!(values.get("d_year"), Some("2025"));
        assert!(!values.contains("d_month"));
        assert!(!values.contains("d_day"));
    }

    #[test]
    fn test_indexed_decomposition() {
        let mut values = ValueMap::new();
        decompose(&mut values, "path", "docs/guide/intro", DataType::String);
        assert_eq!(values.get("path_1"), Some("docs"));
        assert_eq!(values.get("path_2"), Some("guide"));
        assert_eq!(values.get("path_3"), Some("intro"));
    }

    #[test]
    fn test_single_part_still_gets_index() {
        let mut values = ValueMap::new();
        decompose(&mut values, "path", "docs", DataType::String);
        assert_eq!(values.get("path_1"), Some("docs"));
    }

    #[test]
    fn test_empty_parts_are_skipped() {
        let mut values = ValueMap::new();
        decompose(&mut values, "path", "a//b", DataType::String);
        assert_eq!(values.get("path_1"), Some("a"));
        assert_eq!(values.get("path_2"), Some("b"));
        assert!(!values.contains("path_3"));
    }
}
