//! Anchored regex assembly for template paths.
//!
//! Each parameter becomes one capture group: `([^/]+)` for a single segment,
//! `([^/]+(?:/[^/]+)*)` when the parameter may span segments. Literal text is
//! escaped, and the whole pattern is anchored so a match always covers the
//! full request path.

use super::segment::Segment;
use super::ParamMap;
use regex::Regex;

const SINGLE_SEGMENT: &str = "([^/]+)";
const MULTI_SEGMENT: &str = "([^/]+(?:/[^/]+)*)";

pub(crate) fn compile(segments: &[Segment], params: &ParamMap) -> Result<Regex, regex::Error> {
    let mut pattern = String::from("^");
    for segment in segments {
        pattern.push('/');
        match segment {
            Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
            Segment::Parameter {
                prefix,
                name,
                suffix,
            } => {
                pattern.push_str(&regex::escape(prefix));
                let multi = params
                    .get(name)
                    .map(|p| p.is_multi_segment())
                    .unwrap_or(false);
                pattern.push_str(if multi { MULTI_SEGMENT } else { SINGLE_SEGMENT });
                pattern.push_str(&regex::escape(suffix));
            }
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}
