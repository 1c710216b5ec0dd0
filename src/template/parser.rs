//! Template string parsing.
//!
//! Splits a template into its path and query portions at the first `?` that
//! is not inside braces, tokenizes the path into segments at top-level `/`
//! characters, and the query into `&`-separated `{…}` parameter blocks.

use super::compiler;
use super::param::{ParamLocation, Parameter};
use super::segment::Segment;
use super::{ParamMap, Template};
use crate::errors::TemplateError;

pub(crate) fn parse_template(text: &str) -> Result<Template, TemplateError> {
    if text.trim().is_empty() {
        return Err(TemplateError::syntax(text, "empty template"));
    }
    check_braces(text)?;

    // A missing leading slash is treated as `/` + input
    let normalized = if text.starts_with('/') {
        text.to_string()
    } else {
        format!("/{}", text)
    };

    let (path_text, query_text) = split_at_query(&normalized);

    let mut params = ParamMap::default();
    let mut segments = Vec::new();
    let mut path_position = 0usize;

    for piece in split_outside_braces(path_text, '/').into_iter().skip(1) {
        let segment = parse_path_segment(piece, text, &mut params, &mut path_position)?;
        segments.push(segment);
    }

    if let Some(query_text) = query_text {
        for block in split_outside_braces(query_text, '&') {
            let inner = block
                .trim()
                .strip_prefix('{')
                .and_then(|b| b.strip_suffix('}'))
                .ok_or_else(|| {
                    TemplateError::syntax(
                        text,
                        format!("query parameter `{}` must be a braced spec", block),
                    )
                })?;
            let parameter = Parameter::parse(inner, ParamLocation::Query)
                .map_err(|e| TemplateError::from_parameter(text, inner, e))?;
            insert_param(&mut params, parameter, text)?;
        }
    }

    let pattern = compiler::compile(&segments, &params).map_err(|e| {
        TemplateError::syntax(text, format!("failed to compile route pattern: {}", e))
    })?;

    Ok(Template::assemble(
        text.to_string(),
        segments,
        params,
        pattern,
    ))
}

/// Enforce brace balance; nesting and stray braces are template errors
fn check_braces(text: &str) -> Result<(), TemplateError> {
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                if depth > 1 {
                    return Err(TemplateError::syntax(text, "nested braces are not allowed"));
                }
            }
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(TemplateError::syntax(text, "unmatched `}`"));
                }
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(TemplateError::syntax(text, "unmatched `{`"));
    }
    Ok(())
}

/// Split at the first `?` outside braces
fn split_at_query(text: &str) -> (&str, Option<&str>) {
    let mut depth = 0i32;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            '?' if depth == 0 => return (&text[..i], Some(&text[i + 1..])),
            _ => {}
        }
    }
    (text, None)
}

/// Split at separator characters outside braces
fn split_outside_braces(text: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            c if c == separator && depth == 0 => {
                pieces.push(&text[start..i]);
                start = i + separator.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// A segment is pure literal or literal-prefix + one `{…}` + literal-suffix
fn parse_path_segment(
    piece: &str,
    template: &str,
    params: &mut ParamMap,
    path_position: &mut usize,
) -> Result<Segment, TemplateError> {
    let open = match piece.find('{') {
        None => return Ok(Segment::Literal(piece.to_string())),
        Some(i) => i,
    };
    let close = piece[open..].find('}').map(|i| open + i).ok_or_else(|| {
        TemplateError::syntax(template, "unmatched `{`")
    })?;
    let prefix = &piece[..open];
    let inner = &piece[open + 1..close];
    let suffix = &piece[close + 1..];
    if suffix.contains('{') {
        return Err(TemplateError::syntax(
            template,
            format!("segment `{}` contains more than one parameter", piece),
        ));
    }

    let mut parameter = Parameter::parse(inner, ParamLocation::Path)
        .map_err(|e| TemplateError::from_parameter(template, inner, e))?;
    parameter.set_position(*path_position);
    *path_position += 1;

    let name = parameter.name().to_string();
    insert_param(params, parameter, template)?;
    Ok(Segment::Parameter {
        prefix: prefix.to_string(),
        name,
        suffix: suffix.to_string(),
    })
}

fn insert_param(
    params: &mut ParamMap,
    parameter: Parameter,
    template: &str,
) -> Result<(), TemplateError> {
    let name = parameter.name().to_string();
    params.insert(parameter).map_err(|_| {
        TemplateError::syntax(template, format!("duplicate parameter name `{}`", name))
    })
}
