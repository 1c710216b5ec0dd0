//! Suggestion URL construction.
//!
//! When validation fails, the engine answers with a URL the client could have
//! sent. Correct parameters render as uppercase placeholders; the problematic
//! parameter renders with a concrete example value drawn from the failing
//! constraint when it offers one, and from the data type otherwise. Query
//! parameters keep the user's order, required-but-missing ones are appended
//! in declaration order, and the problematic parameter goes last.

use crate::errors::ParameterError;
use crate::template::{ParamLocation, Segment, Template};

/// Build the example URL and the human-readable suggestion for one failing
/// parameter
pub(crate) fn build_suggestion(
    method: &str,
    template: &Template,
    problem: &ParameterError,
    supplied_query: &[(String, String)],
) -> (String, String) {
    let example_value = example_value_for(template, problem);

    let mut url = format!("/{} ", method);
    for segment in template.segments() {
        url.push('/');
        match segment {
            Segment::Literal(text) => url.push_str(text),
            Segment::Parameter {
                prefix,
                name,
                suffix,
            } => {
                url.push_str(prefix);
                if problem.location == ParamLocation::Path && *name == problem.parameter {
                    url.push_str(&example_value);
                } else {
                    url.push('{');
                    url.push_str(&name.to_uppercase());
                    url.push('}');
                }
                url.push_str(suffix);
            }
        }
    }

    let mut pairs: Vec<String> = Vec::new();
    // user-supplied parameters keep their order
    for (name, _) in supplied_query {
        if problem.location == ParamLocation::Query && *name == problem.parameter {
            continue;
        }
        pairs.push(format!("{}={{{}}}", name, name.to_uppercase()));
    }
    // required parameters the user left out, in declaration order
    for parameter in template.params().query_params() {
        if parameter.is_optional()
            || supplied_query.iter().any(|(n, _)| n == parameter.name())
            || (problem.location == ParamLocation::Query && parameter.name() == problem.parameter)
        {
            continue;
        }
        pairs.push(format!(
            "{}={{{}}}",
            parameter.name(),
            parameter.name().to_uppercase()
        ));
    }
    // the problematic parameter goes last, with a concrete value
    if problem.location == ParamLocation::Query {
        pairs.push(format!("{}={}", problem.parameter, example_value));
    }
    if !pairs.is_empty() {
        url.push('?');
        url.push_str(&pairs.join("&"));
    }

    let suggestion = match template.params().get(&problem.parameter) {
        Some(parameter) => format!(
            "expected {} {} value for {} parameter `{}`; did you mean `{}`?",
            parameter.classifier().indefinite_article(),
            parameter.data_type(),
            problem.location,
            problem.parameter,
            url
        ),
        None => format!("did you mean `{}`?", url),
    };
    (url, suggestion)
}

/// The failing constraint's example when it offers one, the data type's
/// otherwise
fn example_value_for(template: &Template, problem: &ParameterError) -> String {
    let parameter = match template.params().get(&problem.parameter) {
        Some(p) => p,
        None => return format!("{{{}}}", problem.parameter.to_uppercase()),
    };
    problem
        .constraint_errors()
        .iter()
        .find_map(|failure| {
            parameter
                .constraints()
                .iter()
                .find(|c| c.kind() == failure.kind)
                .and_then(|c| c.example(failure))
        })
        .unwrap_or_else(|| parameter.classifier().example())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_parameter;

    fn failing(template: &Template, name: &str, value: &str) -> ParameterError {
        let parameter = template.params().get(name).unwrap();
        validate_parameter(parameter, value).unwrap_err()
    }

    #[test]
    fn test_path_problem_gets_type_example() {
        let t = Template::parse("/users/{id:int}").unwrap();
        let problem = failing(&t, "id", "abc");
        let (url, suggestion) = build_suggestion("GET", &t, &problem, &[]);
        assert_eq!(url, "/GET /users/123");
        assert!(suggestion.contains("integer"));
        assert!(suggestion.contains("/GET /users/123"));
    }

    #[test]
    fn test_correct_path_params_become_placeholders() {
        let t = Template::parse("/users/{id:int}/posts/{slug:slug}").unwrap();
        let problem = failing(&t, "slug", "x");
        let (url, _) = build_suggestion("GET", &t, &problem, &[]);
        assert_eq!(url, "/GET /users/{ID}/posts/example-slug");
    }

    #[test]
    fn test_query_problem_goes_last_with_example() {
        let t = Template::parse("/products?{category:string}&{limit?20:int:range[1..100]}")
            .unwrap();
        let problem = failing(&t, "limit", "200");
        let supplied = vec![
            ("category".to_string(), "books".to_string()),
            ("limit".to_string(), "200".to_string()),
        ];
        let (url, _) = build_suggestion("GET", &t, &problem, &supplied);
        // range offers no example, so the integer example is used
        assert_eq!(url, "/GET /products?category={CATEGORY}&limit=123");
    }

    #[test]
    fn test_unsupplied_optional_params_are_omitted() {
        let t = Template::parse("/items?{q:string:notempty}&{page?1:int}").unwrap();
        let problem = failing(&t, "q", "");
        let supplied = vec![("q".to_string(), "".to_string())];
        let (url, _) = build_suggestion("GET", &t, &problem, &supplied);
        assert_eq!(url, "/GET /items?q=example");
    }

    #[test]
    fn test_missing_required_params_appended_in_declaration_order() {
        let t = Template::parse("/search?{a:string}&{b:string}&{c:string}").unwrap();
        let problem = ParameterError::missing("b", "string", ParamLocation::Query);
        // the user supplied only c
        let supplied = vec![("c".to_string(), "x".to_string())];
        let (url, _) = build_suggestion("GET", &t, &problem, &supplied);
        assert_eq!(url, "/GET /search?c={C}&a={A}&b=example");
    }

    #[test]
    fn test_enum_constraint_offers_its_first_member() {
        let t = Template::parse("/posts?{status:string:enum[draft,published]}").unwrap();
        let problem = failing(&t, "status", "bogus");
        let supplied = vec![("status".to_string(), "bogus".to_string())];
        let (url, _) = build_suggestion("GET", &t, &problem, &supplied);
        assert_eq!(url, "/GET /posts?status=draft");
    }
}
