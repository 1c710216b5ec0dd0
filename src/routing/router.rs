//! Route registration.
//!
//! Routes are compiled eagerly: `add_route` parses the template, merges any
//! extra query parameter specs from the route args, and appends the compiled
//! route in declaration order. Configure the router fully before serving
//! traffic; `match_request` is safe for concurrent use once registration is
//! done.

use super::{Route, RouteArgs};
use crate::errors::TemplateError;
use crate::template::{ParamLocation, Parameter, Template};

/// Holds compiled routes in declaration order
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Create an empty router
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Parse, compile and append a route.
    ///
    /// The method is upper-cased; an empty method matches any request method.
    /// Template errors surface here and the route is not added.
    pub fn add_route(
        &mut self,
        method: &str,
        template_text: &str,
        args: RouteArgs,
    ) -> Result<(), TemplateError> {
        let mut template = Template::parse(template_text)?;
        for spec in &args.query_params {
            let parameter = Parameter::parse(spec, ParamLocation::Query)
                .map_err(|e| TemplateError::from_parameter(template_text, spec.as_str(), e))?;
            if !template.params().contains(parameter.name()) {
                template.push_query_param(parameter);
            }
        }

        let index = self.routes.len();
        let method = method.trim().to_ascii_uppercase();
        tracing::debug!(
            method = %method,
            template = template_text,
            index = index,
            "compiled route"
        );
        self.routes.push(Route::new(method, template, index, args));
        Ok(())
    }

    /// The compiled routes in declaration order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
