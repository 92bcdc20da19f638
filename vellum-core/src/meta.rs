use serde::Serialize;
use serde_json::Value;
use std::sync::RwLock;

/// Metadata about a single registered route, as the serving layer sees it.
///
/// Paths use `:name` segment parameters (`/users/:id`); a trailing `*`
/// matches the rest of the path. The method is an uppercase HTTP verb, or
/// `"ALL"` for routes registered on every method.
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    pub path: String,
    pub method: String,
    pub operation_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    /// Routes flagged hidden never appear in generated documentation.
    pub hidden: bool,
    /// OpenAPI security requirement objects, passed through verbatim.
    pub security: Vec<Value>,
    pub params: Vec<ParamInfo>,
    pub request_body_type: Option<String>,
    pub request_body_schema: Option<Value>,
    pub request_body_required: bool,
    pub response_type: Option<String>,
    pub response_schema: Option<Value>,
    pub response_status: u16,
}

impl RouteInfo {
    /// Create route metadata with the given method, path and operation id.
    ///
    /// The method is normalized to uppercase.
    pub fn new(method: &str, path: &str, operation_id: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_ascii_uppercase(),
            operation_id: operation_id.to_string(),
            summary: None,
            description: None,
            tags: Vec::new(),
            deprecated: false,
            hidden: false,
            security: Vec::new(),
            params: Vec::new(),
            request_body_type: None,
            request_body_schema: None,
            request_body_required: true,
            response_type: None,
            response_schema: None,
            response_status: 200,
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_security(mut self, requirement: Value) -> Self {
        self.security.push(requirement);
        self
    }

    pub fn with_param(mut self, param: ParamInfo) -> Self {
        self.params.push(param);
        self
    }

    /// Attach a request body: the type name plus its JSON Schema, as
    /// produced by the type-to-schema converter.
    pub fn with_request_body(mut self, type_name: &str, schema: Value, required: bool) -> Self {
        self.request_body_type = Some(type_name.to_string());
        self.request_body_schema = Some(schema);
        self.request_body_required = required;
        self
    }

    /// Attach a response body: the type name plus its JSON Schema.
    pub fn with_response(mut self, type_name: &str, schema: Value) -> Self {
        self.response_type = Some(type_name.to_string());
        self.response_schema = Some(schema);
        self
    }

    pub fn with_response_status(mut self, status: u16) -> Self {
        self.response_status = status;
        self
    }
}

/// Metadata about a route parameter.
#[derive(Debug, Clone, Serialize)]
pub struct ParamInfo {
    pub name: String,
    pub location: ParamLocation,
    pub param_type: String,
    pub required: bool,
}

impl ParamInfo {
    pub fn path(name: &str, param_type: &str) -> Self {
        Self {
            name: name.to_string(),
            location: ParamLocation::Path,
            param_type: param_type.to_string(),
            required: true,
        }
    }

    pub fn query(name: &str, param_type: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            location: ParamLocation::Query,
            param_type: param_type.to_string(),
            required,
        }
    }

    pub fn header(name: &str, param_type: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            location: ParamLocation::Header,
            param_type: param_type.to_string(),
            required,
        }
    }
}

/// Where a parameter is located in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
}

/// Live, growable collection of route metadata.
///
/// The serving application registers routes here as it mounts them; the
/// OpenAPI plugin introspects the collection on every document build. The
/// registry is append-only during normal operation — routes are never
/// removed once registered.
#[derive(Default)]
pub struct RouteRegistry {
    routes: RwLock<Vec<RouteInfo>>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single route.
    pub fn register(&self, route: RouteInfo) {
        self.routes.write().unwrap().push(route);
    }

    /// Register multiple routes at once.
    pub fn extend(&self, routes: impl IntoIterator<Item = RouteInfo>) {
        self.routes.write().unwrap().extend(routes);
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An owned copy of the current route collection.
    pub fn snapshot(&self) -> Vec<RouteInfo> {
        self.routes.read().unwrap().clone()
    }
}
