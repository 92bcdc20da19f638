use crate::config::{OpenApiConfig, SchemaTransform};
use crate::exclusion::Exclusion;
use crate::filter::should_document;
use serde_json::{json, Map, Value};
use vellum_core::{ParamLocation, RouteInfo};

/// Error raised while assembling a document. Failures are scoped to a
/// single build attempt; they never corrupt the exclusion store or the
/// cache.
#[derive(Debug)]
pub enum BuildError {
    /// A static documentation fragment could not be merged.
    Documentation(String),
    /// The assembled document could not be serialized.
    Serialize(serde_json::Error),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Documentation(msg) => write!(f, "invalid documentation fragment: {msg}"),
            BuildError::Serialize(err) => write!(f, "document serialization failed: {err}"),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        BuildError::Serialize(err)
    }
}

/// Recursively rewrite `$ref` paths from schemars format to OpenAPI
/// components format.
///
/// schemars 1.x generates JSON Schema Draft 2020-12 using `$defs` and
/// `$ref: "#/$defs/X"`. OpenAPI 3.1.0 expects schemas under
/// `#/components/schemas/X`.
fn sanitize_schema(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                if ref_str.starts_with("#/$defs/") {
                    *ref_str = ref_str.replace("#/$defs/", "#/components/schemas/");
                }
            }

            for (_, v) in obj.iter_mut() {
                sanitize_schema(v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                sanitize_schema(v);
            }
        }
        _ => {}
    }
}

/// Insert a schema into the schemas map, promoting `$defs` to top-level
/// components and applying the configured schema transform.
fn insert_schema(
    schemas: &mut Map<String, Value>,
    extra_definitions: &mut Vec<(String, Value)>,
    type_name: &str,
    root_schema: &Option<Value>,
    transform: Option<&SchemaTransform>,
) {
    let mut schema = match root_schema {
        Some(root) => root.clone(),
        None => json!({ "type": "object" }),
    };
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        // schemars 1.x uses "$defs" (Draft 2020-12)
        if let Some(Value::Object(defs)) = obj.remove("$defs") {
            for (def_name, def_schema) in defs {
                extra_definitions.push((def_name, def_schema));
            }
        }
    }
    sanitize_schema(&mut schema);
    if let Some(transform) = transform {
        transform(&mut schema);
    }
    schemas.insert(type_name.to_string(), schema);
}

/// Translate a route path into the OpenAPI brace-parameter form:
/// `/users/:id` becomes `/users/{id}`, a bare `*` segment becomes
/// `{wildcard}`. Segments already in brace form pass through unchanged.
fn openapi_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if segment == "*" {
                "{wildcard}".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

const STANDARD_METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "head", "options"];

/// The document methods a route occupies: its own method lowercased, or the
/// full standard set for wildcard registrations.
fn document_methods(method: &str) -> Vec<String> {
    if method.eq_ignore_ascii_case("ALL") {
        STANDARD_METHODS.iter().map(|m| m.to_string()).collect()
    } else {
        vec![method.to_ascii_lowercase()]
    }
}

/// Build the operation object for a single route.
fn operation_object(route: &RouteInfo) -> Map<String, Value> {
    let mut operation: Map<String, Value> = Map::new();
    operation.insert("operationId".into(), json!(route.operation_id));

    if !route.tags.is_empty() {
        operation.insert("tags".into(), json!(route.tags));
    }

    if let Some(ref summary) = route.summary {
        operation.insert("summary".into(), json!(summary));
    }

    if let Some(ref description) = route.description {
        operation.insert("description".into(), json!(description));
    }

    if route.deprecated {
        operation.insert("deprecated".into(), json!(true));
    }

    let params: Vec<Value> = route
        .params
        .iter()
        .map(|p| {
            let location = match p.location {
                ParamLocation::Path => "path",
                ParamLocation::Query => "query",
                ParamLocation::Header => "header",
            };
            json!({
                "name": p.name,
                "in": location,
                "required": p.required,
                "schema": { "type": p.param_type }
            })
        })
        .collect();

    if !params.is_empty() {
        operation.insert("parameters".into(), json!(params));
    }

    if let Some(ref body_type) = route.request_body_type {
        operation.insert(
            "requestBody".into(),
            json!({
                "required": route.request_body_required,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{body_type}") }
                    }
                }
            }),
        );
    }

    let status_key = route.response_status.to_string();
    let status_desc = match route.response_status {
        201 => "Created",
        204 => "No content",
        _ => "Successful response",
    };
    let mut responses: Map<String, Value> = Map::new();

    if route.response_status == 204 {
        // 204 No Content — no response body
        responses.insert(status_key, json!({ "description": status_desc }));
    } else if let Some(ref resp_type) = route.response_type {
        responses.insert(
            status_key,
            json!({
                "description": status_desc,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{resp_type}") }
                    }
                }
            }),
        );
    } else {
        responses.insert(status_key, json!({ "description": status_desc }));
    }
    operation.insert("responses".into(), Value::Object(responses));

    if !route.security.is_empty() {
        operation.insert("security".into(), json!(route.security));
    }

    operation
}

/// Build the complete OpenAPI 3.1.0 document from the live route set, the
/// current exclusion policy and the static documentation fragments.
///
/// Routes sharing a path merge into one path-item object keyed by method;
/// a later registration of the same path + method silently wins.
pub fn build_document(
    config: &OpenApiConfig,
    routes: &[RouteInfo],
    exclusion: Option<&Exclusion>,
) -> Result<Value, BuildError> {
    let reserved = config.reserved_paths();
    let included: Vec<&RouteInfo> = routes
        .iter()
        .filter(|route| should_document(route, exclusion, &reserved))
        .collect();

    tracing::debug!(
        routes = routes.len(),
        documented = included.len(),
        "building OpenAPI document"
    );

    // Paths, in route registration order.
    let mut paths: Map<String, Value> = Map::new();
    for route in &included {
        let key = openapi_path(&route.path);
        let operation = operation_object(route);

        let path_entry = paths.entry(key).or_insert_with(|| json!({}));
        if let Some(obj) = path_entry.as_object_mut() {
            for method in document_methods(&route.method) {
                obj.insert(method, Value::Object(operation.clone()));
            }
        }
    }

    // Static extra paths win over generated ones.
    for (key, item) in &config.documentation.paths {
        paths.insert(key.clone(), item.clone());
    }

    // Component schemas referenced by request and response bodies. First
    // registration of a name wins.
    let transform = config.transform_schema.as_ref();
    let mut schemas: Map<String, Value> = Map::new();
    let mut extra_definitions: Vec<(String, Value)> = Vec::new();

    for route in &included {
        if let Some(ref body_type) = route.request_body_type {
            if !schemas.contains_key(body_type) {
                insert_schema(
                    &mut schemas,
                    &mut extra_definitions,
                    body_type,
                    &route.request_body_schema,
                    transform,
                );
            }
        }
        if let Some(ref resp_type) = route.response_type {
            if !schemas.contains_key(resp_type) {
                insert_schema(
                    &mut schemas,
                    &mut extra_definitions,
                    resp_type,
                    &route.response_schema,
                    transform,
                );
            }
        }
    }

    // Merge promoted $defs from schemars into components/schemas.
    for (def_name, mut def_schema) in extra_definitions {
        sanitize_schema(&mut def_schema);
        if let Some(transform) = transform {
            transform(&mut def_schema);
        }
        schemas.entry(def_name).or_insert(def_schema);
    }

    // Static schemas win over generated ones.
    for (name, schema) in &config.documentation.schemas {
        schemas.insert(name.clone(), schema.clone());
    }

    if let Some(ref transform_refs) = config.transform_references {
        transform_refs(&mut schemas);
    }

    // Info: generated defaults, shallow-overridden by the static fragment.
    let mut info: Map<String, Value> = Map::new();
    info.insert("title".into(), json!(config.title));
    info.insert("version".into(), json!(config.version));
    if let Some(ref desc) = config.description {
        info.insert("description".into(), json!(desc));
    }
    match &config.documentation.info {
        Value::Null => {}
        Value::Object(static_info) => {
            for (key, value) in static_info {
                info.insert(key.clone(), value.clone());
            }
        }
        other => {
            return Err(BuildError::Documentation(format!(
                "info must be an object, got {other}"
            )));
        }
    }

    let mut components: Map<String, Value> = Map::new();
    if !config.documentation.security_schemes.is_empty() {
        components.insert(
            "securitySchemes".into(),
            Value::Object(config.documentation.security_schemes.clone()),
        );
    } else if included.iter().any(|route| !route.security.is_empty()) {
        components.insert(
            "securitySchemes".into(),
            json!({
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "bearerFormat": "JWT"
                }
            }),
        );
    }
    if !schemas.is_empty() {
        components.insert("schemas".into(), Value::Object(schemas));
    }

    let mut document: Map<String, Value> = Map::new();
    document.insert("openapi".into(), json!("3.1.0"));
    document.insert("info".into(), Value::Object(info));

    // The static tag list, minus tags the policy excludes.
    let tags: Vec<Value> = config
        .documentation
        .tags
        .iter()
        .filter(|tag| {
            let name = tag.get("name").and_then(Value::as_str);
            match (name, exclusion) {
                (Some(name), Some(exclusion)) => !exclusion.excludes_tag(name),
                _ => true,
            }
        })
        .cloned()
        .collect();
    if !tags.is_empty() {
        document.insert("tags".into(), json!(tags));
    }

    if !config.documentation.servers.is_empty() {
        document.insert("servers".into(), json!(config.documentation.servers));
    }
    if !config.documentation.security.is_empty() {
        document.insert("security".into(), json!(config.documentation.security));
    }

    document.insert("paths".into(), Value::Object(paths));
    document.insert("components".into(), Value::Object(components));

    Ok(Value::Object(document))
}
