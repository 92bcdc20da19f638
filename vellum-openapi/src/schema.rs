use schemars::JsonSchema;
use serde_json::{json, Map, Value};
use vellum_core::{ParamInfo, RouteInfo};

/// Registry that collects JSON Schema definitions for OpenAPI components.
///
/// Types that implement [`SchemaProvider`] can register themselves here.
/// The registry is merged into the document's `components/schemas` through
/// [`Documentation::with_registry`](crate::Documentation::with_registry).
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: Map<String, Value>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema definition under the given name.
    pub fn register(&mut self, name: &str, schema: Value) {
        self.schemas.insert(name.to_string(), schema);
    }

    /// Register a type's schemars-derived schema under its own name.
    pub fn register_type<T: JsonSchema>(&mut self) {
        let name = T::schema_name().into_owned();
        self.register(&name, schema_of::<T>());
    }

    /// Register a simple object schema with the given fields.
    ///
    /// Each field is `(name, type_string)` where type_string is an OpenAPI
    /// type like `"string"`, `"integer"`, `"number"`, `"boolean"`.
    pub fn register_object(&mut self, name: &str, fields: &[(&str, &str)]) {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (field_name, field_type) in fields {
            properties.insert(
                field_name.to_string(),
                json!({ "type": field_type }),
            );
            required.push(json!(field_name));
        }

        let schema = json!({
            "type": "object",
            "properties": properties,
            "required": required,
        });

        self.schemas.insert(name.to_string(), schema);
    }

    /// Consume the registry and return the schemas map.
    pub fn into_schemas(self) -> Map<String, Value> {
        self.schemas
    }

    /// Check if a schema is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }
}

/// Trait for types that can provide their own JSON Schema.
///
/// Implement this for request/response types that need hand-written schemas;
/// types deriving `schemars::JsonSchema` can use
/// [`SchemaRegistry::register_type`] instead.
pub trait SchemaProvider {
    /// The schema name (typically the type name, e.g. `"User"`).
    fn schema_name() -> &'static str;

    /// Return a JSON Schema representation of this type.
    fn json_schema() -> Value;

    /// Register this type's schema in the given registry.
    fn register_schema(registry: &mut SchemaRegistry) {
        registry.register(Self::schema_name(), Self::json_schema());
    }
}

/// Generate the root JSON Schema for `T`, ready to attach to route metadata
/// via `RouteInfo::with_request_body` / `with_response`.
pub fn schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({ "type": "object" }))
}

/// Augment every route in a group with a fixed set of header parameters.
///
/// Each header is `(name, type_string)`; routes that already declare a
/// parameter of the same name keep their own declaration. Convenience for
/// groups that share auth or correlation headers — not part of the
/// filtering or caching logic.
pub fn with_headers(routes: &mut [RouteInfo], headers: &[(&str, &str)]) {
    for route in routes.iter_mut() {
        for (name, param_type) in headers {
            if route.params.iter().any(|p| p.name == *name) {
                continue;
            }
            route.params.push(ParamInfo::header(name, param_type, true));
        }
    }
}
