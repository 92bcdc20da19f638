use crate::exclusion::Exclusion;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Hook applied to every generated schema fragment before it is inserted
/// into the document.
pub type SchemaTransform = Arc<dyn Fn(&mut Value) + Send + Sync>;

/// Hook applied to the final `components.schemas` map after collection.
pub type ReferencesTransform = Arc<dyn Fn(&mut Map<String, Value>) + Send + Sync>;

/// Which interactive viewer the documentation page embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Scalar,
    SwaggerUi,
}

/// Static documentation fragments merged into every generated document.
///
/// Everything here takes precedence over generated content on key collision.
#[derive(Debug, Clone, Default)]
pub struct Documentation {
    /// Shallow-merged over the generated `info` object. May be any JSON
    /// value at configuration time; non-object values (other than null) fail
    /// at build time, not up front.
    pub info: Value,
    /// Tag objects (`{"name": …, "description": …}`). Tags whose name is in
    /// the excluded-tag set are dropped from the document.
    pub tags: Vec<Value>,
    pub servers: Vec<Value>,
    /// Document-level security requirements.
    pub security: Vec<Value>,
    /// Extra path items; static entries win over generated ones.
    pub paths: Map<String, Value>,
    /// Extra component schemas; static entries win over generated ones.
    pub schemas: Map<String, Value>,
    /// Security scheme definitions. When present, the default bearer scheme
    /// is not injected.
    pub security_schemes: Map<String, Value>,
}

impl Documentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_info(mut self, info: Value) -> Self {
        self.info = info;
        self
    }

    pub fn with_tag(mut self, tag: Value) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_server(mut self, server: Value) -> Self {
        self.servers.push(server);
        self
    }

    pub fn with_security(mut self, requirement: Value) -> Self {
        self.security.push(requirement);
        self
    }

    pub fn with_path(mut self, path: &str, item: Value) -> Self {
        self.paths.insert(path.to_string(), item);
        self
    }

    pub fn with_schema(mut self, name: &str, schema: Value) -> Self {
        self.schemas.insert(name.to_string(), schema);
        self
    }

    pub fn with_security_scheme(mut self, name: &str, scheme: Value) -> Self {
        self.security_schemes.insert(name.to_string(), scheme);
        self
    }

    /// Merge a schema registry's definitions into the static schemas.
    pub fn with_registry(mut self, registry: crate::schema::SchemaRegistry) -> Self {
        self.schemas.extend(registry.into_schemas());
        self
    }
}

/// Configuration for the OpenAPI plugin.
pub struct OpenApiConfig {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    /// When disabled the plugin serves no routes at all.
    pub enabled: bool,
    /// Documentation page path.
    pub path: String,
    /// Spec endpoint path.
    pub spec_path: String,
    pub documentation: Documentation,
    /// Initial exclusion policy; mutable at runtime through the plugin
    /// handle.
    pub exclude: Option<Exclusion>,
    pub viewer: Viewer,
    /// Viewer-specific configuration serialized into the Scalar page.
    pub scalar_options: Option<Value>,
    /// Inline the document JSON into the page instead of referencing the
    /// spec endpoint by URL. For environments without eager static serving.
    pub embed_spec: bool,
    pub transform_schema: Option<SchemaTransform>,
    pub transform_references: Option<ReferencesTransform>,
}

impl OpenApiConfig {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            description: None,
            enabled: true,
            path: "/openapi".to_string(),
            spec_path: "/openapi/json".to_string(),
            documentation: Documentation::default(),
            exclude: None,
            viewer: Viewer::Scalar,
            scalar_options: None,
            embed_spec: false,
            transform_schema: None,
            transform_references: None,
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn with_spec_path(mut self, spec_path: &str) -> Self {
        self.spec_path = spec_path.to_string();
        self
    }

    pub fn with_documentation(mut self, documentation: Documentation) -> Self {
        self.documentation = documentation;
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclude = Some(exclusion);
        self
    }

    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = viewer;
        self
    }

    pub fn with_scalar_options(mut self, options: Value) -> Self {
        self.scalar_options = Some(options);
        self
    }

    pub fn with_embed_spec(mut self, embed: bool) -> Self {
        self.embed_spec = embed;
        self
    }

    pub fn with_schema_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&mut Value) + Send + Sync + 'static,
    {
        self.transform_schema = Some(Arc::new(transform));
        self
    }

    pub fn with_references_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&mut Map<String, Value>) + Send + Sync + 'static,
    {
        self.transform_references = Some(Arc::new(transform));
        self
    }

    /// The paths the plugin itself serves, excluded from its own output.
    pub(crate) fn reserved_paths(&self) -> Vec<String> {
        vec![self.path.clone(), self.spec_path.clone()]
    }
}
