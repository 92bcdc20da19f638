use crate::builder::BuildError;
use crate::config::OpenApiConfig;
use crate::exclusion::{Exclusion, PathMatcher};
use crate::handlers::openapi_routes;
use crate::state::SpecState;
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use vellum_core::RouteRegistry;

/// Plugin that serves a generated OpenAPI document and documentation page
/// for the routes registered in a [`RouteRegistry`].
///
/// # Example
///
/// ```ignore
/// use vellum_openapi::{OpenApiConfig, OpenApiPlugin};
///
/// let registry = Arc::new(RouteRegistry::new());
/// let handle = OpenApiPlugin::new(OpenApiConfig::new("My API", "1.0.0"))
///     .install(registry.clone());
///
/// let app = Router::new()
///     .merge(my_routes())
///     .merge(handle.router());
///
/// // later, at runtime:
/// handle.exclusions.add_excluded_tags(["internal"]);
/// ```
pub struct OpenApiPlugin {
    config: OpenApiConfig,
}

impl OpenApiPlugin {
    /// Create a new OpenAPI plugin with the given configuration.
    pub fn new(config: OpenApiConfig) -> Self {
        Self { config }
    }

    /// Install the plugin against the application's route registry.
    ///
    /// The registry stays shared: routes registered after installation
    /// appear in the document on the next read.
    pub fn install(self, routes: Arc<RouteRegistry>) -> OpenApiHandle {
        let state = Arc::new(SpecState::new(self.config, routes));
        OpenApiHandle {
            exclusions: Exclusions {
                state: state.clone(),
            },
            state,
        }
    }
}

/// Handle returned by [`OpenApiPlugin::install`]: the router to merge into
/// the application, plus the runtime control surface.
pub struct OpenApiHandle {
    /// Runtime control over the exclusion policy.
    pub exclusions: Exclusions,
    state: Arc<SpecState>,
}

impl OpenApiHandle {
    /// The router serving the spec endpoint and documentation page.
    pub fn router<T: Clone + Send + Sync + 'static>(&self) -> Router<T> {
        openapi_routes(self.state.clone())
    }

    /// Build (or fetch the cached) document without going through HTTP.
    pub fn document(&self) -> Result<Arc<Value>, BuildError> {
        self.state.document()
    }
}

/// The exclusion store's mutation surface.
///
/// All mutators take `&self`, apply their effect atomically (policy change
/// plus cache invalidation under one lock) and return `&Self` for chaining.
/// Removal operations that find nothing configured to remove do not
/// invalidate the cache.
pub struct Exclusions {
    state: Arc<SpecState>,
}

impl Exclusions {
    /// Replace the entire policy with an independent copy of the input, or
    /// clear it with `None`. Always invalidates the cache.
    pub fn set_exclusion(&self, exclusion: Option<Exclusion>) -> &Self {
        self.state.set_exclusion(exclusion);
        self
    }

    /// A deep copy of the current policy.
    pub fn exclusion(&self) -> Option<Exclusion> {
        self.state.exclusion()
    }

    /// Append entries to the excluded-path list, creating it if absent.
    pub fn add_excluded_paths<I, P>(&self, values: I) -> &Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathMatcher>,
    {
        self.state
            .add_excluded_paths(values.into_iter().map(Into::into).collect());
        self
    }

    /// Remove entries structurally equal to any given value. Pattern
    /// entries compare by source text, not identity.
    pub fn remove_excluded_paths<I, P>(&self, values: I) -> &Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathMatcher>,
    {
        self.state
            .remove_excluded_paths(values.into_iter().map(Into::into).collect());
        self
    }

    /// Add tags to the excluded-tag set, preserving insertion order.
    pub fn add_excluded_tags<I, S>(&self, tags: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .add_excluded_tags(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn remove_excluded_tags<I, S>(&self, tags: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .remove_excluded_tags(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Add methods to the excluded-method set. Methods are compared
    /// case-insensitively.
    pub fn add_excluded_methods<I, S>(&self, methods: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .add_excluded_methods(methods.into_iter().map(Into::into).collect());
        self
    }

    pub fn remove_excluded_methods<I, S>(&self, methods: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .remove_excluded_methods(methods.into_iter().map(Into::into).collect());
        self
    }
}
