mod builder;
mod config;
mod exclusion;
mod ext;
mod filter;
mod handlers;
mod state;
mod viewer;
pub mod schema;

pub use builder::{build_document, BuildError};
pub use config::{Documentation, OpenApiConfig, ReferencesTransform, SchemaTransform, Viewer};
pub use exclusion::{Exclusion, PathMatcher};
pub use ext::{Exclusions, OpenApiHandle, OpenApiPlugin};
pub use filter::should_document;
pub use schema::{schema_of, with_headers, SchemaProvider, SchemaRegistry};
