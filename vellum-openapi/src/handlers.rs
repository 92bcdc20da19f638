use crate::builder::BuildError;
use crate::state::SpecState;
use crate::viewer;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Build an `axum::Router` serving the spec endpoint and the documentation
/// page at the configured paths.
///
/// The returned router can be merged into any application router. When the
/// plugin is disabled it is empty.
pub(crate) fn openapi_routes<T: Clone + Send + Sync + 'static>(
    state: Arc<SpecState>,
) -> Router<T> {
    if !state.config.enabled {
        return Router::new();
    }

    let spec_state = state.clone();
    let page_state = state.clone();
    Router::new()
        .route(
            &state.config.spec_path,
            get(move || {
                let state = spec_state.clone();
                async move { spec_response(&state) }
            }),
        )
        .route(
            &state.config.path,
            get(move || {
                let state = page_state.clone();
                async move { page_response(&state) }
            }),
        )
}

/// The current document as JSON. A failed build is logged and surfaces as
/// a bare 500; the cache stays stale for the next attempt.
fn spec_response(state: &SpecState) -> Response {
    match document_json(state) {
        Ok(json) => ([("content-type", "application/json")], json).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "OpenAPI document build failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The documentation page. In embed mode the current document is rendered
/// into the page through the same cache as the spec endpoint.
fn page_response(state: &SpecState) -> Response {
    if state.config.embed_spec {
        match document_json(state) {
            Ok(json) => Html(viewer::render_page(&state.config, Some(&json))).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "OpenAPI document build failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    } else {
        Html(viewer::render_page(&state.config, None)).into_response()
    }
}

fn document_json(state: &SpecState) -> Result<String, BuildError> {
    let document = state.document()?;
    Ok(serde_json::to_string(&*document)?)
}
