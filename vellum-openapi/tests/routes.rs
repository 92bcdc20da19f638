use axum::body::Body;
use axum::Router;
use http::Request;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use vellum_core::{RouteInfo, RouteRegistry};
use vellum_openapi::{Exclusion, OpenApiConfig, OpenApiHandle, OpenApiPlugin, Viewer};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn install(config: OpenApiConfig, routes: Vec<RouteInfo>) -> (OpenApiHandle, Arc<RouteRegistry>) {
    let registry = Arc::new(RouteRegistry::new());
    registry.extend(routes);
    let handle = OpenApiPlugin::new(config).install(registry.clone());
    (handle, registry)
}

fn simple_route(method: &str, path: &str, op: &str) -> RouteInfo {
    RouteInfo::new(method, path, op)
}

async fn get_response(router: Router, path: &str) -> (http::StatusCode, String, http::HeaderMap) {
    let req = Request::builder().uri(path).body(Body::empty()).unwrap();

    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    (status, body_str, headers)
}

fn document_paths(handle: &OpenApiHandle) -> Vec<String> {
    handle.document().unwrap()["paths"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect()
}

// ── Spec endpoint ───────────────────────────────────────────────────────────

#[tokio::test]
async fn spec_endpoint_serves_document() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0"),
        vec![simple_route("GET", "/users", "list_users")],
    );

    let (status, body, headers) = get_response(handle.router(), "/openapi/json").await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(
        headers.get("content-type").unwrap().to_str().unwrap(),
        "application/json"
    );

    let spec: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(spec["openapi"], "3.1.0");
    assert!(spec["paths"]["/users"]["get"].is_object());
}

#[tokio::test]
async fn spec_endpoint_honors_custom_path() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0").with_spec_path("/api-docs/spec.json"),
        vec![],
    );

    let (status, _, _) = get_response(handle.router(), "/api-docs/spec.json").await;
    assert_eq!(status, http::StatusCode::OK);

    let (status, _, _) = get_response(handle.router(), "/openapi/json").await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn endpoint_reflects_exclusion_mutations() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0"),
        vec![
            simple_route("GET", "/public", "public"),
            simple_route("GET", "/private", "private"),
        ],
    );

    handle.exclusions.add_excluded_paths(["/private"]);
    let (_, body, _) = get_response(handle.router(), "/openapi/json").await;
    let spec: Value = serde_json::from_str(&body).unwrap();
    assert!(spec["paths"].get("/private").is_none());
    assert!(spec["paths"]["/public"].is_object());
}

// ── Documentation page ──────────────────────────────────────────────────────

#[tokio::test]
async fn docs_page_embeds_scalar_by_default() {
    let (handle, _) = install(OpenApiConfig::new("Test API", "1.0.0"), vec![]);

    let (status, body, _) = get_response(handle.router(), "/openapi").await;
    assert_eq!(status, http::StatusCode::OK);
    assert!(body.contains("<html"));
    assert!(body.contains("@scalar/api-reference"));
    assert!(body.contains(r#"data-url="/openapi/json""#));
}

#[tokio::test]
async fn docs_page_swagger_ui_viewer() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0").with_viewer(Viewer::SwaggerUi),
        vec![],
    );

    let (_, body, _) = get_response(handle.router(), "/openapi").await;
    assert!(body.contains("swagger-ui"));
    assert!(body.contains(r#"url: "/openapi/json""#));
}

#[tokio::test]
async fn docs_page_embed_spec_inlines_document() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0").with_embed_spec(true),
        vec![simple_route("GET", "/users", "list_users")],
    );

    let (_, body, _) = get_response(handle.router(), "/openapi").await;
    assert!(body.contains(r#"type="application/json""#));
    assert!(body.contains("list_users"));
    assert!(!body.contains(r#"data-url="#));
}

#[tokio::test]
async fn scalar_options_serialized_into_page() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0")
            .with_scalar_options(serde_json::json!({"theme": "purple"})),
        vec![],
    );

    let (_, body, _) = get_response(handle.router(), "/openapi").await;
    assert!(body.contains("data-configuration"));
    assert!(body.contains("purple"));
}

// ── Enabled flag ────────────────────────────────────────────────────────────

#[tokio::test]
async fn disabled_plugin_serves_nothing() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0").with_enabled(false),
        vec![simple_route("GET", "/users", "list_users")],
    );

    let (status, _, _) = get_response(handle.router(), "/openapi/json").await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
    let (status, _, _) = get_response(handle.router(), "/openapi").await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
}

// ── Cache behavior ──────────────────────────────────────────────────────────

#[test]
fn consecutive_reads_hit_the_cache() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0"),
        vec![simple_route("GET", "/users", "list_users")],
    );

    let first = handle.document().unwrap();
    let second = handle.document().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn mutation_invalidates_cache() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0"),
        vec![simple_route("GET", "/users", "list_users")],
    );

    let first = handle.document().unwrap();
    handle.exclusions.add_excluded_tags(["internal"]);
    let second = handle.document().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn route_growth_invalidates_cache() {
    let (handle, registry) = install(
        OpenApiConfig::new("Test API", "1.0.0"),
        vec![simple_route("GET", "/users", "list_users")],
    );

    let first = handle.document().unwrap();
    registry.register(simple_route("GET", "/orders", "list_orders"));
    let second = handle.document().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(second["paths"]["/orders"]["get"].is_object());
}

#[test]
fn set_exclusion_always_invalidates() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0"),
        vec![simple_route("GET", "/users", "list_users")],
    );

    let first = handle.document().unwrap();
    handle.exclusions.set_exclusion(None);
    let second = handle.document().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

// ── Initial policy from configuration ───────────────────────────────────────

#[test]
fn initial_exclusion_applies_from_first_build() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0")
            .with_exclusion(Exclusion::new().with_paths(["/private"])),
        vec![
            simple_route("GET", "/public", "public"),
            simple_route("GET", "/private", "private"),
        ],
    );

    assert_eq!(document_paths(&handle), vec!["/public"]);
    assert!(handle.exclusions.exclusion().is_some());
}

// ── Scenario walkthroughs ───────────────────────────────────────────────────

#[test]
fn scenario_policy_lifecycle() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0").with_exclusion(
            Exclusion::new()
                .with_paths(["/internal"])
                .with_tags(["admin"]),
        ),
        vec![
            simple_route("GET", "/", "root"),
            simple_route("GET", "/users", "users").with_tags(["users"]),
            simple_route("GET", "/admin", "admin").with_tags(["admin"]),
            simple_route("GET", "/internal", "internal"),
            simple_route("GET", "/health", "health"),
        ],
    );

    assert_eq!(document_paths(&handle), vec!["/", "/users", "/health"]);

    handle.exclusions.remove_excluded_paths(["/internal"]);
    assert_eq!(
        document_paths(&handle),
        vec!["/", "/users", "/internal", "/health"]
    );

    handle.exclusions.add_excluded_paths(["/health"]);
    assert_eq!(document_paths(&handle), vec!["/", "/users", "/internal"]);

    handle.exclusions.remove_excluded_tags(["admin"]);
    assert_eq!(
        document_paths(&handle),
        vec!["/", "/users", "/admin", "/internal"]
    );

    handle.exclusions.set_exclusion(Some(Exclusion::new()));
    assert_eq!(
        document_paths(&handle),
        vec!["/", "/users", "/admin", "/internal", "/health"]
    );
}

#[test]
fn scenario_default_policy_round_trip() {
    let (handle, _) = install(
        OpenApiConfig::new("Test API", "1.0.0"),
        vec![
            simple_route("GET", "/public", "public"),
            simple_route("GET", "/private", "private"),
        ],
    );

    assert_eq!(document_paths(&handle), vec!["/public", "/private"]);

    handle.exclusions.add_excluded_paths(["/private"]);
    assert_eq!(document_paths(&handle), vec!["/public"]);

    handle.exclusions.remove_excluded_paths(["/private"]);
    assert_eq!(document_paths(&handle), vec!["/public", "/private"]);
}
