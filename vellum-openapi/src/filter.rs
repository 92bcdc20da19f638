use crate::exclusion::Exclusion;
use vellum_core::RouteInfo;

/// Decide whether a route appears in the generated document.
///
/// Evaluation order: reserved-prefix self-exclusion, the route's own hidden
/// flag, then the policy's path, tag and method dimensions. The first match
/// excludes the route. An absent or empty policy excludes nothing beyond the
/// reserved paths and hidden routes.
pub fn should_document(
    route: &RouteInfo,
    exclusion: Option<&Exclusion>,
    reserved: &[String],
) -> bool {
    if reserved.iter().any(|prefix| under_prefix(&route.path, prefix)) {
        return false;
    }
    if route.hidden {
        return false;
    }

    let Some(exclusion) = exclusion else {
        return true;
    };

    if let Some(paths) = &exclusion.paths {
        if paths.iter().any(|matcher| matcher.matches(&route.path)) {
            return false;
        }
    }
    if let Some(tags) = &exclusion.tags {
        if route.tags.iter().any(|tag| tags.contains(tag)) {
            return false;
        }
    }
    if let Some(methods) = &exclusion.methods {
        if methods.iter().any(|m| m.eq_ignore_ascii_case(&route.method)) {
            return false;
        }
    }

    true
}

/// `/openapi` reserves both `/openapi` itself and everything under
/// `/openapi/`, but not `/openapi-v2`.
fn under_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
