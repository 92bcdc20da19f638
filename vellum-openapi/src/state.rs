use crate::builder::{build_document, BuildError};
use crate::config::OpenApiConfig;
use crate::exclusion::{Exclusion, PathMatcher};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use vellum_core::RouteRegistry;

/// The memoized document plus what was observed when it was built.
///
/// Valid only while the live route count still equals `routes_at_build`
/// (exact equality, not a threshold) and no exclusion mutation bumped the
/// epoch since. Either mismatch forces a full rebuild on the next read.
/// Routes mutated in place without changing the count are not detected.
#[derive(Default)]
struct SpecCache {
    document: Option<Arc<Value>>,
    routes_at_build: usize,
    epoch_at_build: u64,
}

/// Policy and cache behind one lock.
///
/// A single mutex covers both because every mutator is a read-modify-write
/// over the pair: the policy changes and the cache must be invalidated in
/// the same critical section, so no reader can observe a half-updated
/// combination.
struct Inner {
    exclusion: Option<Exclusion>,
    /// Bumped by every state-changing mutation; compared against the value
    /// stored at build time.
    epoch: u64,
    cache: SpecCache,
}

/// Shared plugin state: configuration, the live route registry, and the
/// lock-guarded exclusion policy + document cache.
pub(crate) struct SpecState {
    pub(crate) config: OpenApiConfig,
    routes: Arc<RouteRegistry>,
    inner: Mutex<Inner>,
}

impl SpecState {
    pub(crate) fn new(config: OpenApiConfig, routes: Arc<RouteRegistry>) -> Self {
        let exclusion = config.exclude.clone();
        Self {
            config,
            routes,
            inner: Mutex::new(Inner {
                exclusion,
                epoch: 0,
                cache: SpecCache::default(),
            }),
        }
    }

    /// The current document: the cached value when fresh, a full rebuild
    /// otherwise. A failed rebuild stores nothing, so the cache stays stale
    /// for the next attempt.
    pub(crate) fn document(&self) -> Result<Arc<Value>, BuildError> {
        let snapshot = self.routes.snapshot();
        let mut inner = self.inner.lock().unwrap();

        if let Some(ref document) = inner.cache.document {
            if inner.cache.routes_at_build == snapshot.len()
                && inner.cache.epoch_at_build == inner.epoch
            {
                return Ok(document.clone());
            }
        }

        tracing::debug!(routes = snapshot.len(), "rebuilding OpenAPI document");
        let document = Arc::new(build_document(
            &self.config,
            &snapshot,
            inner.exclusion.as_ref(),
        )?);
        inner.cache = SpecCache {
            document: Some(document.clone()),
            routes_at_build: snapshot.len(),
            epoch_at_build: inner.epoch,
        };
        Ok(document)
    }

    /// A deep copy of the current policy; callers cannot mutate internal
    /// state through the returned value.
    pub(crate) fn exclusion(&self) -> Option<Exclusion> {
        self.inner.lock().unwrap().exclusion.clone()
    }

    /// Replace the entire policy. Always invalidates.
    pub(crate) fn set_exclusion(&self, exclusion: Option<Exclusion>) {
        let mut inner = self.inner.lock().unwrap();
        inner.exclusion = exclusion;
        inner.epoch += 1;
    }

    pub(crate) fn add_excluded_paths(&self, values: Vec<PathMatcher>) {
        if values.is_empty() {
            return;
        }
        self.mutate(|exclusion| exclusion.get_or_insert_with(Exclusion::new).add_paths(values));
    }

    pub(crate) fn remove_excluded_paths(&self, values: Vec<PathMatcher>) {
        self.mutate(|exclusion| match exclusion {
            Some(exclusion) => exclusion.remove_paths(&values),
            None => false,
        });
    }

    pub(crate) fn add_excluded_tags(&self, values: Vec<String>) {
        if values.is_empty() {
            return;
        }
        self.mutate(|exclusion| exclusion.get_or_insert_with(Exclusion::new).add_tags(values));
    }

    pub(crate) fn remove_excluded_tags(&self, values: Vec<String>) {
        self.mutate(|exclusion| match exclusion {
            Some(exclusion) => exclusion.remove_tags(&values),
            None => false,
        });
    }

    pub(crate) fn add_excluded_methods(&self, values: Vec<String>) {
        if values.is_empty() {
            return;
        }
        self.mutate(|exclusion| exclusion.get_or_insert_with(Exclusion::new).add_methods(values));
    }

    pub(crate) fn remove_excluded_methods(&self, values: Vec<String>) {
        self.mutate(|exclusion| match exclusion {
            Some(exclusion) => exclusion.remove_methods(&values),
            None => false,
        });
    }

    /// Apply a policy mutation; bump the epoch only when state actually
    /// changed, so no-op removals do not trigger rebuild storms.
    fn mutate<F>(&self, apply: F)
    where
        F: FnOnce(&mut Option<Exclusion>) -> bool,
    {
        let mut inner = self.inner.lock().unwrap();
        if apply(&mut inner.exclusion) {
            inner.epoch += 1;
            tracing::debug!(epoch = inner.epoch, "exclusion policy changed, cache invalidated");
        }
    }
}
