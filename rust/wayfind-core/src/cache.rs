use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use tracing::debug;

use crate::graph::{build_graph, Graph};
use crate::models::{Network, PathSegment};
use crate::options::RouteOptions;

/// A cached graph is valid for exactly one (network, data-version) pair;
/// any change to the underlying segment store must change the version
/// token, which makes the stale entry unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub network: Network,
    pub version: i64,
}

/// Explicit, opt-in cache of built graphs. The engine's baseline is a
/// fresh rebuild per request; attach this only when an external
/// invalidation signal (e.g. the store's data version) is available.
pub struct GraphCache {
    inner: Mutex<LruCache<CacheKey, Arc<Graph>>>,
}

impl GraphCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self { inner: Mutex::new(LruCache::new(capacity)) }
    }

    pub fn get_or_build(
        &self,
        key: CacheKey,
        segments: &[PathSegment],
        options: &RouteOptions,
    ) -> Arc<Graph> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(hit) = guard.get(&key) {
            return Arc::clone(hit);
        }
        debug!(network = key.network.as_str(), version = key.version, "graph cache miss");
        let graph = Arc::new(build_graph(segments, options));
        guard.put(key, Arc::clone(&graph));
        graph
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}
