use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use wayfind_core::NavigationRoute;

#[derive(Debug)]
pub enum Retrieval {
    Found(NavigationRoute),
    Expired,
    Missing,
}

struct Entry {
    route: NavigationRoute,
    expires_at: Instant,
}

/// In-memory store for computed routes, keyed by the opaque id handed to
/// the kiosk front-end. Expired entries linger one extra TTL so a lookup
/// can still distinguish "expired" from "never existed".
pub struct RouteStore {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
    counter: AtomicU64,
}

impl RouteStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            counter: AtomicU64::new(0),
        }
    }

    pub fn insert(&self, route: NavigationRoute) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let id = format!("{:08x}{:04x}", now_unix(), n & 0xffff);

        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, e| e.expires_at + self.ttl > now);
        entries.insert(id.clone(), Entry { route, expires_at: now + self.ttl });
        id
    }

    pub fn get(&self, id: &str) -> Retrieval {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(id) {
            Some(e) if e.expires_at > Instant::now() => Retrieval::Found(e.route.clone()),
            Some(_) => Retrieval::Expired,
            None => Retrieval::Missing,
        }
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
