//! Remote-id → etag cache (§4.14), guarded by a single `Mutex` over the whole map (§5
//! "Shared resources": contention is negligible at this granularity).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    etags: HashMap<String, String>,
    changed: HashSet<String>,
}

/// Shared, `Arc`-wrapped etag cache. Clone freely — clones share the same underlying map.
#[derive(Clone, Default)]
pub struct EtagCache {
    state: Arc<Mutex<State>>,
}

impl EtagCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, remote_id: &str) -> bool {
        self.state.lock().await.etags.contains_key(remote_id)
    }

    pub async fn etag(&self, remote_id: &str) -> Option<String> {
        self.state.lock().await.etags.get(remote_id).cloned()
    }

    /// Record `etag` for `remote_id`. Adds `remote_id` to the changed set iff the stored
    /// value actually differed (or there was none).
    pub async fn set_etag(&self, remote_id: &str, etag: &str) {
        let mut state = self.state.lock().await;
        let changed = state.etags.get(remote_id).map(|e| e != etag).unwrap_or(true);
        state.etags.insert(remote_id.to_string(), etag.to_string());
        if changed {
            state.changed.insert(remote_id.to_string());
        }
    }

    /// Pure predicate: would storing `new_etag` for `remote_id` count as a change?
    /// `etagChanged(id, e) ⇔ !contains(id) ∨ stored(id) ≠ e` (§8 invariants). Also updates
    /// the cache, mirroring §4.14's "also updates via setEtag".
    pub async fn etag_changed(&self, remote_id: &str, new_etag: &str) -> bool {
        let was_changed = {
            let state = self.state.lock().await;
            !state.etags.contains_key(remote_id) || state.etags.get(remote_id).map(|e| e.as_str()) != Some(new_etag)
        };
        self.set_etag(remote_id, new_etag).await;
        was_changed
    }

    pub async fn changed_remote_ids(&self) -> Vec<String> {
        self.state.lock().await.changed.iter().cloned().collect()
    }

    pub async fn mark_as_changed(&self, remote_id: &str) {
        self.state.lock().await.changed.insert(remote_id.to_string());
    }

    pub async fn remove_entry(&self, remote_id: &str) {
        let mut state = self.state.lock().await;
        state.etags.remove(remote_id);
        state.changed.remove(remote_id);
    }

    /// Reconcile against an external item-store snapshot (§4.14, §2.1): seed any entries
    /// this cache doesn't already know about. Existing entries are left untouched — this
    /// is a seed, not an overwrite.
    pub async fn sync(&self, snapshot: &[(String, String)]) {
        let mut state = self.state.lock().await;
        for (remote_id, etag) in snapshot {
            state.etags.entry(remote_id.clone()).or_insert_with(|| etag.clone());
        }
    }

    /// Drop cache entries for remote-ids no longer present in `observed_ids` after a
    /// completed listing (§9 "Caching layer"), returning the removed ids so the caller can
    /// surface them as deletions.
    pub async fn retain_observed(&self, observed_ids: &HashSet<String>) -> Vec<String> {
        let mut state = self.state.lock().await;
        let stale: Vec<String> = state
            .etags
            .keys()
            .filter(|id| !observed_ids.contains(*id))
            .cloned()
            .collect();
        for id in &stale {
            state.etags.remove(id);
            state.changed.remove(id);
        }
        stale
    }
}
