//! The resource synchronizer (§4.15): orchestrates the protocol jobs and etag cache into
//! `retrieveCollections`, `retrieveItems`, `retrieveItem`, and `itemAdded/Changed/Removed`.
//!
//! The callback chain the original implementation expresses as signal/slot wiring is
//! reified here as a small set of `async fn`s; `busy` tracks per-collection in-flight state
//! so a second `retrieve_items` for the same collection is rejected deterministically
//! rather than silently queued (§9 "Open question resolution").

mod events;

pub use events::{EventSink, NoopEventSink, SyncEvent};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::dav_url::DavUrl;
use crate::error::{DavError, ErrorKind};
use crate::etag_cache::EtagCache;
use crate::host::ItemStore;
use crate::job::{self, JobContext, MutationOutcome};
use crate::model::{DavCollection, DavItem};

fn parse_item_uri(url: &str) -> Result<hyper::Uri, DavError> {
    url.parse::<hyper::Uri>()
        .map_err(|e| DavError::new(ErrorKind::ItemFetch, 0, "invalid item URL", e.to_string()))
}

pub struct ResourceSynchronizer {
    ctx: JobContext,
    cache: EtagCache,
    events: Arc<dyn EventSink>,
    busy: Arc<Mutex<HashSet<String>>>,
}

impl ResourceSynchronizer {
    pub fn new(ctx: JobContext, cache: EtagCache, events: Arc<dyn EventSink>) -> Self {
        Self {
            ctx,
            cache,
            events,
            busy: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn with_noop_events(ctx: JobContext, cache: EtagCache) -> Self {
        Self::new(ctx, cache, Arc::new(NoopEventSink))
    }

    /// Seed the etag cache from the embedding application's current state (§4.14).
    pub async fn seed_cache(&self, store: &dyn ItemStore) {
        let snapshot = store.snapshot().await;
        self.cache.sync(&snapshot).await;
    }

    async fn try_enter(&self, collection_url: &str) -> Result<(), DavError> {
        let mut busy = self.busy.lock().await;
        if !busy.insert(collection_url.to_string()) {
            return Err(DavError::without_response(
                ErrorKind::ProblemWithRequest,
                "a sync for this collection is already in flight",
            ));
        }
        Ok(())
    }

    async fn leave(&self, collection_url: &str) {
        self.busy.lock().await.remove(collection_url);
    }

    /// `Idle → FetchingCollections → Idle` (§4.15). Failure cancels the operation with the
    /// job's error text — there is no partial commit of a subset of collections.
    pub async fn retrieve_collections(&self, url: &DavUrl) -> Result<Vec<DavCollection>, DavError> {
        tracing::debug!(url = %url, "synchronizer: Idle -> FetchingCollections");
        match job::fetch_collections(&self.ctx, url).await {
            Ok(discovered) => {
                let mut collections = Vec::with_capacity(discovered.len());
                for d in &discovered {
                    self.events.on_event(SyncEvent::CollectionDiscovered {
                        protocol: d.collection.url.protocol(),
                        url: d.collection.url.to_string(),
                        origin_home_set_url: d.origin_home_set_url.to_string(),
                    });
                    self.events
                        .on_event(SyncEvent::CollectionRetrieved(d.collection.clone()));
                    collections.push(d.collection.clone());
                }
                self.events
                    .on_event(SyncEvent::CollectionsRetrieved(collections.clone()));
                tracing::debug!(url = %url, "synchronizer: FetchingCollections -> Idle");
                Ok(collections)
            }
            Err(e) => {
                self.events.on_event(SyncEvent::AccessorError {
                    message: e.message.clone(),
                    fatal: true,
                });
                tracing::debug!(url = %url, "synchronizer: FetchingCollections -> Idle (error)");
                Err(e)
            }
        }
    }

    /// `Idle → ListingItems → (MultigetFetching | PerItemFetching | Done)` (§4.15).
    /// Rejects with `ProblemWithRequest` if a sync for this collection is already running.
    pub async fn retrieve_items(&self, collection: &DavCollection) -> Result<Vec<DavItem>, DavError> {
        let key = collection.url.to_string();
        self.try_enter(&key).await?;
        let result = self.retrieve_items_inner(collection).await;
        self.leave(&key).await;
        result
    }

    async fn retrieve_items_inner(&self, collection: &DavCollection) -> Result<Vec<DavItem>, DavError> {
        tracing::debug!(url = %collection.url, "synchronizer: Idle -> ListingItems");
        let listed = job::list_items(&self.ctx, &collection.url).await.map_err(|e| {
            self.events.on_event(SyncEvent::AccessorError {
                message: e.message.clone(),
                fatal: true,
            });
            e
        })?;

        let mut observed_ids = HashSet::with_capacity(listed.len());
        let mut unchanged = Vec::new();
        let mut to_fetch = Vec::new();
        for item in &listed {
            observed_ids.insert(item.url.clone());
            if self.cache.etag_changed(&item.url, &item.etag).await {
                to_fetch.push(item.url.clone());
            } else if let Some(cached_etag) = self.cache.etag(&item.url).await {
                unchanged.push(DavItem::new(item.url.clone(), cached_etag));
            }
        }
        let stale = self.cache.retain_observed(&observed_ids).await;
        for url in &stale {
            self.events.on_event(SyncEvent::ItemRemoved { url: url.clone() });
        }

        let fetched = self.fetch_changed(collection, &to_fetch).await?;

        let mut items = unchanged;
        items.extend(fetched.iter().cloned());
        for item in &fetched {
            self.events.on_event(SyncEvent::ItemRetrieved(item.clone()));
        }
        self.events.on_event(SyncEvent::ItemsRetrieved(items.clone()));
        tracing::debug!(url = %collection.url, "synchronizer: -> Idle");
        Ok(items)
    }

    /// If the protocol supports multiget and there's anything to fetch, issue a single
    /// multiget; URLs it didn't return data for fall back to sequential per-item GETs,
    /// same as when multiget isn't supported at all (§4.15, §5 ordering guarantee (c):
    /// per-item GETs within one collection are sequential, never parallel).
    async fn fetch_changed(
        &self,
        collection: &DavCollection,
        to_fetch: &[String],
    ) -> Result<Vec<DavItem>, DavError> {
        if to_fetch.is_empty() {
            return Ok(Vec::new());
        }

        let descriptor = self.ctx.protocols.get(collection.url.protocol());
        let mut remaining: Vec<String> = to_fetch.to_vec();
        let mut fetched = Vec::with_capacity(to_fetch.len());

        if descriptor.uses_multiget {
            tracing::debug!(url = %collection.url, "synchronizer: ListingItems -> MultigetFetching");
            let multi = job::multiget_items(&self.ctx, &collection.url, to_fetch).await?;
            let mut by_url: HashMap<String, DavItem> =
                multi.into_iter().map(|i| (i.url.clone(), i)).collect();
            remaining = to_fetch
                .iter()
                .filter(|url| !by_url.contains_key(*url))
                .cloned()
                .collect();
            for url in to_fetch {
                if let Some(item) = by_url.remove(url) {
                    self.cache.set_etag(&item.url, &item.etag).await;
                    fetched.push(item);
                }
            }
        }

        if !remaining.is_empty() {
            tracing::debug!(url = %collection.url, "synchronizer: ListingItems -> PerItemFetching");
            for url in &remaining {
                let uri = parse_item_uri(url)?;
                let item = job::fetch_item(&self.ctx, &uri).await?;
                self.cache.set_etag(&item.url, &item.etag).await;
                fetched.push(item);
            }
        }

        Ok(fetched)
    }

    /// Single `ItemFetch` (§4.15): the payload is returned as-is; decoding it into the
    /// host's in-memory representation is entirely the caller's job.
    pub async fn retrieve_item(&self, item_url: &str) -> Result<DavItem, DavError> {
        let uri = parse_item_uri(item_url)?;
        let item = job::fetch_item(&self.ctx, &uri).await?;
        self.cache.set_etag(&item.url, &item.etag).await;
        self.events.on_event(SyncEvent::ItemRetrieved(item.clone()));
        Ok(item)
    }

    /// Dispatches to the create job (§4.10). On success the cache is updated before the
    /// `ItemPut` event fires (§5 ordering guarantee (d)).
    pub async fn item_added(&self, item: &DavItem) -> Result<DavItem, MutationOutcome> {
        let created = job::create_item(&self.ctx, item).await?;
        self.cache.set_etag(&created.url, &created.etag).await;
        self.events.on_event(SyncEvent::ItemPut(created.clone()));
        Ok(created)
    }

    /// Dispatches to the modify job (§4.11). On `Conflict`, the fresh item is returned to
    /// the caller unmodified in the cache — only a successful mutation updates the cache.
    pub async fn item_changed(&self, item: &DavItem) -> Result<DavItem, MutationOutcome> {
        let modified = job::modify_item(&self.ctx, item).await?;
        self.cache.set_etag(&modified.url, &modified.etag).await;
        self.events.on_event(SyncEvent::ItemPut(modified.clone()));
        Ok(modified)
    }

    /// Dispatches to the delete job (§4.12).
    pub async fn item_removed(&self, item: &DavItem) -> Result<(), MutationOutcome> {
        job::delete_item(&self.ctx, item).await?;
        self.cache.remove_entry(&item.url).await;
        self.events.on_event(SyncEvent::ItemRemoved {
            url: item.url.clone(),
        });
        Ok(())
    }
}
