//! Protocol jobs (§4.3–§4.13): one `async fn` per verb, each a single-shot operation
//! producing either a typed result or a `DavError`. §4.16's logging (a `debug` span per
//! job, `warn` on each local retry, `error` immediately before a terminal failure is
//! returned) is emitted from inside each function rather than factored into a wrapper, to
//! keep the retry-specific messages accurate.

mod collections;
mod items;
mod mutations;
mod principal;

pub use collections::{fetch_collections, fetch_collections_multi, DiscoveredCollection};
pub use items::{fetch_item, list_items, multiget_items};
pub use mutations::{
    create_item, delete_collection, delete_item, modify_item, ConflictInfo, MutationOutcome,
};
pub use principal::fetch_home_sets;

use std::sync::Arc;

use crate::protocol::ProtocolRegistry;
use crate::transport::HttpClient;

/// Shared, cheaply-cloneable context every job needs: the transport and the protocol
/// descriptor registry (§9 "Global state" — passed explicitly, never a process global).
#[derive(Clone)]
pub struct JobContext {
    pub http: Arc<dyn HttpClient>,
    pub protocols: Arc<ProtocolRegistry>,
}

impl JobContext {
    pub fn new(http: Arc<dyn HttpClient>, protocols: Arc<ProtocolRegistry>) -> Self {
        Self { http, protocols }
    }
}
