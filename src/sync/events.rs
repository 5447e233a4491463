//! Produced host interface (§6): the events the synchronizer emits as it works, and the
//! `EventSink` trait a host implements to observe them.

use crate::model::{DavCollection, DavItem};
use crate::protocol::Protocol;

/// An event emitted by the synchronizer during a sync operation (§6 "Produced host
/// interface").
#[derive(Debug, Clone)]
pub enum SyncEvent {
    CollectionDiscovered {
        protocol: Protocol,
        url: String,
        origin_home_set_url: String,
    },
    CollectionRetrieved(DavCollection),
    CollectionsRetrieved(Vec<DavCollection>),
    ItemRetrieved(DavItem),
    ItemsRetrieved(Vec<DavItem>),
    ItemPut(DavItem),
    ItemRemoved {
        url: String,
    },
    AccessorError {
        message: String,
        fatal: bool,
    },
}

/// Implemented by the host application to observe synchronizer events. The synchronizer
/// takes `&dyn EventSink`, so embedding an observer is optional (`NoopEventSink` is the
/// default).
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: SyncEvent);
}

/// An `EventSink` that discards every event — the default when the host doesn't need to
/// observe synchronizer activity.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn on_event(&self, _event: SyncEvent) {}
}
