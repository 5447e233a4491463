//! Consumed host collaborators (§6): the embedding application's item storage, modeled as a
//! trait so this crate never depends on a concrete PIM storage crate (§1 scope boundary).
//!
//! Format conversion (mime-typed wire payload ↔ the host's in-memory representation) is the
//! caller's own concern: `DavItem::payload` is opaque `Vec<u8>` and this crate never parses
//! or serializes it, so there is no converter trait to implement here.

use async_trait::async_trait;

/// Snapshot source used to seed the etag cache at startup (§4.14).
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All `(remote-id, etag)` pairs currently known to the embedding store.
    async fn snapshot(&self) -> Vec<(String, String)>;
}
