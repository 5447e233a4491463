//! Client-side synchronization engine for CalDAV/CardDAV collections, with generic WebDAV
//! as a fallback dialect.
//!
//! The crate discovers a user's collections on a remote server (principal → home-set →
//! collection), lists and fetches the items inside them, pushes local creations,
//! modifications, and deletions back with optimistic-concurrency preconditions, and keeps
//! a local etag cache so only changed items are ever transferred.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dav_sync::dav_url::DavUrl;
//! use dav_sync::etag_cache::EtagCache;
//! use dav_sync::job::JobContext;
//! use dav_sync::protocol::{Protocol, ProtocolRegistry};
//! use dav_sync::sync::ResourceSynchronizer;
//! use dav_sync::transport::{Credentials, HyperHttpClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let http = HyperHttpClient::new(Credentials {
//!     username: Some("alice".to_string()),
//!     password: Some("hunter2".to_string()),
//!     ignore_tls_errors: false,
//! })?;
//! let ctx = JobContext::new(Arc::new(http), Arc::new(ProtocolRegistry::new()));
//! let synchronizer = ResourceSynchronizer::with_noop_events(ctx, EtagCache::new());
//!
//! let principal = DavUrl::parse("https://dav.example.com/principals/alice/", Protocol::CalDav)?;
//! let collections = synchronizer.retrieve_collections(&principal).await?;
//! for collection in &collections {
//!     let _items = synchronizer.retrieve_items(collection).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod dav_url;
pub mod error;
pub mod etag_cache;
pub mod host;
pub mod job;
pub mod model;
pub mod protocol;
pub mod sync;
pub mod transport;
mod util;
pub mod xml;

pub use dav_url::DavUrl;
pub use error::{DavError, ErrorKind, HttpError};
pub use etag_cache::EtagCache;
pub use model::{ContentTypes, DavCollection, DavItem, Privilege};
pub use protocol::{Protocol, ProtocolRegistry};
pub use sync::{EventSink, NoopEventSink, ResourceSynchronizer, SyncEvent};
pub use transport::{Credentials, HttpClient, HyperHttpClient};
