//! Generic WebDAV fallback: no principal discovery, Depth:1 PROPFIND listing, no multiget.

use std::sync::Arc;

use dav_sync::job::JobContext;
use dav_sync::model::DavCollection;
use dav_sync::protocol::{Protocol, ProtocolRegistry};
use dav_sync::sync::ResourceSynchronizer;
use dav_sync::transport::Method;
use dav_sync::{DavUrl, EtagCache};

use crate::mock::{MockHttpClient, ScriptedResponse};

#[tokio::test]
async fn webdav_collections_skip_principal_discovery() {
    let body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/files/docs/</D:href>
    <D:propstat><D:prop><D:resourcetype><D:collection/></D:resourcetype><D:displayname>Docs</D:displayname></D:prop><D:status>HTTP/1.1 200 OK</D:status></D:propstat>
  </D:response>
</D:multistatus>"#;
    let mock = Arc::new(MockHttpClient::new(vec![ScriptedResponse::new(207).with_body(body)]));
    let ctx = JobContext::new(mock.clone(), Arc::new(ProtocolRegistry::new()));
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, EtagCache::new());

    let url = DavUrl::parse("https://dav.example/files/", Protocol::WebDav).unwrap();
    let collections = synchronizer.retrieve_collections(&url).await.unwrap();

    assert_eq!(collections.len(), 1);
    assert_eq!(mock.requests().await.len(), 1, "no principal PROPFIND for a protocol without principals");
}

#[tokio::test]
async fn webdav_listing_fetches_items_individually_never_multiget() {
    let listing = r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:">
  <D:response><D:href>/files/docs/a.txt</D:href><D:propstat><D:prop><D:getetag>"1"</D:getetag><D:resourcetype/></D:prop><D:status>HTTP/1.1 200 OK</D:status></D:propstat></D:response>
</D:multistatus>"#;
    let mock = Arc::new(MockHttpClient::new(vec![
        ScriptedResponse::new(207).with_body(listing),
        ScriptedResponse::new(200).with_header("ETag", "\"1\"").with_body("hello"),
    ]));
    let ctx = JobContext::new(mock.clone(), Arc::new(ProtocolRegistry::new()));
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, EtagCache::new());

    let collection = DavCollection::new(
        DavUrl::parse("https://dav.example/files/docs/", Protocol::WebDav).unwrap(),
        "Docs".to_string(),
    );
    let items = synchronizer.retrieve_items(&collection).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].payload, b"hello");
    let requests = mock.requests().await;
    assert_eq!(requests[1].method, Method::Get, "webdav has no multiget, so this must be a plain GET");
}
