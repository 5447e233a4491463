//! §8 scenario 2: item listing unchanged — no GET or multiget is issued.

use std::sync::Arc;

use dav_sync::job::JobContext;
use dav_sync::model::{ContentTypes, DavCollection};
use dav_sync::protocol::{Protocol, ProtocolRegistry};
use dav_sync::sync::ResourceSynchronizer;
use dav_sync::transport::Method;
use dav_sync::{DavUrl, EtagCache};

use crate::mock::{MockHttpClient, ScriptedResponse};

fn item_list_body() -> String {
    r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/cal/me/a.ics</D:href>
    <D:propstat><D:prop><D:getetag>"a"</D:getetag><D:resourcetype/></D:prop><D:status>HTTP/1.1 200 OK</D:status></D:propstat>
  </D:response>
  <D:response>
    <D:href>/cal/me/b.ics</D:href>
    <D:propstat><D:prop><D:getetag>"b"</D:getetag><D:resourcetype/></D:prop><D:status>HTTP/1.1 200 OK</D:status></D:propstat>
  </D:response>
</D:multistatus>"#
        .to_string()
}

fn collection(url: &str) -> DavCollection {
    let mut c = DavCollection::new(
        DavUrl::parse(url, Protocol::CalDav).unwrap(),
        "Work".to_string(),
    );
    c.content_types = ContentTypes::CALENDAR;
    c
}

#[tokio::test]
async fn unchanged_etags_issue_no_fetch() {
    let mock = Arc::new(MockHttpClient::new(vec![ScriptedResponse::new(207).with_body(item_list_body())]));
    let ctx = JobContext::new(mock.clone(), Arc::new(ProtocolRegistry::new()));
    let cache = EtagCache::new();
    cache.set_etag("https://dav.example/cal/me/a.ics", "\"a\"").await;
    cache.set_etag("https://dav.example/cal/me/b.ics", "\"b\"").await;
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, cache);

    let items = synchronizer
        .retrieve_items(&collection("https://dav.example/cal/me/"))
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    let requests = mock.requests().await;
    assert_eq!(requests.len(), 1, "only the REPORT listing query should have been issued");
    assert_eq!(requests[0].method, Method::Report);
}

#[tokio::test]
async fn second_concurrent_retrieve_items_is_rejected() {
    // Only one scripted response: the second call must be rejected by the busy-set before
    // it ever reaches the transport, or this test would panic on script exhaustion.
    let mock = Arc::new(MockHttpClient::new(vec![ScriptedResponse::new(207).with_body(item_list_body())]));
    let ctx = JobContext::new(mock, Arc::new(ProtocolRegistry::new()));
    let synchronizer = Arc::new(ResourceSynchronizer::with_noop_events(ctx, EtagCache::new()));
    let col = collection("https://dav.example/cal/me/");

    let (first, second) = tokio::join!(synchronizer.retrieve_items(&col), synchronizer.retrieve_items(&col));
    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
}
