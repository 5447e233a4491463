//! §8 scenario 4: create without an etag in the PUT response follows up with a GET.

use std::sync::Arc;

use dav_sync::job::JobContext;
use dav_sync::model::DavItem;
use dav_sync::protocol::ProtocolRegistry;
use dav_sync::sync::ResourceSynchronizer;
use dav_sync::EtagCache;

use crate::mock::{MockHttpClient, ScriptedResponse};

#[tokio::test]
async fn create_without_etag_follows_up_with_a_fetch() {
    let mock = Arc::new(MockHttpClient::new(vec![
        ScriptedResponse::new(201).with_header("Location", "/cal/me/work/abc.ics"),
        ScriptedResponse::new(200)
            .with_header("ETag", "\"v1\"")
            .with_header("Content-Type", "text/calendar")
            .with_body("BEGIN:VCALENDAR..."),
    ]));
    let ctx = JobContext::new(mock.clone(), Arc::new(ProtocolRegistry::new()));
    let cache = EtagCache::new();
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, cache.clone());

    let item = DavItem {
        url: "https://dav.example/cal/me/work/new.ics".to_string(),
        content_type: "text/calendar".to_string(),
        payload: b"BEGIN:VCALENDAR...".to_vec(),
        etag: String::new(),
    };

    let created = synchronizer.item_added(&item).await.unwrap();
    assert_eq!(created.url, "https://dav.example/cal/me/work/abc.ics");
    assert_eq!(created.etag, "\"v1\"");
    assert_eq!(cache.etag(&created.url).await.as_deref(), Some("\"v1\""));

    let requests = mock.requests().await;
    assert_eq!(requests[0].header("If-None-Match"), Some("*"));
}

#[tokio::test]
async fn create_conflict_is_fatal_and_never_retried() {
    let mock = Arc::new(MockHttpClient::new(vec![ScriptedResponse::new(412)]));
    let ctx = JobContext::new(mock.clone(), Arc::new(ProtocolRegistry::new()));
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, EtagCache::new());

    let item = DavItem {
        url: "https://dav.example/cal/me/work/taken.ics".to_string(),
        content_type: "text/calendar".to_string(),
        payload: b"BEGIN:VCALENDAR...".to_vec(),
        etag: String::new(),
    };

    let err = synchronizer.item_added(&item).await.unwrap_err();
    assert!(matches!(err, dav_sync::job::MutationOutcome::Failed(e) if e.kind == dav_sync::ErrorKind::ItemExists));
    assert_eq!(mock.requests().await.len(), 1, "a 412 on create must never be retried");
}
