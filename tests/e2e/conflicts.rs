//! §8 scenario 3: modify with a stale etag surfaces a `Conflict` carrying the fresh item.

use std::sync::Arc;

use dav_sync::job::{JobContext, MutationOutcome};
use dav_sync::model::DavItem;
use dav_sync::protocol::ProtocolRegistry;
use dav_sync::sync::ResourceSynchronizer;
use dav_sync::EtagCache;

use crate::mock::{MockHttpClient, ScriptedResponse};

#[tokio::test]
async fn modify_with_stale_etag_surfaces_fresh_item() {
    let mock = Arc::new(MockHttpClient::new(vec![
        ScriptedResponse::new(412),
        ScriptedResponse::new(200)
            .with_header("ETag", "\"new\"")
            .with_header("Content-Type", "text/calendar")
            .with_body("P'"),
    ]));
    let ctx = JobContext::new(mock.clone(), Arc::new(ProtocolRegistry::new()));
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, EtagCache::new());

    let item = DavItem {
        url: "https://dav.example/cal/me/a.ics".to_string(),
        content_type: "text/calendar".to_string(),
        payload: b"P".to_vec(),
        etag: "\"old\"".to_string(),
    };

    let outcome = synchronizer.item_changed(&item).await.unwrap_err();
    match outcome {
        MutationOutcome::Conflict(info) => {
            assert_eq!(info.fresh_response_code, 412);
            assert_eq!(info.fresh_item.etag, "\"new\"");
            assert_eq!(info.fresh_item.payload, b"P'");
        }
        MutationOutcome::Failed(e) => panic!("expected Conflict, got {e}"),
    }

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 2, "modify PUT then one follow-up fetch, never retried further");
    assert_eq!(requests[0].header("If-Match"), Some("\"old\""));
}

#[tokio::test]
async fn delete_with_stale_etag_takes_the_same_conflict_path() {
    let mock = Arc::new(MockHttpClient::new(vec![
        ScriptedResponse::new(412),
        ScriptedResponse::new(200)
            .with_header("ETag", "\"new\"")
            .with_body("P'"),
    ]));
    let ctx = JobContext::new(mock, Arc::new(ProtocolRegistry::new()));
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, EtagCache::new());

    let item = DavItem {
        url: "https://dav.example/cal/me/a.ics".to_string(),
        content_type: "text/calendar".to_string(),
        payload: Vec::new(),
        etag: "\"old\"".to_string(),
    };

    let outcome = synchronizer.item_removed(&item).await.unwrap_err();
    assert!(matches!(outcome, MutationOutcome::Conflict(_)));
}
