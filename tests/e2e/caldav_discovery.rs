//! §8 scenario 1: discovery on a principal URL.

use std::sync::Arc;

use dav_sync::job::JobContext;
use dav_sync::protocol::{Protocol, ProtocolRegistry};
use dav_sync::sync::ResourceSynchronizer;
use dav_sync::{DavUrl, EtagCache};

use crate::mock::{MockHttpClient, ScriptedResponse};

const HOME_SET_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:response>
    <D:href>/principals/me/</D:href>
    <D:propstat>
      <D:prop>
        <D:current-user-principal><D:href>/principals/me/</D:href></D:current-user-principal>
        <C:calendar-home-set><D:href>/cal/me/</D:href></C:calendar-home-set>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

fn collection_response(href: &str, name: &str) -> String {
    format!(
        r#"<D:response>
    <D:href>{href}</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/><C:calendar/></D:resourcetype>
        <D:displayname>{name}</D:displayname>
        <C:supported-calendar-component-set><C:comp name="VEVENT"/></C:supported-calendar-component-set>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>"#
    )
}

#[tokio::test]
async fn discovers_two_collections_under_home_set() {
    let collections_body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  {}
  {}
</D:multistatus>"#,
        collection_response("/cal/me/work/", "Work"),
        collection_response("/cal/me/home/", "Home"),
    );

    let mock = Arc::new(MockHttpClient::new(vec![
        ScriptedResponse::new(200).with_body(HOME_SET_RESPONSE),
        ScriptedResponse::new(207).with_body(collections_body),
    ]));
    let ctx = JobContext::new(mock.clone(), Arc::new(ProtocolRegistry::new()));
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, EtagCache::new());

    let principal = DavUrl::parse("https://dav.example/principals/me/", Protocol::CalDav).unwrap();
    let collections = synchronizer.retrieve_collections(&principal).await.unwrap();

    assert_eq!(collections.len(), 2);
    let urls: Vec<String> = collections.iter().map(|c| c.url.to_string()).collect();
    assert!(urls.contains(&"https://dav.example/cal/me/work/".to_string()));
    assert!(urls.contains(&"https://dav.example/cal/me/home/".to_string()));

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].header("Depth"), Some("1"));
}

#[tokio::test]
async fn empty_home_set_falls_back_to_input_url() {
    let empty_home_set = r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:"><D:response>
  <D:href>/cal/me/</D:href>
  <D:propstat><D:prop/><D:status>HTTP/1.1 200 OK</D:status></D:propstat>
</D:response></D:multistatus>"#;
    let collections_body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">{}</D:multistatus>"#,
        collection_response("/cal/me/work/", "Work"),
    );

    let mock = Arc::new(MockHttpClient::new(vec![
        ScriptedResponse::new(200).with_body(empty_home_set),
        ScriptedResponse::new(207).with_body(collections_body),
    ]));
    let ctx = JobContext::new(mock.clone(), Arc::new(ProtocolRegistry::new()));
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, EtagCache::new());

    let url = DavUrl::parse("https://dav.example/cal/me/", Protocol::CalDav).unwrap();
    let collections = synchronizer.retrieve_collections(&url).await.unwrap();

    assert_eq!(collections.len(), 1);
    // second PROPFIND was issued against the original URL, not a discovered home-set
    let requests = mock.requests().await;
    assert_eq!(requests[1].url.to_string(), "https://dav.example/cal/me/");
}

#[tokio::test]
async fn zero_response_elements_is_not_an_error() {
    let collections_body = r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:"></D:multistatus>"#;
    let mock = Arc::new(MockHttpClient::new(vec![
        ScriptedResponse::new(200).with_body(HOME_SET_RESPONSE),
        ScriptedResponse::new(207).with_body(collections_body),
    ]));
    let ctx = JobContext::new(mock, Arc::new(ProtocolRegistry::new()));
    let synchronizer = ResourceSynchronizer::with_noop_events(ctx, EtagCache::new());

    let principal = DavUrl::parse("https://dav.example/principals/me/", Protocol::CalDav).unwrap();
    let collections = synchronizer.retrieve_collections(&principal).await.unwrap();
    assert!(collections.is_empty());
}
