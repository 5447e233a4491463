//! CardDAV collection/item projection, paralleling the CalDAV coverage already in
//! `src/xml/mod.rs`'s own test module.

use dav_sync::protocol::{Protocol, ProtocolRegistry};
use dav_sync::DavUrl;

use dav_sync::model::ContentTypes;

#[test]
fn carddav_collection_projects_as_contacts() {
    let body = r#"<?xml version="1.0"?>
<D:multistatus xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:carddav">
  <D:response>
    <D:href>/card/me/friends/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/><C:addressbook/></D:resourcetype>
        <D:displayname>Friends</D:displayname>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;
    let raws = dav_sync::xml::parser::parse_multistatus(body.as_bytes()).unwrap();
    let request_url = DavUrl::parse("https://dav.example.com/card/me/", Protocol::CardDav).unwrap();
    let collection = dav_sync::xml::project_collection(&raws[0], &request_url).unwrap().unwrap();

    assert!(collection.content_types.contains(ContentTypes::CONTACTS));
    assert_eq!(collection.display_name, "Friends");
    assert_eq!(collection.url.to_string(), "https://dav.example.com/card/me/friends/");
}

#[test]
fn carddav_multiget_descriptor_embeds_address_data() {
    let registry = ProtocolRegistry::new();
    let descriptor = registry.get(Protocol::CardDav);
    let body = descriptor.build_multiget(&["/card/me/a.vcf".to_string()]);
    assert!(body.contains("addressbook-multiget"));
    assert!(body.contains("<D:href>/card/me/a.vcf</D:href>"));
    assert_eq!(descriptor.contacts_mime, "text/vcard");
}

#[test]
fn carddav_item_list_has_no_multiget_data_field() {
    let body = r#"<?xml version="1.0"?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/card/me/friends/a.vcf</D:href>
    <D:propstat><D:prop><D:getetag>"v1"</D:getetag><D:resourcetype/></D:prop><D:status>HTTP/1.1 200 OK</D:status></D:propstat>
  </D:response>
</D:multistatus>"#;
    let raws = dav_sync::xml::parser::parse_multistatus(body.as_bytes()).unwrap();
    let request_url = DavUrl::parse("https://dav.example.com/card/me/friends/", Protocol::CardDav).unwrap();
    let item = dav_sync::xml::project_item_stub(&raws[0], &request_url).unwrap().unwrap();
    assert_eq!(item.etag, "\"v1\"");
    assert!(!item.has_payload());
}
