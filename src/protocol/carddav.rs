//! CardDAV descriptor (RFC 6352): addressbook-home-set discovery, `addressbook-query`/
//! `addressbook-multiget` REPORT.

use super::{ItemListMethod, ItemListQuery, ProtocolDescriptor};
use crate::protocol::Protocol;

const COLLECTION_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:carddav" xmlns:CS="http://calendarserver.org/ns/">
  <D:prop>
    <D:resourcetype/>
    <D:displayname/>
    <CS:getctag/>
    <D:current-user-privilege-set/>
  </D:prop>
</D:propfind>"#;

const ITEM_LIST_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<C:addressbook-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:carddav">
  <D:prop>
    <D:getetag/>
    <D:resourcetype/>
  </D:prop>
</C:addressbook-query>"#;

const MULTIGET_PRELUDE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<C:addressbook-multiget xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:carddav">
  <D:prop>
    <D:getetag/>
    <C:address-data/>
  </D:prop>
"#;

const MULTIGET_EPILOGUE: &str = "</C:addressbook-multiget>";

pub(super) fn descriptor() -> ProtocolDescriptor {
    ProtocolDescriptor {
        protocol: Protocol::CardDav,
        supports_principals: true,
        uses_report: true,
        uses_multiget: true,
        contacts_mime: "text/vcard",
        home_set_local_name: "addressbook-home-set",
        collection_query_body: COLLECTION_QUERY,
        item_list_queries: &[ItemListQuery {
            method: ItemListMethod::Report,
            body: ITEM_LIST_QUERY,
        }],
        multiget_prelude: MULTIGET_PRELUDE,
        multiget_epilogue: MULTIGET_EPILOGUE,
    }
}
