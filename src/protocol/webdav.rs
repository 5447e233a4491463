//! Generic WebDAV descriptor (RFC 4918) — the fallback dialect: Depth:1 PROPFIND listing,
//! no principal discovery, no multiget.

use super::{ItemListMethod, ItemListQuery, ProtocolDescriptor};
use crate::protocol::Protocol;

const COLLECTION_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:">
  <D:prop>
    <D:resourcetype/>
    <D:displayname/>
  </D:prop>
</D:propfind>"#;

const ITEM_LIST_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:">
  <D:prop>
    <D:getetag/>
    <D:resourcetype/>
  </D:prop>
</D:propfind>"#;

pub(super) fn descriptor() -> ProtocolDescriptor {
    ProtocolDescriptor {
        protocol: Protocol::WebDav,
        supports_principals: false,
        uses_report: false,
        uses_multiget: false,
        contacts_mime: "application/octet-stream",
        home_set_local_name: "",
        collection_query_body: COLLECTION_QUERY,
        item_list_queries: &[ItemListQuery {
            method: ItemListMethod::Propfind,
            body: ITEM_LIST_QUERY,
        }],
        multiget_prelude: "",
        multiget_epilogue: "",
    }
}
