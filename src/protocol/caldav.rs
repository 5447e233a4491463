//! CalDAV descriptor (RFC 4791): calendar-home-set discovery, `calendar-query`/
//! `calendar-multiget` REPORT.

use super::{ItemListMethod, ItemListQuery, ProtocolDescriptor};
use crate::protocol::Protocol;

const COLLECTION_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav" xmlns:CS="http://calendarserver.org/ns/">
  <D:prop>
    <D:resourcetype/>
    <D:displayname/>
    <CS:getctag/>
    <D:current-user-privilege-set/>
    <C:supported-calendar-component-set/>
  </D:prop>
</D:propfind>"#;

const ITEM_LIST_QUERY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop>
    <D:getetag/>
    <D:resourcetype/>
  </D:prop>
  <C:filter>
    <C:comp-filter name="VCALENDAR"/>
  </C:filter>
</C:calendar-query>"#;

const MULTIGET_PRELUDE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<C:calendar-multiget xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop>
    <D:getetag/>
    <C:calendar-data/>
  </D:prop>
"#;

const MULTIGET_EPILOGUE: &str = "</C:calendar-multiget>";

pub(super) fn descriptor() -> ProtocolDescriptor {
    ProtocolDescriptor {
        protocol: Protocol::CalDav,
        supports_principals: true,
        uses_report: true,
        uses_multiget: true,
        contacts_mime: "text/calendar",
        home_set_local_name: "calendar-home-set",
        collection_query_body: COLLECTION_QUERY,
        item_list_queries: &[ItemListQuery {
            method: ItemListMethod::Report,
            body: ITEM_LIST_QUERY,
        }],
        multiget_prelude: MULTIGET_PRELUDE,
        multiget_epilogue: MULTIGET_EPILOGUE,
    }
}
