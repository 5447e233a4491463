//! Protocol descriptors (§4.2): one static capability set per `{CalDAV, CardDAV, WebDAV}`,
//! held in an explicitly-constructed `ProtocolRegistry` rather than a hidden global, so
//! tests can substitute their own (§9 "Global state").

mod caldav;
mod carddav;
mod webdav;

/// Tag identifying which DAV dialect a `DavUrl` or `DavCollection` was discovered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    CalDav,
    CardDav,
    WebDav,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::CalDav => "CalDAV",
            Protocol::CardDav => "CardDAV",
            Protocol::WebDav => "WebDAV",
        }
    }
}

/// HTTP method an item-list query is issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemListMethod {
    Report,
    Propfind,
}

/// One query in a protocol's item-list set (§4.6): a method plus the XML body to send.
#[derive(Debug, Clone, Copy)]
pub struct ItemListQuery {
    pub method: ItemListMethod,
    pub body: &'static str,
}

/// The capability set of a DAV dialect (§3 `ProtocolDescriptor`, §9 "Dynamic dispatch on
/// protocol"). Every field is either a flag or a function of static/request data — no
/// descriptor instance carries mutable state.
pub struct ProtocolDescriptor {
    pub protocol: Protocol,
    pub supports_principals: bool,
    pub uses_report: bool,
    pub uses_multiget: bool,
    pub contacts_mime: &'static str,
    /// Local name of the home-set property, e.g. `calendar-home-set`. Empty when
    /// `supports_principals` is false.
    pub home_set_local_name: &'static str,
    collection_query_body: &'static str,
    item_list_queries: &'static [ItemListQuery],
    multiget_prelude: &'static str,
    multiget_epilogue: &'static str,
}

impl ProtocolDescriptor {
    /// The PROPFIND body used for collection discovery (§4.2).
    pub fn collection_query_body(&self) -> &'static str {
        self.collection_query_body
    }

    /// The item-list query set (§4.6): issue each in turn, REPORT or PROPFIND per query.
    pub fn item_list_queries(&self) -> &'static [ItemListQuery] {
        self.item_list_queries
    }

    /// Build a multiget REPORT body enumerating `hrefs` (§4.9). Panics are impossible:
    /// callers only invoke this when `uses_multiget` is true.
    pub fn build_multiget(&self, hrefs: &[String]) -> String {
        let mut body = String::with_capacity(self.multiget_prelude.len() + hrefs.len() * 48);
        body.push_str(self.multiget_prelude);
        for href in hrefs {
            body.push_str("<D:href>");
            body.push_str(&crate::util::escape_xml(href));
            body.push_str("</D:href>\n");
        }
        body.push_str(self.multiget_epilogue);
        body
    }
}

/// Holds one descriptor per protocol, constructed explicitly rather than via a process
/// global (§9 "Global state").
pub struct ProtocolRegistry {
    caldav: ProtocolDescriptor,
    carddav: ProtocolDescriptor,
    webdav: ProtocolDescriptor,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self {
            caldav: caldav::descriptor(),
            carddav: carddav::descriptor(),
            webdav: webdav::descriptor(),
        }
    }

    pub fn get(&self, protocol: Protocol) -> &ProtocolDescriptor {
        match protocol {
            Protocol::CalDav => &self.caldav,
            Protocol::CardDav => &self.carddav,
            Protocol::WebDav => &self.webdav,
        }
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
