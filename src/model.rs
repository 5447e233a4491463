//! Domain entities (§3): collections, items, content-type flags, and privileges.

use std::collections::HashSet;

use crate::dav_url::DavUrl;

/// Bitset over the collection content kinds a `DavCollection` may advertise (§4.7 point 4).
/// Hand-rolled rather than pulled from a crate: nothing in this project's dependency
/// pack reaches for `bitflags` for a set this small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentTypes(u8);

impl ContentTypes {
    pub const NONE: Self = Self(0);
    pub const CALENDAR: Self = Self(1 << 0);
    pub const EVENTS: Self = Self(1 << 1);
    pub const TODOS: Self = Self(1 << 2);
    pub const JOURNAL: Self = Self(1 << 3);
    pub const FREE_BUSY: Self = Self(1 << 4);
    pub const CONTACTS: Self = Self(1 << 5);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for ContentTypes {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ContentTypes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A WebDAV ACL privilege (§4.7 point 6). `Other` preserves privileges this crate doesn't
/// have a dedicated variant for rather than dropping them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Privilege {
    Read,
    Write,
    WriteProperties,
    WriteContent,
    Unlock,
    ReadCurrentUserPrivilegeSet,
    Bind,
    Unbind,
    WriteAcl,
    All,
    Other(String),
}

impl Privilege {
    pub fn from_local_name(name: &str) -> Self {
        match name {
            "read" => Privilege::Read,
            "write" => Privilege::Write,
            "write-properties" => Privilege::WriteProperties,
            "write-content" => Privilege::WriteContent,
            "unlock" => Privilege::Unlock,
            "read-current-user-privilege-set" => Privilege::ReadCurrentUserPrivilegeSet,
            "bind" => Privilege::Bind,
            "unbind" => Privilege::Unbind,
            "write-acl" => Privilege::WriteAcl,
            "all" => Privilege::All,
            other => Privilege::Other(other.to_string()),
        }
    }
}

/// A calendar, address book, or generic WebDAV collection discovered on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavCollection {
    pub url: DavUrl,
    pub display_name: String,
    pub content_types: ContentTypes,
    pub ctag: Option<String>,
    pub privileges: HashSet<Privilege>,
}

impl DavCollection {
    pub fn new(url: DavUrl, display_name: String) -> Self {
        Self {
            url,
            display_name,
            content_types: ContentTypes::NONE,
            ctag: None,
            privileges: HashSet::new(),
        }
    }
}

/// An individual calendar/contact/generic resource. `payload` may be empty when only
/// metadata (url + etag) is known, e.g. right after listing and before fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DavItem {
    pub url: String,
    pub content_type: String,
    pub payload: Vec<u8>,
    pub etag: String,
}

impl DavItem {
    pub fn new(url: impl Into<String>, etag: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: String::new(),
            payload: Vec::new(),
            etag: etag.into(),
        }
    }

    pub fn has_payload(&self) -> bool {
        !self.payload.is_empty()
    }
}
