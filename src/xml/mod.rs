//! XML helpers: the streaming multistatus parser (`parser`) and the response → domain-entity
//! projection it feeds (§4.7).

pub mod parser;

use std::collections::HashSet;

use crate::dav_url::DavUrl;
use crate::model::{ContentTypes, DavCollection, DavItem, Privilege};
use crate::protocol::Protocol;
use parser::RawResponse;

/// Project one `<response>` into a `DavCollection`, resolving its href against
/// `request_url` (§4.7). Returns `None` for responses without a 200 propstat — callers
/// should simply skip those rather than treat them as errors (a mix of 200 and 404
/// propstats in one multistatus body is normal when properties are missing).
pub fn project_collection(
    raw: &RawResponse,
    request_url: &DavUrl,
) -> Result<Option<DavCollection>, crate::error::DavError> {
    if !raw.has_ok_propstat() {
        return Ok(None);
    }

    let resolved = request_url.resolve(&raw.href)?;
    let resolved = if resolved.path().ends_with('/') {
        resolved
    } else {
        DavUrl::parse(&format!("{resolved}/"), resolved.protocol())?
    };

    let display_name = match &raw.displayname {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("DAV collection at {resolved}"),
    };

    let mut content_types = ContentTypes::NONE;
    if raw.is_calendar {
        content_types.insert(ContentTypes::CALENDAR);
    }
    if raw.is_addressbook {
        content_types.insert(ContentTypes::CONTACTS);
    }
    if request_url.protocol() == Protocol::CalDav {
        if raw.supported_components.is_empty() && raw.is_calendar {
            content_types.insert(ContentTypes::EVENTS);
        }
        for comp in &raw.supported_components {
            match comp.as_str() {
                "VEVENT" => content_types.insert(ContentTypes::EVENTS),
                "VTODO" => content_types.insert(ContentTypes::TODOS),
                "VJOURNAL" => content_types.insert(ContentTypes::JOURNAL),
                "VFREEBUSY" => content_types.insert(ContentTypes::FREE_BUSY),
                _ => {}
            }
        }
    }

    let privileges: HashSet<Privilege> = raw
        .privileges
        .iter()
        .map(|p| Privilege::from_local_name(p))
        .collect();

    Ok(Some(DavCollection {
        url: resolved,
        display_name,
        content_types,
        ctag: raw.ctag.clone(),
        privileges,
    }))
}

/// Project one `<response>` from an item-list query into a bare `DavItem` (href + etag
/// only — §4.6). Collections are filtered out by the caller before this is reached.
pub fn project_item_stub(
    raw: &RawResponse,
    request_url: &DavUrl,
) -> Result<Option<DavItem>, crate::error::DavError> {
    if !raw.has_ok_propstat() || raw.is_collection {
        return Ok(None);
    }
    let resolved = request_url.resolve(&raw.href)?;
    Ok(Some(DavItem::new(
        resolved.to_string(),
        raw.etag.clone().unwrap_or_default(),
    )))
}

/// Project one `<response>` from a multiget REPORT into a full `DavItem` (§4.9). Returns
/// `None` when the response lacks either an etag or a payload — the caller keeps the URL
/// in its list with no payload so it can fall back to a single fetch.
pub fn project_item_full(
    raw: &RawResponse,
    request_url: &DavUrl,
    content_type: &str,
) -> Result<Option<DavItem>, crate::error::DavError> {
    let (Some(etag), Some(data)) = (&raw.etag, &raw.item_data) else {
        return Ok(None);
    };
    let resolved = request_url.resolve(&raw.href)?;
    Ok(Some(DavItem {
        url: resolved.to_string(),
        content_type: content_type.to_string(),
        payload: data.clone().into_bytes(),
        etag: etag.clone(),
    }))
}
