//! Generic `multistatus` walker (§9 "XML querying"): a streaming `quick-xml` pull parser,
//! namespace-agnostic (matches on local name only, exactly as the teacher's
//! `caldav::streaming`/`carddav::streaming` modules do), generalized to serve any of the
//! three protocols by collecting every field any of them might need into one `RawResponse`
//! per `<response>` element.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{DavError, ErrorKind};

/// Everything the projection in §4.7 might read off one `<response>` element, before it is
/// turned into a `DavCollection` or `DavItem`. Fields unused by a given protocol are simply
/// left at their default. Populated only from the first `<propstat>` whose `<status>`
/// contains `200` (§4.7 point 1); properties under any other propstat (e.g. a `404` for a
/// property the server doesn't have) are discarded.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub href: String,
    pub status: Option<String>,
    pub displayname: Option<String>,
    pub etag: Option<String>,
    pub is_collection: bool,
    pub is_calendar: bool,
    pub is_addressbook: bool,
    pub supported_components: Vec<String>,
    pub ctag: Option<String>,
    pub item_data: Option<String>,
    pub home_set: Vec<String>,
    pub current_user_principal: Vec<String>,
    pub privileges: Vec<String>,
}

impl RawResponse {
    /// `true` if this response had a `<propstat>` whose `<status>` contained `200`.
    pub fn has_ok_propstat(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.contains("200"))
            .unwrap_or(false)
    }
}

/// Scratch buffer for one `<propstat>` block, merged into the enclosing `RawResponse` only
/// if its status turns out to contain `200` (§4.7 point 1: "select the propstat whose
/// status contains HTTP code 200 (first match)").
#[derive(Debug, Clone, Default)]
struct PropstatBuffer {
    status: Option<String>,
    displayname: Option<String>,
    etag: Option<String>,
    is_collection: bool,
    is_calendar: bool,
    is_addressbook: bool,
    supported_components: Vec<String>,
    ctag: Option<String>,
    item_data: Option<String>,
    home_set: Vec<String>,
    current_user_principal: Vec<String>,
    privileges: Vec<String>,
}

impl PropstatBuffer {
    fn is_ok(&self) -> bool {
        self.status.as_deref().map(|s| s.contains("200")).unwrap_or(false)
    }

    fn merge_into(self, response: &mut RawResponse) {
        response.status = self.status;
        response.displayname = self.displayname;
        response.etag = self.etag;
        response.is_collection = self.is_collection;
        response.is_calendar = self.is_calendar;
        response.is_addressbook = self.is_addressbook;
        response.supported_components = self.supported_components;
        response.ctag = self.ctag;
        response.item_data = self.item_data;
        response.home_set = self.home_set;
        response.current_user_principal = self.current_user_principal;
        response.privileges = self.privileges;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum El {
    Multistatus,
    Response,
    Propstat,
    Prop,
    Href,
    Status,
    Displayname,
    Getetag,
    Resourcetype,
    Collection,
    Calendar,
    Addressbook,
    SupportedCalendarComponentSet,
    Comp,
    CalendarData,
    AddressData,
    Getctag,
    HomeSet,
    CurrentUserPrincipal,
    CurrentUserPrivilegeSet,
    Privilege,
    Other,
}

fn local_name(raw: &[u8]) -> String {
    let s = std::str::from_utf8(raw).unwrap_or_default();
    match s.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => s.to_string(),
    }
}

fn classify(raw: &[u8]) -> El {
    match local_name(raw).as_str() {
        "multistatus" => El::Multistatus,
        "response" => El::Response,
        "propstat" => El::Propstat,
        "prop" => El::Prop,
        "href" => El::Href,
        "status" => El::Status,
        "displayname" => El::Displayname,
        "getetag" => El::Getetag,
        "resourcetype" => El::Resourcetype,
        "collection" => El::Collection,
        "calendar" => El::Calendar,
        "addressbook" => El::Addressbook,
        "supported-calendar-component-set" => El::SupportedCalendarComponentSet,
        "comp" => El::Comp,
        "calendar-data" => El::CalendarData,
        "address-data" => El::AddressData,
        "getctag" => El::Getctag,
        "calendar-home-set" | "addressbook-home-set" => El::HomeSet,
        "current-user-principal" => El::CurrentUserPrincipal,
        "current-user-privilege-set" => El::CurrentUserPrivilegeSet,
        "privilege" => El::Privilege,
        _ => El::Other,
    }
}

fn attr_value(e: &quick_xml::events::BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if local_name(a.key.as_ref()) == name {
            a.unescape_value().ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// Parse a `multistatus` body into one `RawResponse` per `<response>` element.
///
/// Validates that the document's root element is, by local name, `multistatus`
/// (case-insensitively), per §4.4 step 3; any other root is a `CollectionFetch` error
/// rather than `MalformedResponse`, since the body parsed fine — it just wasn't a
/// multistatus reply.
pub fn parse_multistatus(body: &[u8]) -> Result<Vec<RawResponse>, DavError> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<El> = Vec::new();
    let mut responses = Vec::new();
    let mut current = RawResponse::default();
    let mut committed_ok_propstat = false;
    let mut propstat: Option<PropstatBuffer> = None;
    let mut in_privilege = false;
    let mut text_buf = String::new();
    let mut seen_root = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(|e| {
            DavError::new(
                ErrorKind::MalformedResponse,
                0,
                "malformed XML in multistatus response",
                e.to_string(),
            )
        })? {
            Event::Eof => break,
            Event::Start(e) => {
                let el = classify(e.name().as_ref());
                if !seen_root {
                    seen_root = true;
                    if el != El::Multistatus {
                        return Err(DavError::without_response(
                            ErrorKind::CollectionFetch,
                            "root element of response is not multistatus",
                        ));
                    }
                }
                if el == El::Propstat {
                    propstat = Some(PropstatBuffer::default());
                }
                if el == El::Comp {
                    if let Some(name) = attr_value(&e, "name") {
                        if let Some(p) = propstat.as_mut() {
                            p.supported_components.push(name);
                        }
                    }
                }
                if in_privilege {
                    if let Some(p) = propstat.as_mut() {
                        p.privileges.push(local_name(e.name().as_ref()));
                    }
                }
                if el == El::Privilege {
                    in_privilege = true;
                }
                stack.push(el);
                text_buf.clear();
            }
            Event::Empty(e) => {
                let el = classify(e.name().as_ref());
                if !seen_root {
                    seen_root = true;
                    if el != El::Multistatus {
                        return Err(DavError::without_response(
                            ErrorKind::CollectionFetch,
                            "root element of response is not multistatus",
                        ));
                    }
                }
                match el {
                    El::Collection => {
                        if let Some(p) = propstat.as_mut() {
                            p.is_collection = true;
                        }
                    }
                    El::Calendar => {
                        if let Some(p) = propstat.as_mut() {
                            p.is_calendar = true;
                        }
                    }
                    El::Addressbook => {
                        if let Some(p) = propstat.as_mut() {
                            p.is_addressbook = true;
                        }
                    }
                    El::Comp => {
                        if let Some(name) = attr_value(&e, "name") {
                            if let Some(p) = propstat.as_mut() {
                                p.supported_components.push(name);
                            }
                        }
                    }
                    _ => {
                        if in_privilege {
                            if let Some(p) = propstat.as_mut() {
                                p.privileges.push(local_name(e.name().as_ref()));
                            }
                        }
                    }
                }
            }
            Event::Text(t) => {
                text_buf.push_str(&t.unescape().unwrap_or_default());
            }
            Event::CData(c) => {
                text_buf.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::End(_) => {
                let el = stack.pop().unwrap_or(El::Other);
                let text = std::mem::take(&mut text_buf);
                match el {
                    El::Response => {
                        responses.push(std::mem::take(&mut current));
                        committed_ok_propstat = false;
                    }
                    El::Propstat => {
                        if let Some(p) = propstat.take() {
                            if !committed_ok_propstat && p.is_ok() {
                                committed_ok_propstat = true;
                                p.merge_into(&mut current);
                            }
                        }
                    }
                    El::Href => {
                        if stack.last() == Some(&El::Response) && current.href.is_empty() {
                            current.href = text;
                        } else if stack.last() == Some(&El::HomeSet) {
                            if let Some(p) = propstat.as_mut() {
                                p.home_set.push(text);
                            }
                        } else if stack.last() == Some(&El::CurrentUserPrincipal) {
                            if let Some(p) = propstat.as_mut() {
                                p.current_user_principal.push(text);
                            }
                        }
                    }
                    El::Status => {
                        if let Some(p) = propstat.as_mut() {
                            if p.status.is_none() {
                                p.status = Some(text);
                            }
                        }
                    }
                    El::Displayname => {
                        if let Some(p) = propstat.as_mut() {
                            p.displayname = Some(text);
                        }
                    }
                    El::Getetag => {
                        if let Some(p) = propstat.as_mut() {
                            p.etag = Some(text);
                        }
                    }
                    El::Getctag => {
                        if let Some(p) = propstat.as_mut() {
                            p.ctag = Some(text);
                        }
                    }
                    El::CalendarData | El::AddressData => {
                        if let Some(p) = propstat.as_mut() {
                            p.item_data = Some(text);
                        }
                    }
                    El::Collection => {
                        if let Some(p) = propstat.as_mut() {
                            p.is_collection = true;
                        }
                    }
                    El::Calendar => {
                        if let Some(p) = propstat.as_mut() {
                            p.is_calendar = true;
                        }
                    }
                    El::Addressbook => {
                        if let Some(p) = propstat.as_mut() {
                            p.is_addressbook = true;
                        }
                    }
                    El::Privilege => in_privilege = false,
                    _ => {}
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(DavError::without_response(
            ErrorKind::MalformedResponse,
            "empty XML body where a multistatus response was expected",
        ));
    }

    Ok(responses)
}
