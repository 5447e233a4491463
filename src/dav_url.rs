//! `DavUrl`: an absolute URL tagged with the protocol it was discovered under (§3 entity
//! table). Collections and items carry one of these instead of a bare `hyper::Uri` so a job
//! never has to guess which protocol descriptor (§4.2) governs a resource.

use std::fmt;

use hyper::Uri;

use crate::error::{DavError, ErrorKind};
use crate::protocol::Protocol;
use crate::util::resolve_href;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DavUrl {
    uri: Uri,
    protocol: Protocol,
}

impl DavUrl {
    pub fn new(uri: Uri, protocol: Protocol) -> Result<Self, DavError> {
        if uri.scheme_str() != Some("http") && uri.scheme_str() != Some("https") {
            return Err(DavError::without_response(
                ErrorKind::ProblemWithRequest,
                "DAV URLs must be http or https",
            ));
        }
        if uri.authority().is_none() {
            return Err(DavError::without_response(
                ErrorKind::ProblemWithRequest,
                "DAV URLs must be absolute",
            ));
        }
        Ok(Self { uri, protocol })
    }

    pub fn parse(s: &str, protocol: Protocol) -> Result<Self, DavError> {
        let uri = s.parse::<Uri>().map_err(|e| {
            DavError::new(ErrorKind::ProblemWithRequest, 0, "invalid URL", e.to_string())
        })?;
        Self::new(uri, protocol)
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Resolve an `href` taken from a multistatus response relative to this URL, keeping
    /// this URL's protocol tag (§4.7 point 2).
    pub fn resolve(&self, href: &str) -> Result<DavUrl, DavError> {
        let resolved = resolve_href(&self.uri, href)?;
        DavUrl::new(resolved, self.protocol)
    }

    /// `true` if `other` names the same resource or one nested under it, ignoring query,
    /// fragment and a trailing slash.
    pub fn contains(&self, other: &DavUrl) -> bool {
        crate::util::uri_is_under(&self.uri, &other.uri)
    }
}

impl fmt::Display for DavUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}
