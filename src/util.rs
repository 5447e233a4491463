//! Small shared helpers: XML escaping and href/URI resolution (§4.7 point 2).

use hyper::Uri;

use crate::error::{DavError, ErrorKind};

/// Escape text for inclusion in an XML element body or attribute value.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolve an `href` found in a multistatus response against the URI the request was sent
/// to (§4.7 point 2, SPEC_FULL.md §8). A leading `/` replaces the path (and drops any
/// query) of the request URI, inheriting its authority (and therefore its userinfo)
/// unchanged; anything else is parsed as an absolute URI in its own right, and if `base`
/// carries userinfo that the absolute `href` didn't specify one of its own, it is copied
/// forward onto the result.
pub fn resolve_href(base: &Uri, href: &str) -> Result<Uri, DavError> {
    if href.is_empty() {
        return Err(DavError::without_response(
            ErrorKind::MalformedResponse,
            "empty href in multistatus response",
        ));
    }

    if let Some(path) = href.strip_prefix('/') {
        let authority = base.authority().ok_or_else(|| {
            DavError::without_response(ErrorKind::MalformedResponse, "base URI has no authority")
        })?;
        let scheme = base.scheme_str().unwrap_or("https");
        let built = format!("{scheme}://{authority}/{path}");
        return Uri::try_from(built).map_err(|e| {
            DavError::new(
                ErrorKind::MalformedResponse,
                0,
                "malformed href in multistatus response",
                e.to_string(),
            )
        });
    }

    let absolute = href.parse::<Uri>().map_err(|e| {
        DavError::new(
            ErrorKind::MalformedResponse,
            0,
            "malformed href in multistatus response",
            e.to_string(),
        )
    })?;
    inherit_userinfo(base, absolute)
}

/// The userinfo component (`user[:pass]`) of a URI authority, if any.
fn authority_userinfo(authority: &str) -> Option<&str> {
    authority.split_once('@').map(|(userinfo, _)| userinfo)
}

/// If `base` carries userinfo and `target`'s authority doesn't already have its own, copy
/// `base`'s userinfo onto `target`. Otherwise `target` is returned unchanged.
fn inherit_userinfo(base: &Uri, target: Uri) -> Result<Uri, DavError> {
    let Some(base_userinfo) = base.authority().and_then(|a| authority_userinfo(a.as_str())) else {
        return Ok(target);
    };
    let Some(target_authority) = target.authority().map(|a| a.as_str()) else {
        return Ok(target);
    };
    if authority_userinfo(target_authority).is_some() {
        return Ok(target);
    }

    let scheme = target.scheme_str().unwrap_or("https");
    let path_and_query = target.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let rebuilt = format!("{scheme}://{base_userinfo}@{target_authority}{path_and_query}");
    rebuilt.parse::<Uri>().map_err(|e| {
        DavError::new(
            ErrorKind::MalformedResponse,
            0,
            "malformed href in multistatus response",
            e.to_string(),
        )
    })
}

/// `true` if `child` names the same resource as `parent` or a resource nested under it,
/// compared on scheme+authority+path only (query/fragment and trailing slashes ignored).
pub fn uri_is_under(parent: &Uri, child: &Uri) -> bool {
    if parent.scheme_str() != child.scheme_str() || parent.authority() != child.authority() {
        return false;
    }
    let p = parent.path().trim_end_matches('/');
    let c = child.path().trim_end_matches('/');
    c == p || c.starts_with(&format!("{p}/"))
}
