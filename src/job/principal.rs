//! Principal → home-set fetch (§4.3).

use crate::dav_url::DavUrl;
use crate::error::{DavError, ErrorKind};
use crate::job::JobContext;
use crate::transport::{Depth, HttpRequest, Method};
use crate::xml::parser::parse_multistatus;

/// PROPFIND the protocol's home-set property (plus `current-user-principal`) on a URL
/// believed to be a principal URL. Returns the home-set hrefs resolved against
/// `principal_url`. Errors carry the HTTP status when one was observed, so the caller
/// (§4.4) can tell a real failure from "this wasn't a principal URL after all".
pub async fn fetch_home_sets(
    ctx: &JobContext,
    principal_url: &DavUrl,
) -> Result<Vec<DavUrl>, DavError> {
    tracing::debug!(url = %principal_url, "fetching principal home-sets");

    let descriptor = ctx.protocols.get(principal_url.protocol());
    if !descriptor.supports_principals {
        return Ok(Vec::new());
    }

    let body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:{ns}">
  <D:prop>
    <D:current-user-principal/>
    <C:{home_set}/>
  </D:prop>
</D:propfind>"#,
        ns = if principal_url.protocol() == crate::protocol::Protocol::CardDav {
            "carddav"
        } else {
            "caldav"
        },
        home_set = descriptor.home_set_local_name,
    );

    let request = HttpRequest::new(Method::Propfind, principal_url.uri().clone())
        .with_depth(Depth::Zero)
        .with_body(body, "text/xml; charset=utf-8");

    let response = ctx
        .http
        .request(request)
        .await
        .map_err(DavError::from_http)?;

    if !response.is_success() {
        return Err(DavError::new(
            ErrorKind::ProblemWithRequest,
            response.status,
            "principal property fetch failed",
            String::new(),
        ));
    }

    let raws = parse_multistatus(&response.body)?;
    let mut home_sets = Vec::new();
    for raw in &raws {
        for href in &raw.home_set {
            home_sets.push(principal_url.resolve(href)?);
        }
    }
    Ok(home_sets)
}
