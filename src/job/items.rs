//! Item list, fetch, and multiget jobs (§4.6, §4.8, §4.9).

use std::collections::HashSet;

use crate::dav_url::DavUrl;
use crate::error::{DavError, ErrorKind};
use crate::job::JobContext;
use crate::model::DavItem;
use crate::protocol::ItemListMethod;
use crate::transport::{Depth, HttpRequest, Method};
use crate::xml::parser::parse_multistatus;
use crate::xml::{project_item_full, project_item_stub};

/// List the items in a collection (§4.6): run every query in the protocol's item-list set,
/// skip `<response>` elements that are themselves collections, and return one bare
/// `DavItem` (url + etag, no payload) per leaf resource.
pub async fn list_items(ctx: &JobContext, collection: &DavUrl) -> Result<Vec<DavItem>, DavError> {
    tracing::debug!(url = %collection, "listing items");
    let descriptor = ctx.protocols.get(collection.protocol());

    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for query in descriptor.item_list_queries() {
        let method = match query.method {
            ItemListMethod::Report => Method::Report,
            ItemListMethod::Propfind => Method::Propfind,
        };
        let request = HttpRequest::new(method, collection.uri().clone())
            .with_depth(Depth::One)
            .with_body(query.body, "text/xml; charset=utf-8");

        let response = ctx
            .http
            .request(request)
            .await
            .map_err(DavError::from_http)?;

        if !response.is_success() {
            let err = DavError::new(
                ErrorKind::ItemFetch,
                response.status,
                "item list query failed",
                String::new(),
            );
            tracing::error!(url = %collection, error = %err, "item list job failed");
            return Err(err);
        }

        let raws = parse_multistatus(&response.body)?;
        for raw in &raws {
            if let Some(item) = project_item_stub(raw, collection)? {
                if seen.insert(item.url.clone()) {
                    items.push(item);
                }
            }
        }
    }

    Ok(items)
}

/// Fetch one item's payload (§4.8). The server must return an `ETag`; its absence is an
/// `EtagMissing` error rather than a job that silently succeeds with no version marker.
/// Takes a bare `hyper::Uri` rather than a `DavUrl`: per §3's data model, `DavItem.url` is
/// a plain string with no protocol tag, and a GET needs none either.
pub async fn fetch_item(ctx: &JobContext, item_url: &hyper::Uri) -> Result<DavItem, DavError> {
    tracing::debug!(url = %item_url, "fetching item");
    let request = HttpRequest::new(Method::Get, item_url.clone());

    let response = ctx
        .http
        .request(request)
        .await
        .map_err(DavError::from_http)?;

    if !response.is_success() {
        let err = DavError::new(
            ErrorKind::ItemFetch,
            response.status,
            "item GET failed",
            String::new(),
        );
        tracing::error!(url = %item_url, error = %err, "item fetch job failed");
        return Err(err);
    }

    let etag = response.header("etag").ok_or_else(|| {
        let err = DavError::without_response(ErrorKind::EtagMissing, "GET response had no ETag");
        tracing::error!(url = %item_url, error = %err, "item fetch job failed");
        err
    })?;

    Ok(DavItem {
        url: item_url.to_string(),
        content_type: response.header("content-type").unwrap_or_default().to_string(),
        payload: response.body.to_vec(),
        etag: etag.to_string(),
    })
}

/// Fetch many items in one REPORT round trip (§4.9). Items whose response lacks an etag or
/// a payload are simply absent from the returned list — callers fall back to
/// [`fetch_item`] for those URLs.
pub async fn multiget_items(
    ctx: &JobContext,
    collection: &DavUrl,
    item_urls: &[String],
) -> Result<Vec<DavItem>, DavError> {
    tracing::debug!(url = %collection, count = item_urls.len(), "multiget items");
    let descriptor = ctx.protocols.get(collection.protocol());
    if !descriptor.uses_multiget || item_urls.is_empty() {
        return Ok(Vec::new());
    }

    let hrefs: Vec<String> = item_urls
        .iter()
        .map(|u| u.parse::<hyper::Uri>().map(|uri| uri.path().to_string()).unwrap_or_else(|_| u.clone()))
        .collect();
    let body = descriptor.build_multiget(&hrefs);

    let request = HttpRequest::new(Method::Report, collection.uri().clone())
        .with_depth(Depth::One)
        .with_body(body, "text/xml; charset=utf-8");

    let response = ctx
        .http
        .request(request)
        .await
        .map_err(DavError::from_http)?;

    if !response.is_success() {
        let err = DavError::new(
            ErrorKind::ItemFetch,
            response.status,
            "multiget REPORT failed",
            String::new(),
        );
        tracing::error!(url = %collection, error = %err, "multiget job failed");
        return Err(err);
    }

    let raws = parse_multistatus(&response.body)?;
    let mut items = Vec::with_capacity(raws.len());
    for raw in &raws {
        if let Some(item) = project_item_full(raw, collection, descriptor.contacts_mime)? {
            items.push(item);
        }
    }
    Ok(items)
}
