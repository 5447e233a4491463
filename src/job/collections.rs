//! Collections fetch jobs (§4.4, §4.5).

use std::collections::HashSet;

use crate::dav_url::DavUrl;
use crate::error::DavError;
use crate::job::{principal, JobContext};
use crate::model::DavCollection;
use crate::transport::{Depth, HttpRequest, Method};
use crate::xml::parser::parse_multistatus;
use crate::xml::project_collection;

/// A collection paired with the home-set URL it was discovered under, so callers can
/// emit `collectionDiscovered(protocol, url, originHomesetUrl)` faithfully (§4.4 step 3).
#[derive(Debug, Clone)]
pub struct DiscoveredCollection {
    pub collection: DavCollection,
    pub origin_home_set_url: DavUrl,
}

async fn propfind_collections(
    ctx: &JobContext,
    home_set: &DavUrl,
) -> Result<Vec<DiscoveredCollection>, DavError> {
    let descriptor = ctx.protocols.get(home_set.protocol());
    let request = HttpRequest::new(Method::Propfind, home_set.uri().clone())
        .with_depth(Depth::One)
        .with_body(descriptor.collection_query_body(), "text/xml; charset=utf-8");

    let response = ctx
        .http
        .request(request)
        .await
        .map_err(DavError::from_http)?;

    if !response.is_success() {
        return Err(DavError::new(
            crate::error::ErrorKind::ProblemWithRequest,
            response.status,
            "collection PROPFIND failed",
            String::new(),
        ));
    }

    let raws = parse_multistatus(&response.body)?;
    let mut found = Vec::with_capacity(raws.len());
    for raw in &raws {
        if let Some(collection) = project_collection(raw, home_set)? {
            found.push(DiscoveredCollection {
                collection,
                origin_home_set_url: home_set.clone(),
            });
        }
    }
    Ok(found)
}

/// Discover every collection reachable from `url` (§4.4): resolve home-sets if the
/// protocol supports principals, falling back to treating `url` itself as a collection
/// container when principal discovery comes back empty or fails with an HTTP status; then
/// PROPFIND each home-set and project the results, deduped by URL.
pub async fn fetch_collections(
    ctx: &JobContext,
    url: &DavUrl,
) -> Result<Vec<DiscoveredCollection>, DavError> {
    tracing::debug!(url = %url, "fetching collections");
    let descriptor = ctx.protocols.get(url.protocol());

    let home_sets = if descriptor.supports_principals {
        match principal::fetch_home_sets(ctx, url).await {
            Ok(sets) if !sets.is_empty() => sets,
            Ok(_) => {
                tracing::warn!(url = %url, "principal fetch returned no home-sets, retrying as collection URL");
                vec![url.clone()]
            }
            Err(e) if e.response_code != 0 => {
                tracing::warn!(url = %url, error = %e, "principal fetch failed with a status, retrying as collection URL");
                vec![url.clone()]
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "principal fetch failed fatally");
                return Err(e);
            }
        }
    } else {
        vec![url.clone()]
    };

    let futures = home_sets.iter().map(|home_set| propfind_collections(ctx, home_set));
    let results = futures::future::join_all(futures).await;

    let mut discovered = Vec::new();
    let mut seen = HashSet::new();
    let mut first_error = None;
    for result in results {
        match result {
            Ok(found) => {
                for item in found {
                    if seen.insert(item.collection.url.to_string()) {
                        discovered.push(item);
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "collection fetch failed for one home-set");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if discovered.is_empty() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }
    Ok(discovered)
}

/// Fan out `fetch_collections` over every configured remote URL (§4.5). A failure in one
/// URL never cancels the others; the aggregated error (if every URL failed) is the first
/// one observed, and successful collections are unioned, deduped by URL.
pub async fn fetch_collections_multi(
    ctx: &JobContext,
    urls: &[DavUrl],
) -> Result<Vec<DiscoveredCollection>, DavError> {
    let futures = urls.iter().map(|url| fetch_collections(ctx, url));
    let results = futures::future::join_all(futures).await;

    let mut discovered = Vec::new();
    let mut seen = HashSet::new();
    let mut first_error = None;
    for result in results {
        match result {
            Ok(found) => {
                for item in found {
                    if seen.insert(item.collection.url.to_string()) {
                        discovered.push(item);
                    }
                }
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if discovered.is_empty() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }
    Ok(discovered)
}
