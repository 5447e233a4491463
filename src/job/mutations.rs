//! Item and collection mutation jobs (§4.10–§4.13): create, modify, delete.

use std::fmt;

use crate::dav_url::DavUrl;
use crate::error::{DavError, ErrorKind};
use crate::job::{items, JobContext};
use crate::model::DavItem;
use crate::transport::{HttpRequest, Method};

/// The fresh server state exposed when a modify/delete hits a `412` (§4.11, §4.12): the
/// caller gets the item as it now stands on the server so a host application can offer a
/// user-visible merge. This crate never merges on its own behalf.
#[derive(Debug, Clone)]
pub struct ConflictInfo {
    pub fresh_item: DavItem,
    pub fresh_response_code: u16,
}

/// Failure mode of a mutation job: either an ordinary `DavError`, or a `Conflict` carrying
/// the fresh item fetched after a `412` (§7: "`412` on modify/delete is `Conflict` carrying
/// the fresh item").
#[derive(Debug)]
pub enum MutationOutcome {
    Failed(DavError),
    Conflict(ConflictInfo),
}

impl From<DavError> for MutationOutcome {
    fn from(e: DavError) -> Self {
        MutationOutcome::Failed(e)
    }
}

impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOutcome::Failed(e) => write!(f, "{e}"),
            MutationOutcome::Conflict(c) => {
                write!(f, "conflict (http {}): fresh etag {}", c.fresh_response_code, c.fresh_item.etag)
            }
        }
    }
}

impl std::error::Error for MutationOutcome {}

/// Create a new item (§4.10). Sends `If-None-Match: *` so the server refuses to overwrite
/// an existing resource at that URL. A `412` response means the URL is already taken —
/// surfaced as `ItemExists`, never retried.
pub async fn create_item(ctx: &JobContext, item: &DavItem) -> Result<DavItem, MutationOutcome> {
    tracing::debug!(url = %item.url, "creating item");
    let url = item.url.parse::<hyper::Uri>().map_err(|e| {
        DavError::new(ErrorKind::ItemCreate, 0, "invalid item URL", e.to_string())
    })?;

    let request = HttpRequest::new(Method::Put, url.clone())
        .with_header("If-None-Match", "*")
        .with_body(item.payload.clone(), &item.content_type);

    let response = ctx.http.request(request).await.map_err(DavError::from_http)?;

    if response.status == 412 {
        let err = DavError::without_response(ErrorKind::ItemExists, "item already exists at this URL");
        tracing::error!(url = %item.url, error = %err, "item create job failed");
        return Err(err.into());
    }
    if !response.is_success() {
        let err = DavError::new(ErrorKind::ItemCreate, response.status, "item create failed", String::new());
        tracing::error!(url = %item.url, error = %err, "item create job failed");
        return Err(err.into());
    }

    let resolved_url = match response.header("location") {
        Some(location) => crate::util::resolve_href(&url, location)?,
        None => url.clone(),
    };

    let etag = match response.header("etag") {
        Some(etag) => etag.to_string(),
        None => {
            tracing::warn!(url = %resolved_url, "create response had no ETag, following up with a fetch");
            items::fetch_item(ctx, &resolved_url).await?.etag
        }
    };

    Ok(DavItem {
        url: resolved_url.to_string(),
        content_type: item.content_type.clone(),
        payload: item.payload.clone(),
        etag,
    })
}

/// Modify an existing item (§4.11). Sends `If-Match: <etag>`; on `412` fetches the fresh
/// server state and fails with `Conflict` rather than guessing how to reconcile.
pub async fn modify_item(ctx: &JobContext, item: &DavItem) -> Result<DavItem, MutationOutcome> {
    tracing::debug!(url = %item.url, "modifying item");
    let url = item.url.parse::<hyper::Uri>().map_err(|e| {
        DavError::new(ErrorKind::ItemModify, 0, "invalid item URL", e.to_string())
    })?;

    let request = HttpRequest::new(Method::Put, url.clone())
        .with_header("If-Match", item.etag.clone())
        .with_body(item.payload.clone(), &item.content_type);

    let response = ctx.http.request(request).await.map_err(DavError::from_http)?;

    if response.status == 412 {
        return Err(conflict_after_fetch(ctx, &url, item, 412).await);
    }
    if !response.is_success() {
        let err = DavError::new(ErrorKind::ItemModify, response.status, "item modify failed", String::new());
        tracing::error!(url = %item.url, error = %err, "item modify job failed");
        return Err(err.into());
    }

    let etag = match response.header("etag") {
        Some(etag) => etag.to_string(),
        None => {
            tracing::warn!(url = %item.url, "modify response had no ETag, following up with a fetch");
            items::fetch_item(ctx, &url).await?.etag
        }
    };

    Ok(DavItem {
        url: item.url.clone(),
        content_type: item.content_type.clone(),
        payload: item.payload.clone(),
        etag,
    })
}

/// Delete an item (§4.12). `204`/`200` and `404` (already gone) are both success; `412`
/// takes the same conflict-fetch path as [`modify_item`].
pub async fn delete_item(ctx: &JobContext, item: &DavItem) -> Result<(), MutationOutcome> {
    tracing::debug!(url = %item.url, "deleting item");
    let url = item.url.parse::<hyper::Uri>().map_err(|e| {
        DavError::new(ErrorKind::ItemDelete, 0, "invalid item URL", e.to_string())
    })?;

    let request = HttpRequest::new(Method::Delete, url.clone())
        .with_header("If-Match", item.etag.clone());

    let response = ctx.http.request(request).await.map_err(DavError::from_http)?;

    match response.status {
        200 | 204 | 404 => Ok(()),
        412 => Err(conflict_after_fetch(ctx, &url, item, 412).await),
        status => {
            let err = DavError::new(ErrorKind::ItemDelete, status, "item delete failed", String::new());
            tracing::error!(url = %item.url, error = %err, "item delete job failed");
            Err(err.into())
        }
    }
}

/// Delete an entire collection (§4.13). No precondition header; `204`/`200` ⇒ success.
pub async fn delete_collection(ctx: &JobContext, collection: &DavUrl) -> Result<(), DavError> {
    tracing::debug!(url = %collection, "deleting collection");
    let request = HttpRequest::new(Method::Delete, collection.uri().clone());
    let response = ctx.http.request(request).await.map_err(DavError::from_http)?;

    match response.status {
        200 | 204 => Ok(()),
        status => {
            let err = DavError::new(ErrorKind::ItemDelete, status, "collection delete failed", String::new());
            tracing::error!(url = %collection, error = %err, "collection delete job failed");
            Err(err)
        }
    }
}

async fn conflict_after_fetch(
    ctx: &JobContext,
    url: &hyper::Uri,
    item: &DavItem,
    response_code: u16,
) -> MutationOutcome {
    tracing::warn!(url = %item.url, "precondition failed, fetching fresh item for conflict report");
    match items::fetch_item(ctx, url).await {
        Ok(fresh_item) => MutationOutcome::Conflict(ConflictInfo {
            fresh_item,
            fresh_response_code: response_code,
        }),
        Err(e) => e.into(),
    }
}
