//! Domain and transport error types.
//!
//! `HttpError` lives at the transport boundary (§4.1): it is what a
//! [`crate::transport::HttpClient`] implementation returns. `DavError` lives at the domain
//! boundary (§7): every job and the synchronizer report failures through it, carrying a
//! `kind`, the latest HTTP response code seen (`0` if none), and both a user-facing and an
//! internal message.

use thiserror::Error;

/// Transport-layer failure, surfaced by [`crate::transport::HttpClient::request`].
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request timed out")]
    Timeout,

    #[error("tls error: {0}")]
    Tls(String),

    #[error("authentication required")]
    AuthRequired,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("invalid uri: {0}")]
    InvalidUri(#[from] hyper::http::uri::InvalidUri),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] hyper::header::InvalidHeaderValue),

    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

/// The kinds of failure a DAV job can terminate with.
///
/// `NoError` is never constructed on the `Err` side of a `Result` — it exists so that
/// implementations migrating from a kind-complete enum (one that represents success and
/// failure in the same type) have a home for the "no error" case. This crate's jobs use
/// `Result<T, DavError>`, so `NoError` is unreachable in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoError,
    ProblemWithRequest,
    CollectionFetch,
    CollectionFetchXQuerySetFocus,
    CollectionFetchXQueryInvalid,
    ItemFetch,
    ItemCreate,
    ItemModify,
    ItemDelete,
    Conflict,
    ItemExists,
    EtagMissing,
    AuthRequired,
    TlsError,
    Timeout,
    Cancelled,
    ServerError,
    MalformedResponse,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NoError => "NoError",
            ErrorKind::ProblemWithRequest => "ProblemWithRequest",
            ErrorKind::CollectionFetch => "CollectionFetch",
            ErrorKind::CollectionFetchXQuerySetFocus => "CollectionFetch_XQuerySetFocus",
            ErrorKind::CollectionFetchXQueryInvalid => "CollectionFetch_XQueryInvalid",
            ErrorKind::ItemFetch => "ItemFetch",
            ErrorKind::ItemCreate => "ItemCreate",
            ErrorKind::ItemModify => "ItemModify",
            ErrorKind::ItemDelete => "ItemDelete",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::ItemExists => "ItemExists",
            ErrorKind::EtagMissing => "EtagMissing",
            ErrorKind::AuthRequired => "AuthRequired",
            ErrorKind::TlsError => "TlsError",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::ServerError => "ServerError",
            ErrorKind::MalformedResponse => "MalformedResponse",
        }
    }
}

/// A DAV operation failure: kind, latest HTTP response code (`0` if none was observed),
/// a message safe to show a user, and an internal message for logs/debugging.
#[derive(Debug, Error)]
#[error("{kind:?} (http {response_code}): {message}")]
pub struct DavError {
    pub kind: ErrorKind,
    pub response_code: u16,
    pub message: String,
    pub detail: String,
}

impl DavError {
    pub fn new(
        kind: ErrorKind,
        response_code: u16,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            response_code,
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn without_response(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, 0, message, String::new())
    }

    /// Map a transport failure onto the closest domain `ErrorKind`.
    pub fn from_http(err: HttpError) -> Self {
        match err {
            HttpError::Timeout => {
                Self::without_response(ErrorKind::Timeout, "request timed out")
            }
            HttpError::Tls(detail) => Self::new(ErrorKind::TlsError, 0, "TLS error", detail),
            HttpError::AuthRequired => {
                Self::without_response(ErrorKind::AuthRequired, "authentication required")
            }
            HttpError::TooManyRedirects => {
                Self::without_response(ErrorKind::ProblemWithRequest, "too many redirects")
            }
            other => Self::new(
                ErrorKind::ProblemWithRequest,
                0,
                "request could not be completed",
                other.to_string(),
            ),
        }
    }
}
