//! The pluggable HTTP client boundary (§4.1, §6). Everything above this module is
//! transport-agnostic: it talks to `dyn HttpClient`, never to `hyper` directly.

pub mod compression;
pub mod hyper_client;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::Uri;

use crate::error::HttpError;

pub use hyper_client::HyperHttpClient;

/// HTTP method a job issues. WebDAV/DAV-extension verbs sit alongside the ordinary ones
/// (§6 wire formats).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Delete,
    Propfind,
    Report,
    Proppatch,
    Mkcol,
    Mkcalendar,
    Copy,
    Move,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Propfind => "PROPFIND",
            Method::Report => "REPORT",
            Method::Proppatch => "PROPPATCH",
            Method::Mkcol => "MKCOL",
            Method::Mkcalendar => "MKCALENDAR",
            Method::Copy => "COPY",
            Method::Move => "MOVE",
        }
    }
}

/// `Depth` header value (§6): `0`, `1`, or `infinity`, encoded as the integer sentinel `2`
/// per §6's "the literal string infinity (encoded by the integer sentinel 2)".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Zero,
    One,
    Infinity,
}

impl Depth {
    pub fn header_value(self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
            Depth::Infinity => "infinity",
        }
    }
}

/// A fully-formed outgoing request. `headers` is a case-insensitive multimap (§4.1): names
/// repeat in request order, nothing is collapsed on insert.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Uri,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub timeout: std::time::Duration,
}

impl HttpRequest {
    pub fn new(method: Method, url: Uri) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: Bytes::new(),
            timeout: std::time::Duration::from_secs(30),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>, content_type: &str) -> Self {
        self.body = body.into();
        self.headers
            .push(("Content-Type".to_string(), content_type.to_string()));
        self
    }

    pub fn with_depth(self, depth: Depth) -> Self {
        self.with_header("Depth", depth.header_value())
    }

    /// First value for a case-insensitively matched header name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `true` if a header with this name (case-insensitive) is already present.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

/// A completed response: status, case-insensitive header multimap, and body bytes.
/// No body parsing happens at this layer (§4.1).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpResponse {
    /// First value for a case-insensitively matched header name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values for a case-insensitively matched header name, in the order received —
    /// e.g. multiple `WWW-Authenticate` challenges or `Set-Cookie` headers.
    pub fn header_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Basic-auth credentials plus the TLS-error policy (§2.1 configuration, §6 "Credential
/// source").
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub ignore_tls_errors: bool,
}

/// The transport boundary. `HyperHttpClient` is the concrete adapter (§4.1); tests
/// substitute a hand-rolled mock so domain logic never depends on real sockets.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}
