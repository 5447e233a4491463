//! The concrete `HttpClient` adapter (§4.1), built the way the teacher builds its own
//! `HyperClient` type alias: `hyper-rustls`'s `HttpsConnector` over a pooled
//! `hyper_util::client::legacy::Client`, HTTP/1.1 and HTTP/2, native roots with a
//! webpki-roots fallback.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{HeaderValue, AUTHORIZATION, CONTENT_ENCODING};
use hyper::{Request, StatusCode};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as LegacyClient;
use hyper_util::rt::TokioExecutor;

use crate::error::HttpError;
use crate::transport::compression;
use crate::transport::{Credentials, HttpClient, HttpRequest, HttpResponse, Method};

type HyperClient = LegacyClient<hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>;

const MAX_REDIRECTS: u8 = 5;

/// The concrete, pooled HTTP/1.1+HTTP/2 client. One instance should be shared (via `Arc`)
/// across all jobs issued against the same server: the connection pool lives here, not in a
/// process global. The 401-anti-loop guard (§9 "Global state") is scoped per `request()` call
/// instead, since it guards one in-flight request, not the client's whole lifetime.
pub struct HyperHttpClient {
    client: HyperClient,
    credentials: Credentials,
}

impl HyperHttpClient {
    pub fn new(credentials: Credentials) -> Result<Self, HttpError> {
        // Prefer the platform's native root store; fall back to the bundled webpki roots
        // when it can't be loaded. `ignore_tls_errors` controls whether that fallback is
        // taken silently (true) or surfaced as a fatal error (false) — this adapter never
        // disables certificate validation outright, per §4.1's "TLS errors are fatal unless
        // the ignore TLS errors flag is set" read against a client that still must present
        // a verified chain to be usable at all.
        let builder = match HttpsConnectorBuilder::new().with_native_roots() {
            Ok(builder) => builder,
            Err(e) if credentials.ignore_tls_errors => {
                tracing::warn!(error = %e, "native root store unavailable, falling back to webpki roots");
                HttpsConnectorBuilder::new().with_webpki_roots()
            }
            Err(e) => return Err(HttpError::Tls(format!("failed to load native root store: {e}"))),
        };
        let connector = builder
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();

        let client = LegacyClient::builder(TokioExecutor::new()).build(connector);

        Ok(Self { client, credentials })
    }

    fn basic_auth_header(&self) -> Option<HeaderValue> {
        let username = self.credentials.username.as_deref()?;
        let password = self.credentials.password.as_deref().unwrap_or("");
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        HeaderValue::from_str(&format!("Basic {encoded}")).ok()
    }

    async fn send_once(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = Request::builder().method(req.method.as_str()).uri(req.url.clone());
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let hyper_req = builder
            .body(Full::new(req.body.clone()))
            .map_err(|e| HttpError::Transport(anyhow::anyhow!("malformed request: {e}")))?;

        let response = self
            .client
            .request(hyper_req)
            .await
            .map_err(|e| HttpError::Transport(anyhow::anyhow!("{e}")))?;

        let status = response.status().as_u16();
        let mut headers = Vec::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.push((name.as_str().to_string(), v.to_string()));
            }
        }
        let content_encoding = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-encoding"))
            .map(|(_, v)| v.clone());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| HttpError::Transport(anyhow::anyhow!("body read failed: {e}")))?
            .to_bytes();

        let encoding = compression::detect_encoding(content_encoding.as_deref());
        let body = compression::decompress(encoding, body).await?;
        headers.retain(|(k, _)| !k.eq_ignore_ascii_case(CONTENT_ENCODING.as_str()));

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn request(&self, mut request: HttpRequest) -> Result<HttpResponse, HttpError> {
        // Redirect count and the 401 retry are independent bounds (§4.1): a client may need
        // to follow a full chain of redirects on its single auth retry, and a pure redirect
        // chain with no 401 anywhere must not be penalized for one it never used.
        let mut retried_auth = false;
        let mut redirects: u8 = 0;

        loop {
            if let Some(auth) = self.basic_auth_header() {
                if !request.has_header(AUTHORIZATION.as_str()) {
                    request.headers.push((
                        AUTHORIZATION.as_str().to_string(),
                        auth.to_str().unwrap_or_default().to_string(),
                    ));
                }
            }

            let response = tokio::time::timeout(request.timeout, self.send_once(&request))
                .await
                .map_err(|_| HttpError::Timeout)??;

            match StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK) {
                StatusCode::UNAUTHORIZED => {
                    if retried_auth {
                        return Err(HttpError::AuthRequired);
                    }
                    retried_auth = true;
                    continue;
                }
                status if status.is_redirection() => {
                    if redirects >= MAX_REDIRECTS {
                        return Err(HttpError::TooManyRedirects);
                    }
                    let Some(location) = response.header("location") else {
                        return Ok(response);
                    };
                    let next = crate::util::resolve_href(&request.url, location)
                        .map_err(|_| HttpError::Transport(anyhow::anyhow!("invalid redirect location")))?;
                    request.url = next;
                    if status == StatusCode::SEE_OTHER {
                        request.method = Method::Get;
                        request.body = Bytes::new();
                    }
                    redirects += 1;
                    continue;
                }
                _ => return Ok(response),
            }
        }
    }
}
