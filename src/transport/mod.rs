//! Transport adapters: one request/response exchange per call.
//!
//! An exchange runs in two steps. [`Transport::build`] validates the request and
//! finalises its header collection without touching the network; it fails fast on
//! an unsupported scheme or a caller-supplied reserved header. [`Transport::send`]
//! consumes the pending [`Exchange`], so it resolves at most once, and yields an
//! [`ExchangeResult`] only after the response body has been fully buffered.
//!
//! ```text
//! transport/
//! ├── http1 - HTTP/1.1 over plain or TLS connections
//! └── http2 - HTTP/2, one fresh session per exchange
//! ```
//!
//! Both adapters produce the same result shape so callers stay transport-agnostic.

pub mod http1;
pub mod http2;

pub use http1::Http1Transport;
pub use http2::Http2Transport;

use crate::error::{Result, SessionError};
use crate::protocol::Headers;
use crate::types::{Endpoint, Method, Protocol};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;

/// Everything needed to put one request on the wire.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    /// Server the request goes to
    pub endpoint: Endpoint,
    /// Absolute request path, query included
    pub path: String,
    /// Request method
    pub method: Method,
    /// Encoded body, if any
    pub body: Option<String>,
    /// Header collection
    pub headers: Headers,
}

impl ExchangeRequest {
    /// Absolute URL of the request
    pub fn url(&self) -> String {
        self.endpoint.url_for(&self.path)
    }
}

/// A built exchange that has not been sent yet.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// The finalised request
    pub request: ExchangeRequest,
    /// Protocol the exchange will run over
    pub protocol: Protocol,
}

/// Status and headers of a received response.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    /// Status code
    pub status: u16,
    /// Response headers, multi-valued entries preserved
    pub headers: Headers,
    /// Protocol the response arrived over
    pub protocol: Protocol,
}

/// A completed exchange: request, response head and the full body.
#[derive(Debug, Clone)]
pub struct ExchangeResult {
    /// Request as it went out
    pub request: ExchangeRequest,
    /// Response status and headers
    pub response: ResponseHead,
    /// Full response body
    pub body: Bytes,
}

/// One request/response exchange over a specific protocol.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Protocol this adapter speaks
    fn protocol(&self) -> Protocol;

    /// Validate the request and finalise its headers without any network activity.
    fn build(&self, request: ExchangeRequest) -> Result<Exchange>;

    /// Send a built exchange and buffer the whole response.
    async fn send(&self, exchange: Exchange) -> Result<ExchangeResult>;
}

/// Reject anything but `http` and `https` before a connection is attempted.
pub(crate) fn check_scheme(endpoint: &Endpoint) -> Result<()> {
    match endpoint.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SessionError::UnsupportedScheme(other.to_string())),
    }
}

/// Copy a header collection onto a wire header map.
pub(crate) fn to_header_map(headers: &Headers) -> Result<http::HeaderMap> {
    let mut map = http::HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let header_name =
            http::HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                SessionError::InvalidHeader {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
        let header_value = http::HeaderValue::from_str(value).map_err(|e| {
            SessionError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Copy wire response headers into a header collection, keeping repeats.
pub(crate) fn from_header_map(map: &http::HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        headers.append(
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    headers
}

/// Accumulate response chunks until the stream ends.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<Bytes> {
    let mut stream = response.bytes_stream();
    let mut body = BytesMut::new();
    let mut chunks = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        body.extend_from_slice(&chunk);
        chunks += 1;
    }

    tracing::trace!(chunks, bytes = body.len(), "response body complete");
    Ok(body.freeze())
}
