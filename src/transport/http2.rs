//! HTTP/2 transport adapter.
//!
//! Requests carry their target as the `:path` and `:method` pseudo-headers in the
//! header collection; they are translated back into the request line when the
//! exchange is sent. The response status is read from the `:status` pseudo-header
//! placed at the front of the response collection.
//!
//! Every exchange opens its own HTTP/2 session. Plain `http` endpoints use
//! prior-knowledge h2c, `https` endpoints negotiate h2 through TLS.

use super::{check_scheme, from_header_map, read_body, to_header_map};
use super::{Exchange, ExchangeRequest, ExchangeResult, ResponseHead, Transport};
use crate::error::{Result, SessionError};
use crate::protocol::constants::headers;
use crate::protocol::Headers;
use crate::types::Protocol;
use async_trait::async_trait;

/// HTTP/2 adapter.
#[derive(Debug, Clone, Default)]
pub struct Http2Transport;

impl Http2Transport {
    /// Create the adapter
    pub fn new() -> Self {
        Http2Transport
    }

    fn session_client() -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .http2_prior_knowledge()
            .pool_max_idle_per_host(0)
            .redirect(reqwest::redirect::Policy::none())
            .build()?)
    }
}

/// Split the pseudo-headers off a request collection.
///
/// Returns the method, the path and the remaining regular headers.
pub fn split_pseudo_headers(mut request_headers: Headers) -> Result<(http::Method, String, Headers)> {
    let method = request_headers
        .remove(headers::PSEUDO_METHOD)
        .pop()
        .ok_or_else(|| SessionError::Transport("missing :method pseudo-header".into()))?;
    let path = request_headers
        .remove(headers::PSEUDO_PATH)
        .pop()
        .ok_or_else(|| SessionError::Transport("missing :path pseudo-header".into()))?;
    let method = http::Method::from_bytes(method.as_bytes()).map_err(|e| {
        SessionError::InvalidHeader {
            name: headers::PSEUDO_METHOD.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok((method, path, request_headers))
}

/// Read the numeric status from a response's `:status` pseudo-header.
pub fn status_from_headers(response_headers: &Headers) -> Result<u16> {
    let raw = response_headers
        .get(headers::PSEUDO_STATUS)
        .ok_or_else(|| SessionError::InvalidStatus("missing :status".into()))?;
    raw.trim()
        .parse()
        .map_err(|_| SessionError::InvalidStatus(raw.to_string()))
}

#[async_trait]
impl Transport for Http2Transport {
    fn protocol(&self) -> Protocol {
        Protocol::Http2
    }

    fn build(&self, mut request: ExchangeRequest) -> Result<Exchange> {
        check_scheme(&request.endpoint)?;

        if let Some((name, _)) = request.headers.iter().find(|(n, _)| n.starts_with(':')) {
            return Err(SessionError::ReservedHeader(name.to_string()));
        }

        let path = request.path.clone();
        request
            .headers
            .set(headers::PSEUDO_PATH, path)
            .set(headers::PSEUDO_METHOD, request.method.as_str());

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            "built HTTP/2 exchange"
        );

        Ok(Exchange {
            request,
            protocol: Protocol::Http2,
        })
    }

    async fn send(&self, exchange: Exchange) -> Result<ExchangeResult> {
        let Exchange { request, .. } = exchange;
        let (method, path, regular) = split_pseudo_headers(request.headers.clone())?;

        let client = Self::session_client()?;
        let mut builder = client
            .request(method, request.endpoint.url_for(&path))
            .version(http::Version::HTTP_2)
            .headers(to_header_map(&regular)?);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;

        let mut response_headers = Headers::new();
        response_headers.append(headers::PSEUDO_STATUS, response.status().as_str());
        for (name, value) in from_header_map(response.headers()).iter() {
            response_headers.append(name, value);
        }
        let status = status_from_headers(&response_headers)?;

        let body = read_body(response).await?;

        tracing::debug!(status, bytes = body.len(), "HTTP/2 exchange complete");

        Ok(ExchangeResult {
            request,
            response: ResponseHead {
                status,
                headers: response_headers,
                protocol: Protocol::Http2,
            },
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Endpoint, Method};

    fn request(base: &str, headers: Headers) -> ExchangeRequest {
        ExchangeRequest {
            endpoint: Endpoint::parse(base).unwrap(),
            path: "/blog/wp-json/wp/v2/users/me".to_string(),
            method: Method::Get,
            body: None,
            headers,
        }
    }

    #[test]
    fn test_build_injects_pseudo_headers() {
        let mut headers = Headers::new();
        headers.set("Accept", "*/*");
        let exchange = Http2Transport::new()
            .build(request("https://example.com/blog/", headers))
            .unwrap();

        let headers = &exchange.request.headers;
        assert_eq!(headers.get(":path"), Some("/blog/wp-json/wp/v2/users/me"));
        assert_eq!(headers.get(":method"), Some("GET"));
        assert!(!headers.has("host"));
        assert_eq!(exchange.protocol, Protocol::Http2);
    }

    #[test]
    fn test_build_rejects_reserved_headers() {
        let mut headers = Headers::new();
        headers.set(":authority", "evil.example");
        let err = Http2Transport::new()
            .build(request("https://example.com/", headers))
            .unwrap_err();
        assert!(matches!(err, SessionError::ReservedHeader(name) if name == ":authority"));
    }

    #[test]
    fn test_build_rejects_unknown_scheme() {
        let err = Http2Transport::new()
            .build(request("ws://example.com/", Headers::new()))
            .unwrap_err();
        assert!(matches!(err, SessionError::UnsupportedScheme(_)));
    }

    #[test]
    fn test_split_pseudo_headers() {
        let exchange = Http2Transport::new()
            .build(request("http://example.com/", Headers::new()))
            .unwrap();
        let (method, path, regular) = split_pseudo_headers(exchange.request.headers).unwrap();
        assert_eq!(method, http::Method::GET);
        assert_eq!(path, "/blog/wp-json/wp/v2/users/me");
        assert!(regular.is_empty());
    }

    #[test]
    fn test_split_requires_pseudo_headers() {
        assert!(split_pseudo_headers(Headers::new()).is_err());
    }

    #[test]
    fn test_status_from_headers() {
        let mut headers = Headers::new();
        headers.append(":status", "204").append("server", "nginx");
        assert_eq!(status_from_headers(&headers).unwrap(), 204);

        let mut bad = Headers::new();
        bad.append(":status", "ok");
        assert!(matches!(status_from_headers(&bad), Err(SessionError::InvalidStatus(_))));
        assert!(status_from_headers(&Headers::new()).is_err());
    }

    type Seen = (http::Version, http::Method, String, Option<String>);

    /// Serve a single h2c connection that records the first request it sees.
    async fn h2c_server() -> (u16, tokio::sync::oneshot::Receiver<Seen>) {
        use bytes::Bytes;
        use http_body_util::Full;
        use hyper::body::Incoming;
        use hyper::service::service_fn;
        use hyper_util::rt::{TokioExecutor, TokioIo};
        use std::sync::{Arc, Mutex};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (seen_tx, seen_rx) = tokio::sync::oneshot::channel();
        let seen_tx = Arc::new(Mutex::new(Some(seen_tx)));

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let service = service_fn(move |req: hyper::Request<Incoming>| {
                let cookie = req
                    .headers()
                    .get("cookie")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let seen: Seen = (req.version(), req.method().clone(), req.uri().path().to_string(), cookie);
                if let Some(tx) = seen_tx.lock().unwrap().take() {
                    let _ = tx.send(seen);
                }
                async move {
                    let response = hyper::Response::builder()
                        .status(201)
                        .header("set-cookie", "wp_a=1")
                        .body(Full::new(Bytes::from_static(b"hello")))
                        .unwrap();
                    Ok::<_, std::convert::Infallible>(response)
                }
            });
            let _ = hyper::server::conn::http2::Builder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), service)
                .await;
        });

        (port, seen_rx)
    }

    #[tokio::test]
    async fn test_send_over_h2c() {
        let (port, seen) = h2c_server().await;

        let mut headers = Headers::new();
        headers.set("Accept", "*/*").set("Cookie", "wordpress_logged_in=abc");
        let mut request = request(&format!("http://127.0.0.1:{port}/"), headers);
        request.path = "/x".to_string();

        let transport = Http2Transport::new();
        let exchange = transport.build(request).unwrap();
        let result = transport.send(exchange).await.unwrap();

        let (version, method, path, cookie) = seen.await.unwrap();
        assert_eq!(version, http::Version::HTTP_2);
        assert_eq!(method, http::Method::GET);
        assert_eq!(path, "/x");
        assert_eq!(cookie.as_deref(), Some("wordpress_logged_in=abc"));

        assert_eq!(result.response.status, 201);
        assert_eq!(result.response.protocol, Protocol::Http2);
        let (first_name, first_value) = result.response.headers.iter().next().unwrap();
        assert_eq!((first_name, first_value), (":status", "201"));
        assert_eq!(result.response.headers.get("set-cookie"), Some("wp_a=1"));
        assert_eq!(&result.body[..], b"hello");
        assert_eq!(result.request.headers.get(":path"), Some("/x"));
    }
}
