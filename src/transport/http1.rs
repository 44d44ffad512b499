//! HTTP/1.1 transport adapter.
//!
//! Sends each exchange over a plain or TLS connection chosen by the endpoint
//! scheme. Connections are not kept idle between exchanges, redirects are returned
//! to the caller as is, and no cookie store is involved: the session owns cookies.

use super::{check_scheme, from_header_map, read_body, to_header_map};
use super::{Exchange, ExchangeRequest, ExchangeResult, ResponseHead, Transport};
use crate::error::Result;
use crate::protocol::constants::headers;
use crate::types::Protocol;
use async_trait::async_trait;

/// HTTP/1.1 adapter backed by a `reqwest` client restricted to HTTP/1.
#[derive(Clone)]
pub struct Http1Transport {
    client: reqwest::Client,
}

impl Http1Transport {
    /// Create the adapter
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .http1_only()
            .pool_max_idle_per_host(0)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Http1Transport { client })
    }
}

#[async_trait]
impl Transport for Http1Transport {
    fn protocol(&self) -> Protocol {
        Protocol::Http1
    }

    fn build(&self, mut request: ExchangeRequest) -> Result<Exchange> {
        check_scheme(&request.endpoint)?;

        let authority = request.endpoint.authority();
        request
            .headers
            .set(headers::HOST, authority)
            .set(headers::CONNECTION, "keep-alive");

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            "built HTTP/1.1 exchange"
        );

        Ok(Exchange {
            request,
            protocol: Protocol::Http1,
        })
    }

    async fn send(&self, exchange: Exchange) -> Result<ExchangeResult> {
        let Exchange { request, .. } = exchange;

        let mut builder = self
            .client
            .request(request.method.into(), request.url())
            .version(http::Version::HTTP_11)
            .headers(to_header_map(&request.headers)?);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let response_headers = from_header_map(response.headers());
        let body = read_body(response).await?;

        tracing::debug!(status, bytes = body.len(), "HTTP/1.1 exchange complete");

        Ok(ExchangeResult {
            request,
            response: ResponseHead {
                status,
                headers: response_headers,
                protocol: Protocol::Http1,
            },
            body,
        })
    }
}
