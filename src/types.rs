//! Core value types: endpoints, methods, bodies, settings and operation results.

use crate::error::{Result, SessionError};
use crate::transport::{ExchangeRequest, ResponseHead};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use url::Url;

/// Where the server lives: scheme, host, optional port and path prefix.
///
/// Parsed once from the base URL. The session only replaces it when settings
/// retrieval reports a canonical API root.
///
/// # Examples
///
/// ```
/// use wp_session_http::Endpoint;
///
/// let endpoint = Endpoint::parse("https://example.com:8443/blog/").unwrap();
/// assert_eq!(endpoint.scheme(), "https");
/// assert_eq!(endpoint.authority(), "example.com:8443");
/// assert_eq!(endpoint.path_prefix(), "/blog/");
/// assert_eq!(endpoint.to_string(), "https://example.com:8443/blog/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
    port: Option<u16>,
    path_prefix: String,
}

impl Endpoint {
    /// Parse a base URL
    pub fn parse(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)?;
        Self::from_url(&url)
    }

    /// Build from an already parsed URL; the query and fragment are ignored
    pub fn from_url(url: &Url) -> Result<Self> {
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(SessionError::InvalidUrl(url::ParseError::EmptyHost))?;

        Ok(Endpoint {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            port: url.port(),
            path_prefix: url.path().to_string(),
        })
    }

    /// URL scheme, lower-cased
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name or address literal
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, `None` when the scheme default applies
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Path prefix every request path is joined onto
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// `host[:port]`, as sent in the `Host` header
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// `scheme://host[:port]`
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.authority())
    }

    /// Absolute URL for an already joined request path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.origin(), path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin(), self.path_prefix)
    }
}

/// Request method.
///
/// The session issues `GET` and `POST`; `PUT` is passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    #[default]
    Post,
    /// `PUT`
    Put,
}

impl Method {
    /// Upper-case method token
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
        }
    }
}

/// HTTP protocol version an exchange runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// HTTP/1.1
    Http1,
    /// HTTP/2
    Http2,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http1 => f.write_str("HTTP/1.1"),
            Protocol::Http2 => f.write_str("HTTP/2"),
        }
    }
}

/// Request body: form fields to url-encode, or an already encoded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Fields encoded as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// Passed through as is
    Raw(String),
}

impl RequestBody {
    /// Build a form body from name/value pairs
    pub fn form<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Wire form of the body.
    ///
    /// ```
    /// use wp_session_http::RequestBody;
    ///
    /// let body = RequestBody::form([("log", "admin"), ("pwd", "p&ss word")]);
    /// assert_eq!(body.encode(), "log=admin&pwd=p%26ss+word");
    /// ```
    pub fn encode(&self) -> String {
        match self {
            RequestBody::Form(fields) => url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(fields)
                .finish(),
            RequestBody::Raw(raw) => raw.clone(),
        }
    }
}

impl From<String> for RequestBody {
    fn from(raw: String) -> Self {
        RequestBody::Raw(raw)
    }
}

impl From<&str> for RequestBody {
    fn from(raw: &str) -> Self {
        RequestBody::Raw(raw.to_string())
    }
}

/// Settings block scraped from the admin page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedSettings {
    /// Canonical API root URL
    pub root: String,
    /// Request-forgery token for API calls
    pub nonce: String,
    /// API namespace and version, e.g. `wp/v2/`
    pub version_string: String,
}

/// API settings held by an authenticated session.
///
/// Only ever stored as a whole record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Canonical API root URL
    pub root: String,
    /// Request-forgery token for API calls
    pub nonce: String,
    /// API namespace and version, e.g. `wp/v2/`
    pub version_string: String,
    /// Route prefix API calls are addressed through
    pub gateway: String,
}

/// One API call, built fluently.
///
/// Defaults: `POST`, no parameters, authentication required.
///
/// # Examples
///
/// ```
/// use wp_session_http::{ApiCall, Method};
///
/// let call = ApiCall::new("posts")
///     .with_method(Method::Get)
///     .with_params([("per_page", "5")]);
/// assert_eq!(call.method, Method::Get);
/// assert!(call.use_auth);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    /// Route relative to the API version, e.g. `users/me`
    pub endpoint: String,
    /// Request body
    pub params: Option<RequestBody>,
    /// Request method
    pub method: Method,
    /// Whether the session cookies and nonce are sent
    pub use_auth: bool,
}

impl ApiCall {
    /// Call `endpoint` with the defaults
    pub fn new(endpoint: impl Into<String>) -> Self {
        ApiCall {
            endpoint: endpoint.into(),
            params: None,
            method: Method::Post,
            use_auth: true,
        }
    }

    /// Send form parameters
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params = Some(RequestBody::form(params));
        self
    }

    /// Send a pre-encoded body
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.params = Some(body.into());
        self
    }

    /// Use another method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Send without session cookies or nonce
    pub fn without_auth(mut self) -> Self {
        self.use_auth = false;
        self
    }
}

/// Result of an API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Request as it went out
    pub request: ExchangeRequest,
    /// Response status line and headers
    pub response: ResponseHead,
    /// Status code
    pub status: u16,
    /// Full response body
    pub body: Bytes,
}

impl ApiResponse {
    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Result of a completed login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Final login request (the HTTP/2 resend when an upgrade happened)
    pub request: ExchangeRequest,
    /// Final login response
    pub response: ResponseHead,
    /// Status of the final login response
    pub status: u16,
    /// Session cookies now held by the session
    pub cookies: Vec<String>,
    /// Settings retrieved right after login
    pub settings: ApiSettings,
}
