//! Session manager: login, settings retrieval and authenticated API calls.
//!
//! # Lifecycle
//!
//! ```text
//! Unauthenticated ──login──▶ Authenticated (no settings) ──settings──▶ Ready
//!                                      ▲                                 │
//!                                      └──── failed settings retrieval ◀─┘ (retry get_api_settings)
//! ```
//!
//! Login always chains settings retrieval, so a successful [`WpSession::login`]
//! leaves the session ready. There is no logout.
//!
//! # Protocol selection
//!
//! Exchanges start on HTTP/1.1. When any response carries an HTTP/2 upgrade
//! signal the session switches to the HTTP/2 adapter for good; a login whose
//! response carried the signal is sent once more over HTTP/2.
//!
//! # Examples
//!
//! ```ignore
//! use wp_session_http::{ApiCall, Method, WpSession};
//!
//! #[tokio::main]
//! async fn main() -> wp_session_http::Result<()> {
//!     let mut session = WpSession::new("https://example.com/blog/")?;
//!     session.login("admin", "secret").await?;
//!
//!     let me = session
//!         .call_api(ApiCall::new("users/me").with_method(Method::Get))
//!         .await?;
//!     println!("{}", me.text());
//!     Ok(())
//! }
//! ```

use crate::client::config::ClientConfig;
use crate::client::settings::{MarkerExtractor, SettingsExtractor};
use crate::error::{Result, SessionError};
use crate::protocol::constants::{self, headers};
use crate::protocol::{collapse_separators, join_paths, session_cookies, should_upgrade, Headers};
use crate::transport::{
    Exchange, ExchangeRequest, ExchangeResult, Http1Transport, Http2Transport, Transport,
};
use crate::types::{
    ApiCall, ApiResponse, ApiSettings, Endpoint, LoginOutcome, Method, Protocol, RequestBody,
};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Cookie-and-nonce session against one server.
///
/// All state lives in the value and is mutated through `&mut self`, so
/// overlapping logins on one session cannot be expressed.
pub struct WpSession {
    endpoint: Endpoint,
    config: Arc<ClientConfig>,
    http1: Box<dyn Transport>,
    http2: Box<dyn Transport>,
    extractor: Box<dyn SettingsExtractor>,
    auth_cookies: Vec<String>,
    api_settings: Option<ApiSettings>,
    use_http2: bool,
}

impl WpSession {
    /// Create a session for `base_url` with the default configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Create a session with a custom configuration
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        Self::with_transports(
            base_url,
            config,
            Box::new(Http1Transport::new()?),
            Box::new(Http2Transport::new()),
        )
    }

    /// Create a session over caller-provided transport adapters.
    ///
    /// `http1` serves exchanges until an upgrade is signalled, `http2` afterwards.
    pub fn with_transports(
        base_url: &str,
        config: ClientConfig,
        http1: Box<dyn Transport>,
        http2: Box<dyn Transport>,
    ) -> Result<Self> {
        Ok(WpSession {
            endpoint: Endpoint::parse(base_url)?,
            config: Arc::new(config),
            http1,
            http2,
            extractor: Box::new(MarkerExtractor::default()),
            auth_cookies: Vec::new(),
            api_settings: None,
            use_http2: false,
        })
    }

    /// Replace the settings extraction strategy
    pub fn with_extractor(mut self, extractor: impl SettingsExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Whether the session holds session cookies
    pub fn is_authenticated(&self) -> bool {
        !self.auth_cookies.is_empty()
    }

    /// Stored session cookies, `name=value` each
    pub fn cookies(&self) -> &[String] {
        &self.auth_cookies
    }

    /// Settings from the last successful retrieval
    pub fn api_settings(&self) -> Option<&ApiSettings> {
        self.api_settings.as_ref()
    }

    /// Current API nonce
    pub fn nonce(&self) -> Option<&str> {
        self.api_settings.as_ref().map(|s| s.nonce.as_str())
    }

    /// API version string, e.g. `wp/v2/`
    pub fn version_string(&self) -> Option<&str> {
        self.api_settings.as_ref().map(|s| s.version_string.as_str())
    }

    /// Route prefix for API calls; the fallback before settings are known
    pub fn gateway(&self) -> &str {
        self.api_settings
            .as_ref()
            .map_or(constants::FALLBACK_GATEWAY, |s| s.gateway.as_str())
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Whether exchanges now go over HTTP/2
    pub fn uses_http2(&self) -> bool {
        self.use_http2
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Log in through the configured login script, then retrieve the API settings.
    pub async fn login(&mut self, name: &str, password: &str) -> Result<LoginOutcome> {
        let login_path = self.config.login_path.clone();
        self.login_with_path(name, password, &login_path).await
    }

    /// Log in through `login_path`, then retrieve the API settings.
    ///
    /// The login is sent at most twice: once more over HTTP/2 when the first
    /// response signalled an upgrade. A settings failure fails the login but the
    /// session keeps its cookies.
    pub async fn login_with_path(
        &mut self,
        name: &str,
        password: &str,
        login_path: &str,
    ) -> Result<LoginOutcome> {
        let credentials = RequestBody::form([("log", name), ("pwd", password)]);

        let started_on_http2 = self.use_http2;
        let mut result = self.send_login(login_path, &credentials).await?;
        if !started_on_http2 && self.use_http2 {
            tracing::info!("resending login over HTTP/2");
            result = self.send_login(login_path, &credentials).await?;
        }

        let set_cookies = result.response.headers.get_all(headers::SET_COOKIE);
        if set_cookies.iter().all(|v| v.trim().is_empty()) {
            tracing::warn!(status = result.response.status, "login response carried no Set-Cookie");
            return Err(SessionError::AuthenticationFailed(
                "no Set-Cookie header in login response".into(),
            ));
        }

        let cookies = session_cookies(set_cookies);
        if cookies.is_empty() {
            tracing::warn!(status = result.response.status, "login response carried no session cookies");
            return Err(SessionError::AuthenticationFailed(
                "no session cookies in login response".into(),
            ));
        }

        self.auth_cookies = cookies;
        self.api_settings = None;
        tracing::info!(
            cookies = self.auth_cookies.len(),
            protocol = %result.response.protocol,
            "login accepted"
        );

        let settings = self.get_api_settings(true).await?;

        Ok(LoginOutcome {
            status: result.response.status,
            request: result.request,
            response: result.response,
            cookies: self.auth_cookies.clone(),
            settings,
        })
    }

    async fn send_login(&mut self, login_path: &str, credentials: &RequestBody) -> Result<ExchangeResult> {
        let exchange = self.build_request(login_path, Some(credentials), Method::Post, false)?;
        self.dispatch(exchange).await
    }

    /// Fetch the admin page and store the API settings it embeds.
    ///
    /// With `update_endpoint` the endpoint becomes the reported API root and the
    /// gateway follows its query convention; otherwise the endpoint is kept and the
    /// fallback gateway is used.
    ///
    /// The admin page is requested with the session cookies only; a previously
    /// scraped nonce is not sent.
    ///
    /// The admin page and the login script resolve under the endpoint's path
    /// prefix. After an update to a root like `https://example.com/wp-json/`, later
    /// refreshes and logins on this session go to `/wp-json/wp-admin/post-new.php`
    /// and `/wp-json/wp-login.php`. [`login`](Self::login) always updates, so a
    /// session that must reach the site path again needs a new [`WpSession`].
    pub async fn get_api_settings(&mut self, update_endpoint: bool) -> Result<ApiSettings> {
        if !self.is_authenticated() {
            return Err(SessionError::AuthenticationRequired);
        }

        let settings_path = self.config.settings_path.clone();
        let mut exchange = self.build_request(&settings_path, None, Method::Get, true)?;
        exchange.request.headers.remove(headers::NONCE);
        let result = self.dispatch(exchange).await?;

        let document = String::from_utf8_lossy(&result.body);
        let scraped = self.extractor.extract(&document).map_err(|e| {
            tracing::warn!(status = result.response.status, error = %e, "settings retrieval failed");
            e
        })?;

        let (endpoint, gateway) = if update_endpoint {
            let root = Url::parse(&scraped.root)?;
            (Endpoint::from_url(&root)?, gateway_for(&root))
        } else {
            (self.endpoint.clone(), constants::FALLBACK_GATEWAY.to_string())
        };

        let settings = ApiSettings {
            root: scraped.root,
            nonce: scraped.nonce,
            version_string: scraped.version_string,
            gateway,
        };
        self.endpoint = endpoint;
        self.api_settings = Some(settings.clone());

        tracing::debug!(
            endpoint = %self.endpoint,
            gateway = %settings.gateway,
            version = %settings.version_string,
            "api settings stored"
        );
        Ok(settings)
    }

    /// Call an API route through the session.
    ///
    /// The target is `<gateway><version><endpoint>` joined onto the endpoint path.
    pub async fn call_api(&mut self, call: ApiCall) -> Result<ApiResponse> {
        if call.use_auth && !self.is_authenticated() {
            return Err(SessionError::AuthenticationRequired);
        }

        let route = collapse_separators(&format!(
            "{}{}{}",
            self.gateway(),
            self.version_string().unwrap_or_default(),
            call.endpoint
        ));
        let exchange = self.build_request(&route, call.params.as_ref(), call.method, call.use_auth)?;
        let result = self.dispatch(exchange).await?;

        Ok(ApiResponse {
            status: result.response.status,
            request: result.request,
            response: result.response,
            body: result.body,
        })
    }

    /// Build an exchange for `path` on the currently negotiated transport.
    ///
    /// Nothing is sent. Session cookies and the nonce are attached only when
    /// `use_auth` is set and the session is authenticated; otherwise a placeholder
    /// cookie goes out.
    pub fn build_request(
        &self,
        path: &str,
        data: Option<&RequestBody>,
        method: Method,
        use_auth: bool,
    ) -> Result<Exchange> {
        let body = data.map(RequestBody::encode);
        let content_length = body.as_ref().map_or(0, String::len);

        let mut request_headers = Headers::new();
        request_headers
            .set(headers::CONTENT_TYPE, constants::FORM_CONTENT_TYPE)
            .set(headers::CONTENT_LENGTH, content_length.to_string())
            .set(headers::ACCEPT, &self.config.accept)
            .set(headers::ACCEPT_ENCODING, "identity")
            .set(headers::ACCEPT_LANGUAGE, &self.config.accept_language)
            .set(headers::USER_AGENT, &self.config.user_agent);

        if use_auth && self.is_authenticated() {
            request_headers.set(headers::COOKIE, self.auth_cookies.join("; "));
            if let Some(nonce) = self.nonce() {
                request_headers.set(headers::NONCE, nonce);
            }
        } else {
            request_headers.set(headers::COOKIE, constants::PLACEHOLDER_COOKIE);
        }

        let request = ExchangeRequest {
            endpoint: self.endpoint.clone(),
            path: join_paths(self.endpoint.path_prefix(), path),
            method,
            body,
            headers: request_headers,
        };

        self.transport().build(request)
    }

    fn transport(&self) -> &dyn Transport {
        if self.use_http2 {
            self.http2.as_ref()
        } else {
            self.http1.as_ref()
        }
    }

    /// Send on the adapter the exchange was built for, under the exchange deadline.
    async fn dispatch(&mut self, exchange: Exchange) -> Result<ExchangeResult> {
        let deadline = self.config.request_timeout();
        let transport = match exchange.protocol {
            Protocol::Http1 => self.http1.as_ref(),
            Protocol::Http2 => self.http2.as_ref(),
        };

        let result = tokio::time::timeout(deadline, transport.send(exchange))
            .await
            .map_err(|_| SessionError::Timeout(deadline))??;

        if !self.use_http2 && should_upgrade(&result.response.headers) {
            self.use_http2 = true;
            tracing::info!(status = result.response.status, "server signalled HTTP/2, switching transport");
        }

        Ok(result)
    }
}

/// Gateway implied by an API root: its query when present, `/` otherwise.
pub fn gateway_for(root: &Url) -> String {
    match root.query() {
        Some(query) if !query.is_empty() => format!("?{}", query),
        _ => "/".to_string(),
    }
}

impl fmt::Debug for WpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WpSession")
            .field("endpoint", &self.endpoint.to_string())
            .field("authenticated", &self.is_authenticated())
            .field("cookies", &self.auth_cookies.len())
            .field("has_settings", &self.api_settings.is_some())
            .field("use_http2", &self.use_http2)
            .finish()
    }
}
