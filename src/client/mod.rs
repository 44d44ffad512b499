//! Session client.
//!
//! This module provides the session manager that logs in through the login form,
//! captures the session cookies, scrapes the API nonce and root from an admin
//! page, and then funnels API calls through that state.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── session  - WpSession: login, settings retrieval, API calls
//! ├── settings - Pluggable extraction of the embedded API settings
//! └── config   - Client configuration
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`WpSession`] | Session manager |
//! | [`ClientConfig`] | Timeouts, paths and request header values |
//! | [`SettingsExtractor`] | Strategy for pulling settings out of a document |
//! | [`MarkerExtractor`] | Default marker-based strategy |
//!
//! # Examples
//!
//! ## Creating a Session
//!
//! ```
//! use wp_session_http::client::{ClientConfig, WpSession};
//!
//! let session = WpSession::new("https://example.com/blog/").unwrap();
//! assert!(!session.is_authenticated());
//!
//! let config = ClientConfig {
//!     request_timeout_ms: 10_000,
//!     ..Default::default()
//! };
//! let session = WpSession::with_config("https://example.com/", config).unwrap();
//! assert_eq!(session.gateway(), "?rest_route=/");
//! ```

mod config;
mod session;
mod settings;

pub use config::{default_user_agent, ClientConfig};
pub use session::{gateway_for, WpSession};
pub use settings::{MarkerExtractor, SettingsExtractor};
