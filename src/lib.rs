#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # WP Session HTTP: cookie-and-nonce sessions for the WordPress REST API
//!
//! This crate drives the login flow that precedes authorized REST calls when no
//! application password or API key is available: form login, cookie capture,
//! nonce scraping from an admin page, and HTTP/1.1 to HTTP/2 negotiation.
//!
//! ## Overview
//!
//! 1. **Login** - `POST <prefix>/wp-login.php` with `log`/`pwd`, keeping the
//!    `wordpress_*` / `wp_*` cookies from the response
//! 2. **Settings** - `GET <prefix>/wp-admin/post-new.php` and extract the
//!    `wpApiSettings` block (root, nonce, version)
//! 3. **API calls** - `<gateway><version><route>` with `Cookie` and `X-WP-Nonce`
//!
//! Responses carrying `Connection: upgrade` + `Upgrade: h2`/`h2c` move the session
//! to HTTP/2 for the rest of its life.
//!
//! ## Module Structure
//!
//! - **[types]** - Endpoint, method, body, settings and result types
//! - **[error]** - Error types and result handling
//! - **[client]** - Session manager, configuration and settings extraction
//! - **[transport]** - HTTP/1.1 and HTTP/2 transport adapters
//! - **[protocol]** - Header collection, upgrade negotiation, cookies, paths

pub mod client;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::{ClientConfig, MarkerExtractor, SettingsExtractor, WpSession};
pub use error::{Result, SessionError};
pub use protocol::Headers;
pub use transport::{Exchange, ExchangeRequest, ExchangeResult, ResponseHead, Transport};
pub use types::{
    ApiCall, ApiResponse, ApiSettings, Endpoint, LoginOutcome, Method, Protocol, RequestBody,
    ScrapedSettings,
};
