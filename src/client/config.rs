//! Session client configuration.

use crate::protocol::constants;
use std::time::Duration;

/// Configuration for a [`WpSession`](crate::WpSession).
///
/// # Examples
///
/// ```
/// use wp_session_http::ClientConfig;
///
/// let config = ClientConfig {
///     request_timeout_ms: 5_000,
///     ..Default::default()
/// };
/// assert_eq!(config.login_path, "wp-login.php");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Deadline for one exchange, in milliseconds
    pub request_timeout_ms: u64,
    /// Login script, relative to the endpoint path
    pub login_path: String,
    /// Admin page that embeds the API settings
    pub settings_path: String,
    /// `Accept` header value
    pub accept: String,
    /// `Accept-Language` header value
    pub accept_language: String,
    /// `User-Agent` header value, [`default_user_agent`] unless overridden
    pub user_agent: String,
}

impl ClientConfig {
    /// Exchange deadline as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// `<library>/<version> (rust/<minimum supported Rust version>)`
///
/// The Rust version is the crate's declared `rust-version`, not the compiler
/// that built it.
pub fn default_user_agent() -> String {
    format!(
        "{}/{} (rust/{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_RUST_VERSION"),
    )
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: 30_000,
            login_path: constants::LOGIN_PATH.to_string(),
            settings_path: constants::SETTINGS_PATH.to_string(),
            accept: "text/html,application/json;q=0.9,*/*;q=0.8".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            user_agent: default_user_agent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.settings_path, "wp-admin/post-new.php");
        assert!(config.user_agent.starts_with("wp_session_http/"));
        assert!(config
            .user_agent
            .ends_with(concat!("(rust/", env!("CARGO_PKG_RUST_VERSION"), ")")));
    }
}
