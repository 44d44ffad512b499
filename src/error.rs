//! Error types for the session client.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! [`SessionError`]. Errors surface to the immediate caller; nothing is retried.
//!
//! # Kinds
//!
//! | Kind | Variants |
//! |------|----------|
//! | Transport | `Transport`, `UnsupportedScheme`, `ReservedHeader`, `InvalidHeader`, `InvalidStatus`, `Timeout` |
//! | Authentication | `AuthenticationRequired`, `AuthenticationFailed` |
//! | Settings | `SettingsNotFound`, `SettingsParse` |
//! | Construction | `InvalidUrl` |

use std::time::Duration;
use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while negotiating or using a session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Low-level transport failure (connection refused, reset, TLS, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint scheme is neither `http` nor `https`
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// Caller supplied a reserved HTTP/2 pseudo-header
    #[error("Reserved header supplied by caller: {0}")]
    ReservedHeader(String),

    /// A header name or value could not be put on the wire
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name as given
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The response status could not be read
    #[error("Invalid response status: {0}")]
    InvalidStatus(String),

    /// The exchange did not complete before its deadline
    #[error("Exchange timed out after {0:?}")]
    Timeout(Duration),

    /// The operation needs an authenticated session
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Login completed but produced no usable session cookies
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The embedded settings block was not found in the document
    #[error("Settings not found: {0}")]
    SettingsNotFound(String),

    /// The embedded settings block is not valid JSON
    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),

    /// The base URL or a server-reported root could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SessionError {
    /// Whether the error came from the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SessionError::Transport(_)
                | SessionError::UnsupportedScheme(_)
                | SessionError::ReservedHeader(_)
                | SessionError::InvalidHeader { .. }
                | SessionError::InvalidStatus(_)
                | SessionError::Timeout(_)
        )
    }

    /// Whether the error concerns session authentication.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            SessionError::AuthenticationRequired | SessionError::AuthenticationFailed(_)
        )
    }

    /// Whether the error came from settings extraction.
    pub fn is_settings(&self) -> bool {
        matches!(
            self,
            SessionError::SettingsNotFound(_) | SessionError::SettingsParse(_)
        )
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(SessionError::Timeout(Duration::from_secs(1)).is_transport());
        assert!(SessionError::UnsupportedScheme("ftp".into()).is_transport());
        assert!(SessionError::AuthenticationRequired.is_authentication());
        assert!(!SessionError::AuthenticationRequired.is_transport());
        assert!(SessionError::SettingsNotFound("x".into()).is_settings());
    }

    #[test]
    fn test_display() {
        let err = SessionError::AuthenticationFailed("no session cookies".into());
        assert_eq!(err.to_string(), "Authentication failed: no session cookies");
    }
}
