//! Protocol negotiation from already-received response headers.
//!
//! A response that carries both `Connection: upgrade` and an `Upgrade` header
//! listing `h2` or `h2c` (RFC 7540 §3.2) tells the client the server speaks
//! HTTP/2. No switching handshake is performed; a positive answer only changes
//! which transport adapter later exchanges use.

use super::constants::headers;
use super::Headers;

/// Upgrade tokens that identify HTTP/2.
pub const HTTP2_TOKENS: [&str; 2] = ["h2", "h2c"];

/// Whether the server signalled that subsequent requests should use HTTP/2.
///
/// # Examples
///
/// ```
/// use wp_session_http::protocol::{should_upgrade, Headers};
///
/// let mut headers = Headers::new();
/// headers.set("connection", "Upgrade").set("upgrade", "h2c");
/// assert!(should_upgrade(&headers));
///
/// let mut headers = Headers::new();
/// headers.set("upgrade", "websocket");
/// assert!(!should_upgrade(&headers));
/// ```
pub fn should_upgrade(response_headers: &Headers) -> bool {
    let connection = match response_headers.get(headers::CONNECTION) {
        Some(value) if !value.is_empty() => value,
        _ => return false,
    };
    let upgrade = match response_headers.get(headers::UPGRADE) {
        Some(value) if !value.is_empty() => value,
        _ => return false,
    };

    if !connection.to_ascii_lowercase().contains("upgrade") {
        return false;
    }

    upgrade
        .split(',')
        .map(|token| token.trim().to_ascii_lowercase())
        .any(|token| HTTP2_TOKENS.contains(&token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_upgrade_h2c() {
        assert!(should_upgrade(&headers(&[
            ("connection", "Upgrade"),
            ("upgrade", "h2c"),
        ])));
    }

    #[test]
    fn test_keep_alive_without_upgrade() {
        assert!(!should_upgrade(&headers(&[("connection", "keep-alive")])));
    }

    #[test]
    fn test_upgrade_without_connection() {
        assert!(!should_upgrade(&headers(&[("upgrade", "websocket")])));
        assert!(!should_upgrade(&headers(&[("upgrade", "h2")])));
    }

    #[test]
    fn test_token_list_and_case() {
        assert!(should_upgrade(&headers(&[
            ("Connection", "keep-alive, UPGRADE"),
            ("Upgrade", "websocket,  H2 "),
        ])));
    }

    #[test]
    fn test_non_http2_upgrade() {
        assert!(!should_upgrade(&headers(&[
            ("connection", "upgrade"),
            ("upgrade", "websocket, h2-14"),
        ])));
    }

    #[test]
    fn test_empty_values() {
        assert!(!should_upgrade(&headers(&[("connection", ""), ("upgrade", "h2")])));
        assert!(!should_upgrade(&headers(&[("connection", "upgrade"), ("upgrade", "")])));
    }
}
