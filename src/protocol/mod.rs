//! Wire-level constants and helpers shared by the transports and the session.
//!
//! # Contents
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Headers`] | Ordered header collection with case-insensitive lookup |
//! | [`should_upgrade`] | Detects an HTTP/2 upgrade signal in response headers |
//! | [`session_cookies`] | Filters `Set-Cookie` values down to session cookies |
//! | [`join_paths`] / [`collapse_separators`] | Request path assembly |
//! | [`constants`] | Header names, default paths, cookie prefixes |
//!
//! # Examples
//!
//! ```
//! use wp_session_http::protocol::{collapse_separators, join_paths};
//!
//! assert_eq!(join_paths("/blog/", "/wp-json/users"), "/blog/wp-json/users");
//! assert_eq!(collapse_separators("?rest_route=//wp/v2/"), "?rest_route=/wp/v2/");
//! ```

pub mod cookies;
pub mod headers;
pub mod negotiate;

pub use cookies::session_cookies;
pub use headers::Headers;
pub use negotiate::should_upgrade;

/// Protocol constants.
pub mod constants {
    /// Header names used by the session and the transports.
    pub mod headers {
        /// `Host`
        pub const HOST: &str = "Host";
        /// `Connection`
        pub const CONNECTION: &str = "Connection";
        /// `Upgrade`
        pub const UPGRADE: &str = "Upgrade";
        /// `Content-Type`
        pub const CONTENT_TYPE: &str = "Content-Type";
        /// `Content-Length`
        pub const CONTENT_LENGTH: &str = "Content-Length";
        /// `Accept`
        pub const ACCEPT: &str = "Accept";
        /// `Accept-Encoding`
        pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
        /// `Accept-Language`
        pub const ACCEPT_LANGUAGE: &str = "Accept-Language";
        /// `User-Agent`
        pub const USER_AGENT: &str = "User-Agent";
        /// `Cookie`
        pub const COOKIE: &str = "Cookie";
        /// `Set-Cookie`
        pub const SET_COOKIE: &str = "Set-Cookie";
        /// `X-WP-Nonce`
        pub const NONCE: &str = "X-WP-Nonce";
        /// HTTP/2 `:path` pseudo-header
        pub const PSEUDO_PATH: &str = ":path";
        /// HTTP/2 `:method` pseudo-header
        pub const PSEUDO_METHOD: &str = ":method";
        /// HTTP/2 `:status` pseudo-header
        pub const PSEUDO_STATUS: &str = ":status";
    }

    /// Body content type for every request
    pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

    /// Default login script, relative to the endpoint path
    pub const LOGIN_PATH: &str = "wp-login.php";

    /// Admin page that embeds the API settings block
    pub const SETTINGS_PATH: &str = "wp-admin/post-new.php";

    /// Marker that introduces the embedded API settings declaration
    pub const SETTINGS_MARKER: &str = "var wpApiSettings";

    /// Route prefix used when pretty permalinks are unavailable
    pub const FALLBACK_GATEWAY: &str = "?rest_route=/";

    /// Cookie name prefixes that identify a logged-in session
    pub const SESSION_COOKIE_PREFIXES: [&str; 2] = ["wordpress_", "wp_"];

    /// Cookie sent on requests that carry no session
    pub const PLACEHOLDER_COOKIE: &str = "wordpress_test_cookie=WP%20Cookie%20check";
}

/// Collapse every run of `/` into a single separator.
pub fn collapse_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(c);
    }
    out
}

/// Join an endpoint base path and a request path.
///
/// The result always starts with `/` and never contains doubled separators. A
/// path that is only a query (`?rest_route=...`) attaches directly to the base.
pub fn join_paths(base: &str, path: &str) -> String {
    if path.starts_with('?') {
        return collapse_separators(&format!("/{}{}", base, path));
    }
    collapse_separators(&format!("/{}/{}", base, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_paths_collapses() {
        assert_eq!(join_paths("/blog/", "/wp-json/users"), "/blog/wp-json/users");
        assert_eq!(join_paths("/", "wp-login.php"), "/wp-login.php");
        assert_eq!(join_paths("", ""), "/");
    }

    #[test]
    fn test_join_paths_with_query_gateway() {
        assert_eq!(
            join_paths("/blog/", "?rest_route=/wp/v2/users/me"),
            "/blog/?rest_route=/wp/v2/users/me"
        );
        assert_eq!(
            join_paths("/index.php", "?rest_route=/wp/v2/posts"),
            "/index.php?rest_route=/wp/v2/posts"
        );
    }

    #[test]
    fn test_collapse_separators() {
        assert_eq!(collapse_separators("//a///b/"), "/a/b/");
        assert_eq!(collapse_separators("abc"), "abc");
    }
}
