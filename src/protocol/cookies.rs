//! Session cookie extraction from `Set-Cookie` response headers.

use super::constants::SESSION_COOKIE_PREFIXES;

/// Strip attributes from a `Set-Cookie` value, leaving the `name=value` pair.
///
/// Returns `None` when the pair has no `=` or an empty name.
pub fn cookie_pair(set_cookie: &str) -> Option<&str> {
    let pair = set_cookie.split(';').next().unwrap_or_default().trim();
    match pair.split_once('=') {
        Some((name, _)) if !name.trim().is_empty() => Some(pair),
        _ => None,
    }
}

/// Name part of a `name=value` pair
pub fn cookie_name(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(name, _)| name).trim()
}

/// Whether a cookie name belongs to a server session
pub fn is_session_cookie(name: &str) -> bool {
    SESSION_COOKIE_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Collect the session cookies carried by a set of `Set-Cookie` values.
///
/// Order follows the response; a name seen twice keeps its first position and
/// takes the later value. Cookies outside the session prefixes are dropped.
pub fn session_cookies<'a>(set_cookies: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut cookies: Vec<String> = Vec::new();

    for pair in set_cookies.into_iter().filter_map(cookie_pair) {
        let name = cookie_name(pair);
        if !is_session_cookie(name) {
            continue;
        }
        match cookies.iter_mut().find(|c| cookie_name(c) == name) {
            Some(existing) => *existing = pair.to_string(),
            None => cookies.push(pair.to_string()),
        }
    }

    cookies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_pair_strips_attributes() {
        assert_eq!(
            cookie_pair("wordpress_logged_in_ab=admin%7C1; path=/; HttpOnly"),
            Some("wordpress_logged_in_ab=admin%7C1")
        );
        assert_eq!(cookie_pair("novalue"), None);
        assert_eq!(cookie_pair("=x; path=/"), None);
    }

    #[test]
    fn test_non_session_cookie_dropped() {
        let cookies = session_cookies(["sessionid=abc", "wordpress_logged_in=xyz"]);
        assert_eq!(cookies, vec!["wordpress_logged_in=xyz".to_string()]);
    }

    #[test]
    fn test_both_prefixes_keep_response_order() {
        let cookies = session_cookies([
            "wp_lang=en_US; path=/",
            "other=1",
            "wordpress_sec_1=a; path=/wp-admin",
        ]);
        assert_eq!(cookies, vec!["wp_lang=en_US", "wordpress_sec_1=a"]);
    }

    #[test]
    fn test_unique_by_name() {
        let cookies = session_cookies([
            "wordpress_sec_1=a; path=/wp-content/plugins",
            "wp_x=1",
            "wordpress_sec_1=b; path=/wp-admin",
        ]);
        assert_eq!(cookies, vec!["wordpress_sec_1=b", "wp_x=1"]);
    }

    #[test]
    fn test_no_session_cookies() {
        assert!(session_cookies(["PHPSESSID=1", "garbage"]).is_empty());
        assert!(session_cookies(Vec::<&str>::new()).is_empty());
    }
}
