//! Extraction of the API settings embedded in an admin page.
//!
//! The admin screens declare a JavaScript object holding the API root, the nonce
//! and the version string. [`MarkerExtractor`] finds it by text search: the marker,
//! then the next `{`, then the next `};` after the marker, and parses what lies in
//! between as JSON. This breaks whenever the page template changes, so the
//! strategy sits behind [`SettingsExtractor`] and can be swapped out.

use crate::error::{Result, SessionError};
use crate::protocol::constants::SETTINGS_MARKER;
use crate::types::ScrapedSettings;

/// Turns a fetched document into a settings record.
pub trait SettingsExtractor: Send + Sync {
    /// Extract the settings.
    ///
    /// Fails with [`SessionError::SettingsNotFound`] when the document holds no
    /// settings and [`SessionError::SettingsParse`] when they are malformed.
    fn extract(&self, document: &str) -> Result<ScrapedSettings>;
}

/// Marker-based extractor for the `var wpApiSettings = {...};` declaration.
///
/// # Examples
///
/// ```
/// use wp_session_http::client::{MarkerExtractor, SettingsExtractor};
///
/// let page = r#"<script>var wpApiSettings = {"root":"https://x/wp-json/","nonce":"n1","versionString":"wp/v2/"};</script>"#;
/// let settings = MarkerExtractor::default().extract(page).unwrap();
/// assert_eq!(settings.nonce, "n1");
/// ```
#[derive(Debug, Clone)]
pub struct MarkerExtractor {
    marker: String,
}

impl MarkerExtractor {
    /// Use a different marker
    pub fn with_marker(marker: impl Into<String>) -> Self {
        MarkerExtractor {
            marker: marker.into(),
        }
    }
}

impl Default for MarkerExtractor {
    fn default() -> Self {
        Self::with_marker(SETTINGS_MARKER)
    }
}

impl SettingsExtractor for MarkerExtractor {
    fn extract(&self, document: &str) -> Result<ScrapedSettings> {
        let start = document
            .find(&self.marker)
            .ok_or_else(|| SessionError::SettingsNotFound(format!("marker `{}` absent", self.marker)))?;
        let tail = &document[start..];

        let open = tail
            .find('{')
            .ok_or_else(|| SessionError::SettingsNotFound("no `{` after marker".into()))?;
        let close = tail
            .find("};")
            .ok_or_else(|| SessionError::SettingsNotFound("no `};` after marker".into()))?;
        if close < open {
            return Err(SessionError::SettingsNotFound(
                "`};` precedes `{` after marker".into(),
            ));
        }

        Ok(serde_json::from_str(&tail[open..=close])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
<script type="text/javascript">
/* <![CDATA[ */
var wpApiSettings = {"root":"https:\/\/x\/wp-json\/","nonce":"n1","versionString":"wp\/v2\/"};
/* ]]> */
</script></head></html>"#;

    #[test]
    fn test_extracts_settings() {
        let settings = MarkerExtractor::default().extract(PAGE).unwrap();
        assert_eq!(settings.root, "https://x/wp-json/");
        assert_eq!(settings.nonce, "n1");
        assert_eq!(settings.version_string, "wp/v2/");
    }

    #[test]
    fn test_missing_marker() {
        let err = MarkerExtractor::default()
            .extract("<html>login form</html>")
            .unwrap_err();
        assert!(matches!(err, SessionError::SettingsNotFound(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = MarkerExtractor::default()
            .extract("var wpApiSettings = {root: 'x'};")
            .unwrap_err();
        assert!(matches!(err, SessionError::SettingsParse(_)));
    }

    #[test]
    fn test_missing_fields() {
        let err = MarkerExtractor::default()
            .extract(r#"var wpApiSettings = {"root":"https://x/"};"#)
            .unwrap_err();
        assert!(matches!(err, SessionError::SettingsParse(_)));
    }

    #[test]
    fn test_unterminated_block() {
        let err = MarkerExtractor::default()
            .extract(r#"var wpApiSettings = {"root":"#)
            .unwrap_err();
        assert!(matches!(err, SessionError::SettingsNotFound(_)));
    }

    #[test]
    fn test_custom_marker() {
        let extractor = MarkerExtractor::with_marker("window.apiConfig");
        let settings = extractor
            .extract(r#"window.apiConfig = {"root":"r","nonce":"n","versionString":"v"};"#)
            .unwrap();
        assert_eq!(settings.root, "r");
    }
}
