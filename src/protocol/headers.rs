//! Ordered header collection used for both requests and responses.
//!
//! [`Headers`] keeps entries in insertion order and maintains a lower-cased index
//! so lookups are case-insensitive while the stored names keep the spelling they
//! were given with.
//!
//! | Operation | Behaviour |
//! |-----------|-----------|
//! | [`Headers::set`] | Add, or overwrite every entry with the same name |
//! | [`Headers::append`] | Add without touching existing entries (multi-valued response headers) |
//! | [`Headers::get`] | First value for a name, case-insensitive |
//! | [`Headers::get_all`] | Every value for a name, in order |
//!
//! No validation of values is done here; the transport adapters reject what the
//! wire cannot carry.
//!
//! # Examples
//!
//! ```
//! use wp_session_http::protocol::Headers;
//!
//! let mut headers = Headers::new();
//! headers.set("Cookie", "a=1").set("X-WP-Nonce", "abc");
//! headers.set("cookie", "a=2");
//!
//! assert_eq!(headers.len(), 2);
//! assert_eq!(headers.get("COOKIE"), Some("a=2"));
//! ```

use std::collections::HashMap;

/// Ordered, case-insensitively indexed name/value collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
    index: HashMap<String, Vec<usize>>,
}

impl Headers {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing entries with the same name.
    ///
    /// The first existing entry keeps its position; later duplicates are dropped.
    /// Returns `self` so calls can be chained.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        let key = name.to_ascii_lowercase();

        match self.index.get(&key).cloned() {
            Some(positions) => {
                let first = positions[0];
                self.entries[first] = (name, value);
                if positions.len() > 1 {
                    let mut pos = 0;
                    self.entries.retain(|_| {
                        let keep = !positions[1..].contains(&pos);
                        pos += 1;
                        keep
                    });
                    self.reindex();
                }
            }
            None => {
                self.index.insert(key, vec![self.entries.len()]);
                self.entries.push((name, value));
            }
        }
        self
    }

    /// Append a header without replacing existing entries.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.index
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(self.entries.len());
        self.entries.push((name, value.into()));
        self
    }

    /// First value stored under `name`, compared case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(&name.to_ascii_lowercase())
            .and_then(|positions| positions.first())
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Every value stored under `name`, in insertion order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|positions| {
                positions
                    .iter()
                    .map(|&i| self.entries[i].1.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any entry is stored under `name`
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_ascii_lowercase())
    }

    /// Number of entries stored under `name`
    pub fn count(&self, name: &str) -> usize {
        self.index
            .get(&name.to_ascii_lowercase())
            .map_or(0, Vec::len)
    }

    /// Remove every entry stored under `name`, returning the removed values.
    pub fn remove(&mut self, name: &str) -> Vec<String> {
        let key = name.to_ascii_lowercase();
        if !self.index.contains_key(&key) {
            return Vec::new();
        }
        let mut removed = Vec::new();
        self.entries.retain(|(n, v)| {
            if n.to_ascii_lowercase() == key {
                removed.push(v.clone());
                false
            } else {
                true
            }
        });
        self.reindex();
        removed
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, (name, _)) in self.entries.iter().enumerate() {
            self.index
                .entry(name.to_ascii_lowercase())
                .or_default()
                .push(i);
        }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/html");
        assert_eq!(headers.get("content-type"), Some("text/html"));
        assert!(headers.has("CONTENT-TYPE"));
        assert_eq!(headers.get("accept"), None);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut headers = Headers::new();
        headers.set("Host", "a").set("Accept", "*/*").set("host", "b");
        let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["host", "Accept"]);
        assert_eq!(headers.get("Host"), Some("b"));
    }

    #[test]
    fn test_set_collapses_appended_duplicates() {
        let mut headers = Headers::new();
        headers.append("Cookie", "a=1").append("X", "y").append("cookie", "b=2");
        headers.set("Cookie", "c=3");
        assert_eq!(headers.count("cookie"), 1);
        assert_eq!(headers.get("cookie"), Some("c=3"));
        assert_eq!(headers.get("x"), Some("y"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_append_keeps_all_values() {
        let mut headers = Headers::new();
        headers.append("Set-Cookie", "a=1").append("set-cookie", "b=2");
        assert_eq!(headers.get_all("SET-COOKIE"), vec!["a=1", "b=2"]);
        assert_eq!(headers.get("set-cookie"), Some("a=1"));
    }

    #[test]
    fn test_repeated_set_never_duplicates() {
        let mut headers = Headers::new();
        for _ in 0..3 {
            headers.set("Cookie", "a=1").set("X-WP-Nonce", "n");
        }
        assert_eq!(headers.count("Cookie"), 1);
        assert_eq!(headers.count("x-wp-nonce"), 1);
    }

    #[test]
    fn test_remove() {
        let mut headers: Headers = [(":path", "/"), ("accept", "*/*"), (":PATH", "/x")]
            .into_iter()
            .collect();
        assert_eq!(headers.remove(":path"), vec!["/".to_string(), "/x".to_string()]);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("accept"), Some("*/*"));
        assert!(headers.remove("missing").is_empty());
    }
}
