//! Outgoing request options: method, headers, body, and timeout.

use std::time::Duration;

use bytes::Bytes;

/// An ordered collection of HTTP headers with case-insensitive names.
///
/// Insertion order is preserved. [`Headers::set`] replaces an existing entry
/// whose name matches case-insensitively, so the last write for a normalized
/// name wins while unrelated headers stay untouched.
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::Headers;
///
/// let mut headers = Headers::new();
/// headers.set("Accept", "text/plain");
/// headers.set("accept", "application/json");
///
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers.get("ACCEPT"), Some("application/json"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any entry with the same case-insensitive name.
    ///
    /// The replaced entry keeps its position but takes the new name spelling.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.entries[idx] = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    /// Returns `true` if a header with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Removes the header and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.set(k, v);
        }
        headers
    }
}

/// Options for a single request as it flows through a pipeline.
///
/// Each transformer receives the init by value and forwards a modified copy,
/// so no stage observes a later stage's changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInit {
    /// HTTP method name; `None` means GET.
    pub method: Option<String>,
    pub headers: Headers,
    /// Pre-serialized request body.
    pub body: Option<Bytes>,
    /// Per-request timeout, honoured by the reqwest primitive.
    pub timeout: Option<Duration>,
}

impl RequestInit {
    /// Creates an empty init.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets one header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The method name, defaulting to `GET`.
    pub fn method_or_get(&self) -> &str {
        self.method.as_deref().unwrap_or("GET")
    }

    /// The body as UTF-8 text, if present and valid.
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Fills every field left unset here from `base`.
    ///
    /// Headers from `base` come first; a header set on `self` replaces the
    /// `base` entry with the same case-insensitive name.
    pub fn merged_over(self, base: &RequestInit) -> RequestInit {
        let mut headers = base.headers.clone();
        for (name, value) in self.headers.iter() {
            headers.set(name, value);
        }
        RequestInit {
            method: self.method.or_else(|| base.method.clone()),
            headers,
            body: self.body.or_else(|| base.body.clone()),
            timeout: self.timeout.or(base.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_case_insensitive_last_write_wins() {
        let mut headers = Headers::new();
        headers.set("X-Trace", "1");
        headers.set("Content-Type", "text/plain");
        headers.set("content-type", "application/json");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Content-Type"), Some("application/json"));
        assert_eq!(headers.get("x-trace"), Some("1"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let headers = Headers::from([("B", "2"), ("A", "1")]);
        let names: Vec<_> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::from([("Authorization", "Bearer x")]);
        assert_eq!(headers.remove("AUTHORIZATION"), Some("Bearer x".to_string()));
        assert!(headers.is_empty());
        assert_eq!(headers.remove("Authorization"), None);
    }

    #[test]
    fn test_init_builders() {
        let init = RequestInit::new()
            .with_method("POST")
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"a":1}"#);

        assert_eq!(init.method_or_get(), "POST");
        assert_eq!(init.body_text(), Some(r#"{"a":1}"#));
        assert!(init.headers.contains("content-type"));
    }

    #[test]
    fn test_merged_over_prefers_call_site_fields() {
        let carried = RequestInit::new()
            .with_method("POST")
            .with_header("Content-Type", "application/json")
            .with_header("X-Carried", "1")
            .with_body("{}");

        let merged = RequestInit::new()
            .with_method("PUT")
            .with_header("content-type", "text/plain")
            .merged_over(&carried);

        assert_eq!(merged.method_or_get(), "PUT");
        assert_eq!(merged.headers.len(), 2);
        assert_eq!(merged.headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(merged.headers.get("x-carried"), Some("1"));
        assert_eq!(merged.body_text(), Some("{}"));
    }

    #[test]
    fn test_merged_over_fills_unset_fields() {
        let carried = RequestInit {
            timeout: Some(Duration::from_secs(2)),
            ..RequestInit::new().with_method("DELETE")
        };

        let merged = RequestInit::default().merged_over(&carried);

        assert_eq!(merged, carried);
    }

    #[test]
    fn test_default_method_is_get() {
        assert_eq!(RequestInit::default().method_or_get(), "GET");
    }
}
