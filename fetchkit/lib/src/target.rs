//! The three accepted request target shapes and their shape-preserving rewrites.

use std::fmt;

use url::Url;
use url::form_urlencoded;

use crate::init::RequestInit;

/// A request that carries its own absolute URL and init.
///
/// This is the "Request-like" target shape. Rewriting its URL keeps the init.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: Url,
    pub init: RequestInit,
}

impl Request {
    /// Creates a request with a default init.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            init: RequestInit::default(),
        }
    }

    /// Parses `url` and creates a request with the given init.
    ///
    /// ## Errors
    ///
    /// Returns an error if `url` is not an absolute URL.
    pub fn parse(url: &str, init: RequestInit) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(url)?,
            init,
        })
    }
}

/// What a request is aimed at: a string, a parsed URL, or a [`Request`].
///
/// Transformers that rewrite the target ([`prefix`](crate::prefix) and
/// [`query`](crate::query)) return the same variant they were given.
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::RequestTarget;
///
/// let target = RequestTarget::from("/users");
/// let rewritten = target.with_path_prefix("/v1");
/// assert_eq!(rewritten.href(), "/v1/users");
///
/// let absolute = RequestTarget::from("https://api.example.com/users?page=2");
/// let rewritten = absolute.with_query([("limit".to_string(), "10".to_string())]);
/// assert_eq!(rewritten.href(), "https://api.example.com/users?page=2&limit=10");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RequestTarget {
    /// An absolute URL string or a bare path.
    Str(String),
    Url(Url),
    Request(Request),
}

impl RequestTarget {
    /// The canonical string form, used as the cache key.
    pub fn href(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Url(u) => u.to_string(),
            Self::Request(r) => r.url.to_string(),
        }
    }

    /// The target as an absolute URL, if it is one.
    pub fn parsed_url(&self) -> Option<Url> {
        match self {
            Self::Str(s) => Url::parse(s).ok(),
            Self::Url(u) => Some(u.clone()),
            Self::Request(r) => Some(r.url.clone()),
        }
    }

    /// The init carried by a Request-like target.
    pub fn request_init(&self) -> Option<&RequestInit> {
        match self {
            Self::Request(r) => Some(&r.init),
            _ => None,
        }
    }

    /// Inserts `prefix` in front of the path.
    ///
    /// Absolute targets keep their scheme and host; a string that does not
    /// parse as a URL is treated as a bare path and concatenated after `prefix`.
    pub fn with_path_prefix(self, prefix: &str) -> Self {
        match self {
            Self::Str(s) => match Url::parse(&s) {
                Ok(mut url) => {
                    prefix_path(&mut url, prefix);
                    Self::Str(url.to_string())
                }
                Err(_) => Self::Str(format!("{prefix}{s}")),
            },
            Self::Url(mut url) => {
                prefix_path(&mut url, prefix);
                Self::Url(url)
            }
            Self::Request(mut req) => {
                prefix_path(&mut req.url, prefix);
                Self::Request(req)
            }
        }
    }

    /// Appends query pairs after any existing ones.
    ///
    /// Duplicate keys are appended, never overwritten.
    pub fn with_query<I>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        match self {
            Self::Str(s) => match Url::parse(&s) {
                Ok(mut url) => {
                    append_query(&mut url, pairs);
                    Self::Str(url.to_string())
                }
                Err(_) => Self::Str(append_relative_query(&s, pairs)),
            },
            Self::Url(mut url) => {
                append_query(&mut url, pairs);
                Self::Url(url)
            }
            Self::Request(mut req) => {
                append_query(&mut req.url, pairs);
                Self::Request(req)
            }
        }
    }
}

fn prefix_path(url: &mut Url, prefix: &str) {
    let path = format!("{prefix}{}", url.path());
    url.set_path(&path);
}

fn append_query<I>(url: &mut Url, pairs: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let merged: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .chain(pairs)
        .collect();

    if merged.is_empty() {
        url.set_query(None);
        return;
    }

    url.query_pairs_mut().clear().extend_pairs(merged);
}

fn append_relative_query<I>(input: &str, pairs: I) -> String
where
    I: IntoIterator<Item = (String, String)>,
{
    let (path, search) = input.split_once('?').unwrap_or((input, ""));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(form_urlencoded::parse(search.as_bytes()));
    serializer.extend_pairs(pairs);
    let query = serializer.finish();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

impl From<&str> for RequestTarget {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for RequestTarget {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Url> for RequestTarget {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

impl From<Request> for RequestTarget {
    fn from(req: Request) -> Self {
        Self::Request(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ========================================================================
    // Path prefix
    // ========================================================================

    #[test]
    fn test_prefix_relative_string_concatenates() {
        let target = RequestTarget::from("/users/1").with_path_prefix("https://api.example.com");
        assert_eq!(
            target,
            RequestTarget::Str("https://api.example.com/users/1".to_string())
        );
    }

    #[test]
    fn test_prefix_absolute_string_keeps_host() {
        let target =
            RequestTarget::from("https://api.example.com/users?x=1").with_path_prefix("/v1");
        assert_eq!(target.href(), "https://api.example.com/v1/users?x=1");
        assert!(matches!(target, RequestTarget::Str(_)));
    }

    #[test]
    fn test_prefix_url_stays_url() {
        let url = Url::parse("http://localhost:8080/items").unwrap();
        let target = RequestTarget::from(url).with_path_prefix("/api");

        match target {
            RequestTarget::Url(u) => assert_eq!(u.as_str(), "http://localhost:8080/api/items"),
            other => panic!("expected Url, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_request_keeps_init() {
        let init = RequestInit::new().with_method("DELETE");
        let req = Request::parse("https://example.com/thing", init.clone()).unwrap();
        let target = RequestTarget::from(req).with_path_prefix("/v2");

        match target {
            RequestTarget::Request(r) => {
                assert_eq!(r.url.as_str(), "https://example.com/v2/thing");
                assert_eq!(r.init, init);
            }
            other => panic!("expected Request, got {other:?}"),
        }
    }

    // ========================================================================
    // Query merge
    // ========================================================================

    #[test]
    fn test_query_relative_without_existing() {
        let target = RequestTarget::from("/search").with_query(pairs(&[("q", "rust lang")]));
        assert_eq!(target.href(), "/search?q=rust+lang");
    }

    #[test]
    fn test_query_relative_keeps_existing_and_appends_duplicates() {
        let target =
            RequestTarget::from("/search?tag=a").with_query(pairs(&[("tag", "b"), ("page", "2")]));
        assert_eq!(target.href(), "/search?tag=a&tag=b&page=2");
    }

    #[test]
    fn test_query_relative_empty_has_no_question_mark() {
        let target = RequestTarget::from("/plain").with_query(Vec::new());
        assert_eq!(target.href(), "/plain");
    }

    #[test]
    fn test_query_absolute_string() {
        let target = RequestTarget::from("https://api.flickr.com/services/rest/?format=json")
            .with_query(pairs(&[("method", "flickr.photosets.getList")]));
        assert_eq!(
            target.href(),
            "https://api.flickr.com/services/rest/?format=json&method=flickr.photosets.getList"
        );
    }

    #[test]
    fn test_query_url_and_request_shapes() {
        let url = Url::parse("https://example.com/a?x=1").unwrap();
        let from_url = RequestTarget::from(url.clone()).with_query(pairs(&[("y", "2")]));
        let from_req = RequestTarget::from(Request::new(url)).with_query(pairs(&[("y", "2")]));

        assert_eq!(from_url.href(), "https://example.com/a?x=1&y=2");
        assert_eq!(from_req.href(), "https://example.com/a?x=1&y=2");
        assert!(matches!(from_url, RequestTarget::Url(_)));
        assert!(matches!(from_req, RequestTarget::Request(_)));
    }

    #[test]
    fn test_parsed_url() {
        assert!(RequestTarget::from("/relative").parsed_url().is_none());
        assert!(
            RequestTarget::from("https://example.com")
                .parsed_url()
                .is_some()
        );
    }
}
