//! Buffered HTTP responses and parsed payloads.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FetchError, ParseError};
use crate::init::Headers;

/// A fully buffered HTTP response.
///
/// Bodies are read eagerly by the request primitive, so a response can be
/// inspected more than once and carried inside errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: Headers,
    url: Option<String>,
    body: Bytes,
}

impl Response {
    /// Creates a response with the given status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Headers::new(),
            url: None,
            body: body.into(),
        }
    }

    /// Creates a `200` response carrying `value` as JSON.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use fetchkit_lib::Response;
    /// use serde_json::json;
    ///
    /// let response = Response::json(&json!({"id": 1}));
    /// assert_eq!(response.status(), 200);
    /// assert_eq!(response.headers().get("content-type"), Some("application/json"));
    /// ```
    pub fn json(value: &Value) -> Self {
        Self::new(200, value.to_string()).with_header("Content-Type", "application/json")
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Replaces all headers.
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Records the URL the response was served from.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` for a `2xx` status.
    pub fn ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The raw body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Reads the body as UTF-8 text.
    ///
    /// ## Errors
    ///
    /// Returns [`ParseError::Utf8`] if the body is not valid UTF-8.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.to_vec()).map_err(|e| ParseError::Utf8(e).into())
    }

    /// Deserializes the body as JSON.
    ///
    /// ## Errors
    ///
    /// Returns [`ParseError::Json`] on malformed JSON or a shape mismatch.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| ParseError::Json(e).into())
    }

    /// Parses the body into a dynamic JSON value.
    pub fn json_value(&self) -> Result<Value, FetchError> {
        self.json_as::<Value>()
    }
}

/// A response body in the shape an endpoint was asked to produce.
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::Payload;
/// use serde_json::json;
///
/// let payload = Payload::Json(json!({"name": "test"}));
/// assert!(payload.as_json().is_some());
/// assert!(payload.as_text().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Parsed JSON body.
    Json(Value),
    /// UTF-8 text body.
    Text(String),
    /// The untouched response.
    Raw(Response),
}

impl Payload {
    /// Returns the JSON value if this is a JSON payload.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the text if this is a text payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the response if this is a raw payload.
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Raw(r) => Some(r),
            _ => None,
        }
    }

    /// Consumes the payload into a JSON value, when it is one.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        name: String,
    }

    #[test]
    fn test_ok_range() {
        assert!(Response::new(200, "").ok());
        assert!(Response::new(299, "").ok());
        assert!(!Response::new(199, "").ok());
        assert!(!Response::new(404, "").ok());
    }

    #[test]
    fn test_json_as_typed() {
        let response = Response::new(200, r#"{"id": 1, "name": "Ada"}"#);
        let user: User = response.json_as().unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                name: "Ada".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let response = Response::new(200, "not json");
        let err = response.json_value().unwrap_err();
        assert!(matches!(err, FetchError::Parse(ParseError::Json(_))));
    }

    #[test]
    fn test_invalid_utf8_text() {
        let response = Response::new(200, vec![0xff, 0xfe]);
        assert!(matches!(
            response.text().unwrap_err(),
            FetchError::Parse(ParseError::Utf8(_))
        ));
    }

    #[test]
    fn test_json_constructor_round_trips_value() {
        let value = json!({"items": [1, 2, 3]});
        let response = Response::json(&value);
        assert_eq!(response.json_value().unwrap(), value);
    }

    #[test]
    fn test_payload_accessors() {
        let raw = Payload::Raw(Response::new(204, ""));
        assert_eq!(raw.as_response().map(Response::status), Some(204));
        assert!(raw.clone().into_json().is_none());

        let text = Payload::Text("hello".to_string());
        assert_eq!(text.as_text(), Some("hello"));
    }
}
