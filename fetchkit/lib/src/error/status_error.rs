//! Non-2xx HTTP status errors.

use thiserror::Error;

use crate::response::Response;

/// A well-formed response whose status is outside `200..=299`.
///
/// Only raised by ok-checking endpoints. The offending [`Response`] travels
/// with the error so callers can inspect its status, headers, and body.
#[derive(Debug, Error)]
#[error("HTTP error status {status} for {url}")]
pub struct HttpStatusError {
    status: u16,
    url: String,
    response: Box<Response>,
}

impl HttpStatusError {
    /// Wraps a response that failed the ok check.
    pub fn new(response: Response) -> Self {
        Self {
            status: response.status(),
            url: response.url().unwrap_or("<unknown>").to_string(),
            response: Box::new(response),
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The URL the response came from, if the primitive reported one.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The response that caused this error.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Consumes the error, returning the response.
    pub fn into_response(self) -> Response {
        *self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_status_and_url() {
        let response = Response::new(404, "Not Found").with_url("https://example.com/api/error");
        let err = HttpStatusError::new(response);

        assert_eq!(
            err.to_string(),
            "HTTP error status 404 for https://example.com/api/error"
        );
    }

    #[test]
    fn test_into_response_preserves_body() {
        let err = HttpStatusError::new(Response::new(500, "Server Error"));

        assert_eq!(err.status(), 500);
        assert_eq!(err.url(), "<unknown>");
        assert_eq!(err.into_response().text().unwrap(), "Server Error");
    }
}
