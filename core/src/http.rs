//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The client builds `HttpRequest`
//! values and interprets `HttpResponse` values; a `Transport` performs the
//! actual round-trip in between. `UreqTransport` is the default; tests swap
//! in scripted transports without touching the network.
//!
//! A transport returns only after the response body has been read to the
//! end, whatever the status. Nothing downstream holds a live connection.

use std::fmt;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First value of the named header. Names compare case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data, body already drained.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First value of the named header. Names compare case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Executes one request/response exchange.
///
/// Implementations must fully read the response body before returning and
/// must hand back non-2xx responses as data rather than errors. Only
/// failures to complete the exchange map to `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a `ureq` agent and its connection pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.path);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(format!("reading response body: {e}")))?;
        let body = decode_body(status, bytes)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Body text of a drained response. Invalid UTF-8 is a decode failure on a
/// 200; on any other status it is replaced lossily so the status survives.
fn decode_body(status: u16, bytes: Vec<u8>) -> Result<String, ApiError> {
    match String::from_utf8(bytes) {
        Ok(body) => Ok(body),
        Err(e) if status == 200 => Err(ApiError::DeserializationError(format!(
            "response body is not UTF-8: {e}"
        ))),
        Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_utf8_error_body_keeps_status() {
        let body = decode_body(404, vec![0xff, 0xfe, b'x']).unwrap();
        assert_eq!(body, "\u{fffd}\u{fffd}x");
    }

    #[test]
    fn non_utf8_success_body_is_decode_error() {
        let err = decode_body(200, vec![0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("token".to_string(), "abc123".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("Token"), Some("abc123"));
        assert_eq!(response.header("TOKEN"), Some("abc123"));
        assert_eq!(response.header("Authorization"), None);
    }

    #[test]
    fn header_lookup_returns_first_value() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            path: "http://localhost/x".to_string(),
            headers: vec![
                ("X-Dup".to_string(), "first".to_string()),
                ("x-dup".to_string(), "second".to_string()),
            ],
            body: None,
        };
        assert_eq!(request.header("x-dup"), Some("first"));
    }

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}
