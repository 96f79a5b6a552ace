//! Network seam between the dashboard and the backend.
//!
//! [`Transport`] is the only way the controller talks to the network, so
//! tests substitute an in-process fake. [`HttpTransport`] is the real
//! implementation over the synchronous `ureq` client.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

/// A failure to obtain a JSON body from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout and similar.
    Network(String),
    /// Non-2xx status whose body was not JSON.
    Status { code: u16, body: String },
    /// 2xx status whose body was not JSON.
    InvalidJson(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "{msg}"),
            Self::Status { code, body } if body.is_empty() => {
                write!(f, "server responded with status {code}")
            }
            Self::Status { code, body } => {
                write!(f, "server responded with status {code}: {}", summarize(body))
            }
            Self::InvalidJson(msg) => write!(f, "invalid JSON in response: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

fn summarize(body: &str) -> String {
    let one_line = body.replace(['\r', '\n'], " ");
    if one_line.chars().count() > 120 {
        let cut: String = one_line.chars().take(120).collect();
        format!("{cut}...")
    } else {
        one_line
    }
}

/// JSON-over-HTTP request issuer.
///
/// Paths are absolute (`/api/chatbot/`); the implementation owns the base URL.
/// A non-2xx response whose body parses as JSON is returned as `Ok` so that
/// `{error}` payloads sent with 4xx/5xx statuses reach the decoder.
pub trait Transport {
    fn post_json(
        &self,
        path: &str,
        headers: &[(&str, String)],
        body: &Value,
    ) -> Result<Value, TransportError>;

    fn get_json(&self, path: &str) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(
        &self,
        path: &str,
        headers: &[(&str, String)],
        body: &Value,
    ) -> Result<Value, TransportError> {
        (**self).post_json(path, headers, body)
    }

    fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        (**self).get_json(path)
    }
}

/// Synchronous HTTP transport backed by a `ureq` agent.
///
/// The configured cookie string is forwarded verbatim as the `Cookie`
/// header so the backend sees the same session the token came from.
#[derive(Debug)]
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    cookies: String,
}

impl HttpTransport {
    /// Build a transport. A zero `timeout` means no request timeout.
    pub fn new(base_url: &str, timeout: Duration, cookies: impl Into<String>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cookies: cookies.into(),
        }
        .with_ipv4_localhost()
    }

    // "localhost" may resolve to ::1 first while dev servers only bind IPv4.
    fn with_ipv4_localhost(mut self) -> Self {
        self.base_url = self.base_url.replace("://localhost", "://127.0.0.1");
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_cookies(&self, request: ureq::Request) -> ureq::Request {
        if self.cookies.is_empty() {
            request
        } else {
            request.set("Cookie", &self.cookies)
        }
    }
}

impl Transport for HttpTransport {
    fn post_json(
        &self,
        path: &str,
        headers: &[(&str, String)],
        body: &Value,
    ) -> Result<Value, TransportError> {
        let mut request = self.with_cookies(self.agent.post(&self.url(path)));
        for (name, value) in headers {
            request = request.set(name, value);
        }
        read_json(request.send_string(&body.to_string()))
    }

    fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        let request = self
            .with_cookies(self.agent.get(&self.url(path)))
            .set("Accept", "application/json");
        read_json(request.call())
    }
}

fn read_json(result: Result<ureq::Response, ureq::Error>) -> Result<Value, TransportError> {
    match result {
        Ok(response) => response
            .into_json::<Value>()
            .map_err(|e| TransportError::InvalidJson(e.to_string())),
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            serde_json::from_str::<Value>(&body)
                .map_err(|_| TransportError::Status { code, body })
        }
        Err(ureq::Error::Transport(transport)) => Err(TransportError::Network(transport.to_string())),
    }
}
