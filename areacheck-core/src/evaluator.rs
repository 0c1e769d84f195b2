//! Requests to the remote evaluator, described independently of any HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::EvaluatorError;
use crate::validate::Point;

pub const DEFAULT_ENDPOINT: &str = "/fcgi-bin/server.jar";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const HTML_ACCEPT: &str = "text/html";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Everything an HTTP client needs to issue one evaluator call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Bypass every cache layer.
    pub no_store: bool,
    /// Send session cookies along.
    pub include_credentials: bool,
}

impl EvaluatorRequest {
    fn new(method: Method, url: String) -> Self {
        EvaluatorRequest {
            method,
            url,
            headers: Vec::new(),
            body: None,
            no_store: true,
            include_credentials: true,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorResponse {
    pub status: u16,
    pub body: String,
}

impl EvaluatorResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes evaluator requests. `Err` means the request never completed;
/// any HTTP status, success or not, is an `Ok` response.
#[async_trait(?Send)]
pub trait Evaluator {
    async fn send(&self, request: &EvaluatorRequest) -> Result<EvaluatorResponse, EvaluatorError>;
}

/// Shortest round-trip decimal, with `-0` printed as `0`.
pub fn format_number(v: f64) -> String {
    format!("{}", v + 0.)
}

/// `x=…&y=…&r=…`
pub fn encode_point(point: &Point) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("x", &format_number(point.x))
        .append_pair("y", &format_number(point.y))
        .append_pair("r", &format_number(point.r))
        .finish()
}

/// The evaluator's single URL and the three calls made against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Endpoint { url: url.into() }
    }

    fn with_action(&self, action: &str) -> String {
        let sep = if self.url.contains('?') { '&' } else { '?' };
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("action", action)
            .finish();
        format!("{}{}{}", self.url, sep, query)
    }

    pub fn submit(&self, point: &Point) -> EvaluatorRequest {
        let mut request = EvaluatorRequest::new(Method::Post, self.url.clone());
        request.headers = vec![
            ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ("Accept".to_string(), HTML_ACCEPT.to_string()),
        ];
        request.body = Some(encode_point(point));
        request
    }

    pub fn history(&self) -> EvaluatorRequest {
        EvaluatorRequest::new(Method::Get, self.with_action("history"))
    }

    pub fn clear(&self) -> EvaluatorRequest {
        EvaluatorRequest::new(Method::Get, self.with_action("clear"))
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::new(DEFAULT_ENDPOINT)
    }
}
