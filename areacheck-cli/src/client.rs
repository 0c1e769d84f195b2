//! Talking to an evaluator from the terminal.

use async_trait::async_trait;
use axum_extra::extract::cookie::Cookie;
use log::{debug, info, trace};
use reqwest::header::{HeaderValue, CACHE_CONTROL, COOKIE};

use areacheck_core::{
    Evaluator, EvaluatorError, EvaluatorRequest, EvaluatorResponse, Field, Method, RegionParameter, View,
};

use crate::server::SESSION_COOKIE;

/// Sends evaluator requests with `reqwest`, presenting a session cookie if one was given.
pub struct HttpEvaluator {
    client: reqwest::Client,
    session: Option<String>,
}

impl HttpEvaluator {
    pub fn new(session: Option<String>) -> Self {
        HttpEvaluator {
            client: reqwest::Client::new(),
            session,
        }
    }

    fn issued_session(response: &reqwest::Response) -> Option<String> {
        response
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }

    fn session_header(&self) -> Option<String> {
        self.session
            .as_deref()
            .map(|session| Cookie::new(SESSION_COOKIE, session).to_string())
    }
}

#[async_trait(?Send)]
impl Evaluator for HttpEvaluator {
    async fn send(&self, request: &EvaluatorRequest) -> Result<EvaluatorResponse, EvaluatorError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if request.no_store {
            builder = builder.header(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        }
        if request.include_credentials {
            if let Some(cookie) = self.session_header() {
                builder = builder.header(COOKIE, cookie);
            }
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!("{} {}", request.method.as_str(), request.url);
        let response = builder.send().await.map_err(|e| EvaluatorError::Network(e.to_string()))?;
        if let Some(session) = Self::issued_session(&response) {
            info!("evaluator issued session {}; pass --session {} to keep using it", session, session);
        }
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| EvaluatorError::Body(e.to_string()))?;
        trace!("{} -> {}: {:?}", request.url, status, body);
        Ok(EvaluatorResponse { status, body })
    }
}

/// The text content of each cell in an HTML row, entity-decoded.
pub fn row_cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut rest = row;
    while let Some(open) = rest.find('<') {
        current.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = rest[open + 1..open + close].trim().to_ascii_lowercase();
        if tag.starts_with("/td") || tag.starts_with("/th") {
            cells.push(decode(current.trim()));
            current.clear();
        } else if tag.starts_with("td") || tag.starts_with("th") {
            current.clear();
        }
        rest = &rest[open + close + 1..];
    }
    cells
}

fn decode(text: &str) -> String {
    text.replace("&lt;", "<").replace("&gt;", ">").replace("&quot;", "\"").replace("&amp;", "&")
}

/// A [`View`] for one-shot terminal commands: remembers what a browser would show.
#[derive(Debug, Default)]
pub struct TerminalView {
    pub message: String,
    pub results: String,
}

impl TerminalView {
    /// Results as tab-separated lines, most recent first.
    pub fn lines(&self) -> Vec<String> {
        areacheck_core::results::split_rows(&self.results)
            .iter()
            .map(|row| row_cells(row.as_str()).join("\t"))
            .collect()
    }
}

impl View for TerminalView {
    fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    fn set_invalid(&mut self, field: Field, invalid: bool) {
        if invalid {
            debug!("{} flagged invalid", field);
        }
    }

    fn set_text(&mut self, _field: Field, _text: &str) {}

    fn set_x_checked(&mut self, _index: usize, _checked: bool) {}

    fn show_results(&mut self, html: &str) {
        self.results = html.to_string();
    }

    fn redraw(&mut self, _r: RegionParameter) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_cells() {
        let row = "<tr><td>1</td><td>0</td><td>3</td><td>Hit</td><td>2024-01-02 03:04:05</td><td>0.012 ms</td></tr>";
        assert_eq!(row_cells(row), vec!["1", "0", "3", "Hit", "2024-01-02 03:04:05", "0.012 ms"]);
        let error = "<tr><td colspan=\"6\" class=\"error\">Error: a &lt; b</td></tr>";
        assert_eq!(row_cells(error), vec!["Error: a < b"]);
    }

    #[test]
    fn test_session_header() {
        assert_eq!(HttpEvaluator::new(Some("abc".to_string())).session_header().as_deref(), Some("SID=abc"));
        assert_eq!(HttpEvaluator::new(None).session_header(), None);
    }

    #[test]
    fn test_terminal_lines() {
        let mut view = TerminalView::default();
        view.show_results("<tr><td>a</td><td>b</td></tr>\n<TR><TD>c</TD></TR>");
        assert_eq!(view.lines(), vec!["a\tb", "c"]);
    }
}
