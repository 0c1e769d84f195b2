//! Reference evaluator: the HTTP endpoint the client submits points to.
//!
//! Each browser session (cookie `SID`) gets its own result history, most
//! recent first. Responses are bare `<tr>` fragments.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Local;
use log::{info, warn};
use rand::Rng;
use thiserror::Error;
use time::Duration;

use areacheck_core::evaluator::{format_number, DEFAULT_ENDPOINT};
use areacheck_core::validate::{parse_decimal, Y_RANGE};
use areacheck_core::{Point, RegionParameter, ValidationError};

pub const SESSION_COOKIE: &str = "SID";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path the evaluator answers on
    pub path: String,
    /// Rows kept per session; older rows are dropped
    pub max_rows: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_ENDPOINT.to_string(),
            max_rows: 2000,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("expected a POST request")]
    MethodNotAllowed,
    #[error("missing required parameters x, y, r")]
    Missing,
    #[error("parameter {0} must be a number")]
    NotANumber(&'static str),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn error_row(message: &str) -> String {
    format!("<tr><td colspan=\"6\" class=\"error\">Error: {}</td></tr>", escape(message))
}

/// Whether `(x, y)` lies in the admissible area for `r`.
pub fn is_hit(p: &Point) -> bool {
    let (x, y, r) = (p.x, p.y, p.r);
    let triangle = x >= 0. && y >= 0. && y <= r - x;
    let rectangle = x >= 0. && x <= r / 2. && y <= 0. && y >= -r;
    let quarter = x <= 0. && y <= 0. && x * x + y * y <= r * r / 4.;
    triangle || rectangle || quarter
}

fn result_row(p: &Point, hit: bool, elapsed_ms: f64) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.3} ms</td></tr>",
        format_number(p.x),
        format_number(p.y),
        format_number(p.r),
        if hit { "Hit" } else { "Miss" },
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        elapsed_ms,
    )
}

/// Parse `x`, `y` and `r` from a form body. Commas are accepted as decimal separators.
pub fn parse_point(body: &[u8]) -> Result<Point, ApiError> {
    let params: HashMap<String, String> = url::form_urlencoded::parse(body).into_owned().collect();
    let field = |name: &'static str| -> Result<f64, ApiError> {
        let raw = params.get(name).ok_or(ApiError::Missing)?;
        parse_decimal(raw).ok_or(ApiError::NotANumber(name))
    };
    let (x, y, r) = (field("x")?, field("y")?, field("r")?);
    if !Y_RANGE.contains(&y) {
        return Err(ValidationError::Y.into());
    }
    if RegionParameter::new(r).is_none() {
        return Err(ValidationError::R.into());
    }
    Ok(Point { x, y, r })
}

/// Per-session result histories.
#[derive(Debug)]
pub struct Sessions {
    rows: Mutex<HashMap<String, VecDeque<String>>>,
    max_rows: usize,
}

impl Sessions {
    pub fn new(max_rows: usize) -> Self {
        Sessions { rows: Mutex::new(HashMap::new()), max_rows }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, VecDeque<String>>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, sid: &str, row: String) {
        let mut sessions = self.lock();
        let rows = sessions.entry(sid.to_string()).or_default();
        rows.push_front(row);
        rows.truncate(self.max_rows);
    }

    pub fn history(&self, sid: &str) -> String {
        self.lock().get(sid).map(|rows| rows.iter().map(String::as_str).collect()).unwrap_or_default()
    }

    pub fn clear(&self, sid: &str) {
        self.lock().remove(sid);
    }
}

pub type AppState = Arc<Sessions>;

/// The caller's session, and the cookie to set if it had none.
struct Session {
    id: String,
    issued: bool,
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::weeks(1))
        .build()
}

impl Session {
    fn from_headers(headers: &HeaderMap) -> Self {
        let jar = CookieJar::from_headers(headers);
        match jar.get(SESSION_COOKIE).map(Cookie::value).filter(|id| !id.is_empty()) {
            Some(id) => Session { id: id.to_string(), issued: false },
            None => {
                let id = format!("{:032x}", rand::thread_rng().gen::<u128>());
                Session { id, issued: true }
            }
        }
    }

    fn respond(self, result: Result<String, ApiError>) -> Response {
        let response = match result {
            Ok(body) => (StatusCode::OK, Html(body)).into_response(),
            Err(err) => {
                warn!("rejected: {}", err);
                (err.status(), Html(error_row(&err.to_string()))).into_response()
            }
        };
        if self.issued {
            let jar = CookieJar::new().add(session_cookie(self.id));
            (jar, response).into_response()
        } else {
            response
        }
    }
}

async fn query_handler(
    State(sessions): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let session = Session::from_headers(&headers);
    let action = params.get("action").map(|a| a.to_ascii_lowercase()).unwrap_or_default();
    info!("GET action={:?}", action);
    let result = match action.as_str() {
        "history" => Ok(sessions.history(&session.id)),
        "clear" => {
            sessions.clear(&session.id);
            Ok(String::new())
        }
        _ => Err(ApiError::MethodNotAllowed),
    };
    session.respond(result)
}

async fn submit_handler(State(sessions): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let started = Instant::now();
    let session = Session::from_headers(&headers);
    let result = parse_point(&body).map(|point| {
        let hit = is_hit(&point);
        info!("POST {:?}: {}", point, if hit { "hit" } else { "miss" });
        let row = result_row(&point, hit, started.elapsed().as_secs_f64() * 1000.);
        sessions.record(&session.id, row.clone());
        row
    });
    session.respond(result)
}

pub fn build_router(config: &ServerConfig) -> Router {
    Router::new()
        .route(&config.path, get(query_handler).post(submit_handler))
        .with_state(Arc::new(Sessions::new(config.max_rows)))
}

/// Run the evaluator until the process is stopped.
pub async fn run_server(port: u16, config: ServerConfig) -> anyhow::Result<()> {
    let app = build_router(&config);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("evaluator listening on http://{}{}", addr, config.path);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use test_log::test;
    use tower::ServiceExt;

    const PATH: &str = "/fcgi-bin/server.jar";

    fn router(max_rows: usize) -> Router {
        build_router(&ServerConfig { path: PATH.to_string(), max_rows })
    }

    fn post(body: &str, sid: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(PATH).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(sid) = sid {
            builder = builder.header(header::COOKIE, format!("SID={}", sid));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(action: &str, sid: &str) -> Request<Body> {
        Request::get(format!("{}?action={}", PATH, action))
            .header(header::COOKIE, format!("theme=dark; SID={}", sid))
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn point(x: f64, y: f64, r: f64) -> Point {
        Point { x, y, r }
    }

    #[test]
    fn test_hit_regions() {
        // triangle
        assert!(is_hit(&point(1., 1., 2.)));
        assert!(is_hit(&point(0., 2., 2.)));
        assert!(!is_hit(&point(1.5, 1., 2.)));
        // rectangle
        assert!(is_hit(&point(1., -2., 2.)));
        assert!(!is_hit(&point(1.1, -1., 2.)));
        assert!(!is_hit(&point(0.5, -2.1, 2.)));
        // quarter circle
        assert!(is_hit(&point(-0.5, -0.5, 2.)));
        assert!(is_hit(&point(-1., 0., 2.)));
        assert!(!is_hit(&point(-1., -1., 2.)));
        // second quadrant is empty
        assert!(!is_hit(&point(-0.1, 0.1, 5.)));
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point(b"x=1&y=0,5&r=3"), Ok(point(1., 0.5, 3.)));
        assert_eq!(parse_point(b"x=1&y=0"), Err(ApiError::Missing));
        assert_eq!(parse_point(b"x=1&y=abc&r=3"), Err(ApiError::NotANumber("y")));
        assert_eq!(parse_point(b"x=1&y=3.0001&r=3"), Err(ApiError::Invalid(ValidationError::Y)));
        assert_eq!(parse_point(b"x=1&y=0&r=1.999"), Err(ApiError::Invalid(ValidationError::R)));
    }

    #[test]
    fn test_error_row_escapes() {
        assert_eq!(
            error_row("a<b>&c"),
            "<tr><td colspan=\"6\" class=\"error\">Error: a&lt;b&gt;&amp;c</td></tr>"
        );
    }

    #[test(tokio::test)]
    async fn test_submit_returns_row_and_issues_cookie() {
        let app = router(2000);
        let (status, headers, body) = send(&app, post("x=1&y=0&r=3", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<tr><td>1</td><td>0</td><td>3</td><td>Hit</td><td>"), "{}", body);
        assert!(body.ends_with(" ms</td></tr>"));
        let cookie = Cookie::parse(headers.get(header::SET_COOKIE).unwrap().to_str().unwrap()).unwrap();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value().len(), 32);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::weeks(1)));
    }

    #[test(tokio::test)]
    async fn test_known_session_gets_no_cookie() {
        let app = router(2000);
        let (_, headers, _) = send(&app, post("x=-1&y=-1&r=2", Some("abc"))).await;
        assert!(headers.get(header::SET_COOKIE).is_none());
    }

    #[test(tokio::test)]
    async fn test_session_read_among_other_cookies() {
        let app = router(2000);
        let (_, _, row) = send(&app, post("x=1&y=0&r=3", Some("a"))).await;
        let request = Request::get(format!("{}?action=history", PATH))
            .header(header::COOKIE, "theme=dark; SID=a; lang=en")
            .body(Body::empty())
            .unwrap();
        let (_, headers, history) = send(&app, request).await;
        assert_eq!(history, row);
        assert!(headers.get(header::SET_COOKIE).is_none());

        let request = Request::get(format!("{}?action=history", PATH))
            .header(header::COOKIE, "SID=")
            .body(Body::empty())
            .unwrap();
        let (_, headers, history) = send(&app, request).await;
        assert_eq!(history, "");
        assert!(headers.get(header::SET_COOKIE).is_some());
    }

    #[test(tokio::test)]
    async fn test_history_is_per_session_and_newest_first() {
        let app = router(2000);
        let (_, _, first) = send(&app, post("x=1&y=0&r=3", Some("a"))).await;
        let (_, _, second) = send(&app, post("x=-4&y=2&r=2", Some("a"))).await;
        send(&app, post("x=0&y=0&r=2", Some("b"))).await;
        assert!(second.contains("<td>Miss</td>"));

        let (status, _, history) = send(&app, get("history", "a")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history, format!("{}{}", second, first));

        let (_, _, other) = send(&app, get("HISTORY", "b")).await;
        assert_eq!(other.matches("<tr>").count(), 1);
    }

    #[test(tokio::test)]
    async fn test_clear_drops_session() {
        let app = router(2000);
        send(&app, post("x=1&y=0&r=3", Some("a"))).await;
        let (status, _, body) = send(&app, get("clear", "a")).await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, ""));
        let (_, _, history) = send(&app, get("history", "a")).await;
        assert_eq!(history, "");
    }

    #[test(tokio::test)]
    async fn test_row_cap() {
        let app = router(3);
        for y in ["0", "1", "2", "3"] {
            send(&app, post(&format!("x=0&y={}&r=2", y), Some("a"))).await;
        }
        let (_, _, history) = send(&app, get("history", "a")).await;
        assert_eq!(history.matches("<tr>").count(), 3);
        assert!(history.starts_with("<tr><td>0</td><td>3</td>"));
        assert!(!history.contains("<td>0</td><td>0</td>"));
    }

    #[test(tokio::test)]
    async fn test_rejections() {
        let app = router(2000);
        let (status, _, body) = send(&app, post("x=1&y=5&r=3", Some("a"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, error_row("Y must be a number from -3 to 3"));

        let (status, _, _) = send(&app, post("x=1", Some("a"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, body) = send(&app, get("other", "a")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(body.contains("class=\"error\""));

        let (_, _, history) = send(&app, get("history", "a")).await;
        assert_eq!(history, "");
    }
}
