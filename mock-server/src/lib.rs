use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const CATALOG_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<catalog xmlns:c="urn:catalog" version="2">
    <c:book id="1">
        <title>Dune</title>
        <author>
            <first>Frank</first>
            <last>Herbert</last>
        </author>
    </c:book>
    <c:book id="2">
        <title>Solaris</title>
    </c:book>
</catalog>"#;

pub const PAGE_HTML: &str = "<!DOCTYPE html>\n<html><head><title>mock</title></head><body><p>Hello &amp; welcome</p></body></html>\n";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: i64,
}

/// Body returned by the echo endpoints.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: String,
    #[serde(default)]
    pub pairs: Vec<(String, String)>,
    #[serde(default)]
    pub json: Option<Value>,
}

pub fn app() -> Router {
    Router::new()
        .route("/point", get(point))
        .route("/page", get(page))
        .route("/catalog", get(catalog))
        .route("/negotiate", get(negotiate))
        .route("/echo/form", post(echo_form))
        .route("/echo/json", post(echo_json))
        .route("/status/{code}", get(status).post(status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn point() -> Json<Point> {
    Json(Point { x: 1 })
}

async fn page() -> Response {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], PAGE_HTML).into_response()
}

async fn catalog() -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], CATALOG_XML).into_response()
}

/// Pick the representation from the `Accept` header.
async fn negotiate(headers: HeaderMap) -> Response {
    let accept = header_text(&headers, header::ACCEPT).unwrap_or_default();
    if accept.contains("application/json") {
        Json(json!({"format": "json"})).into_response()
    } else if accept.contains("text/html") {
        ([(header::CONTENT_TYPE, "text/html")], "<p>html</p>").into_response()
    } else if accept.contains("application/xml") {
        ([(header::CONTENT_TYPE, "application/xml")], r#"<format name="xml"/>"#).into_response()
    } else {
        StatusCode::NOT_ACCEPTABLE.into_response()
    }
}

/// Echo a form post. Pairs are split on `&` and `=` without unescaping so
/// the raw wire text is visible to the caller.
async fn echo_form(headers: HeaderMap, body: String) -> Json<Echo> {
    let pairs = body
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect();
    Json(Echo {
        content_type: header_text(&headers, header::CONTENT_TYPE),
        accept: header_text(&headers, header::ACCEPT),
        body,
        pairs,
        json: None,
    })
}

async fn echo_json(headers: HeaderMap, body: String) -> Result<Json<Echo>, StatusCode> {
    let value: Value = serde_json::from_str(&body).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok(Json(Echo {
        content_type: header_text(&headers, header::CONTENT_TYPE),
        accept: header_text(&headers, header::ACCEPT),
        body,
        pairs: Vec::new(),
        json: Some(value),
    }))
}

async fn status(Path(code): Path<u16>) -> Result<Response, StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")).into_response())
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
