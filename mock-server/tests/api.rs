use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, Point, CATALOG_XML, PAGE_HTML};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(uri: &str, accept: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(accept) = accept {
        builder = builder.header(http::header::ACCEPT, accept);
    }
    builder.body(String::new()).unwrap()
}

fn post_request(uri: &str, content_type: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, content_type)
        .header(http::header::ACCEPT, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- fixed representations ---

#[tokio::test]
async fn point_returns_json() {
    let resp = app().oneshot(get_request("/point", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let point: Point = body_json(resp).await;
    assert_eq!(point, Point { x: 1 });
}

#[tokio::test]
async fn page_returns_html() {
    let resp = app().oneshot(get_request("/page", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(body_bytes(resp).await, PAGE_HTML.as_bytes());
}

#[tokio::test]
async fn catalog_returns_xml() {
    let resp = app().oneshot(get_request("/catalog", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/xml");
    assert_eq!(body_bytes(resp).await, CATALOG_XML.as_bytes());
}

// --- negotiation ---

#[tokio::test]
async fn negotiate_follows_accept() {
    let resp = app()
        .oneshot(get_request("/negotiate", Some("application/json")))
        .await
        .unwrap();
    let value: serde_json::Value = body_json(resp).await;
    assert_eq!(value["format"], "json");

    let resp = app()
        .oneshot(get_request("/negotiate", Some("text/html")))
        .await
        .unwrap();
    assert_eq!(body_bytes(resp).await, "<p>html</p>".as_bytes());

    let resp = app()
        .oneshot(get_request("/negotiate", Some("application/xml")))
        .await
        .unwrap();
    assert_eq!(body_bytes(resp).await, r#"<format name="xml"/>"#.as_bytes());
}

#[tokio::test]
async fn negotiate_without_accept_returns_406() {
    let resp = app().oneshot(get_request("/negotiate", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
}

// --- echo ---

#[tokio::test]
async fn echo_form_splits_raw_pairs() {
    let resp = app()
        .oneshot(post_request(
            "/echo/form",
            "application/x-www-form-urlencoded",
            "b=2&a=1&flag",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.body, "b=2&a=1&flag");
    assert_eq!(
        echo.pairs,
        vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
            ("flag".to_string(), String::new()),
        ]
    );
    assert_eq!(echo.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
    assert_eq!(echo.accept.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn echo_form_empty_body_has_no_pairs() {
    let resp = app()
        .oneshot(post_request("/echo/form", "application/x-www-form-urlencoded", ""))
        .await
        .unwrap();
    let echo: Echo = body_json(resp).await;
    assert!(echo.pairs.is_empty());
}

#[tokio::test]
async fn echo_json_returns_parsed_payload() {
    let resp = app()
        .oneshot(post_request("/echo/json", "application/json", r#"{"x":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.json, Some(serde_json::json!({"x": 1})));
}

#[tokio::test]
async fn echo_json_rejects_malformed_body() {
    let resp = app()
        .oneshot(post_request("/echo/json", "application/json", "{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- status ---

#[tokio::test]
async fn status_endpoint_returns_requested_code() {
    for code in [200u16, 404, 500, 503] {
        let resp = app()
            .oneshot(get_request(&format!("/status/{code}"), None))
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), code);
        assert_eq!(body_bytes(resp).await, format!("status {code}").as_bytes());
    }
}

#[tokio::test]
async fn status_endpoint_accepts_post() {
    let resp = app()
        .oneshot(post_request("/status/500", "application/json", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn status_endpoint_rejects_non_numeric_code() {
    let resp = app()
        .oneshot(get_request("/status/abc", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
