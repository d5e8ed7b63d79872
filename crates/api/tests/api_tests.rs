use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use place_api::config::Config;
use place_canvas::{Canvas, StoreKind};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(kind: StoreKind) -> Router {
    let config = Config::defaults().unwrap();
    place_api::app(Arc::new(Canvas::with_kind(kind)), &config)
}

fn app() -> Router {
    app_with(StoreKind::Scan)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_server_info() {
    let (status, _, body) = send(&app(), Method::GET, "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Place canvas API v0.1.0");
}

#[tokio::test]
async fn test_claim_recolor_delete_scenario() {
    for kind in [StoreKind::Scan, StoreKind::Indexed] {
        let app = app_with(kind);

        let (status, body) = send_json(&app, Method::GET, "/api/pixels", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/pixels",
            Some(json!({"x": 2, "y": 3, "rgb": "#ABC", "user": "alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"x": 2, "y": 3, "rgb": "#ABC", "user": "alice"}));

        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/pixels",
            Some(json!({"x": 2, "y": 3, "rgb": "#123456", "user": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"x": 2, "y": 3, "rgb": "#123456", "user": "bob"}));

        let (_, body) = send_json(&app, Method::GET, "/api/pixels", None).await;
        assert_eq!(body, json!([{"x": 2, "y": 3, "rgb": "#123456", "user": "bob"}]));

        let (status, _, body) = send(
            &app,
            Method::DELETE,
            "/api/pixels",
            Some(json!({"x": 2, "y": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (_, body) = send_json(&app, Method::GET, "/api/pixels", None).await;
        assert_eq!(body, json!([]));

        let (status, body) = send_json(
            &app,
            Method::DELETE,
            "/api/pixels",
            Some(json!({"x": 2, "y": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Pixel does not exist", "pixel": "2 3"}));
    }
}

#[tokio::test]
async fn test_invalid_color_leaves_store_untouched() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/pixels",
        Some(json!({"x": 0, "y": 0, "rgb": "red", "user": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid RGB format. Use hex format."}));

    let (_, body) = send_json(&app, Method::GET, "/api/pixels", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_missing_parameters() {
    let app = app();
    for body in [
        json!({"y": 0, "rgb": "#abc", "user": "alice"}),
        json!({"x": 0, "rgb": "#abc", "user": "alice"}),
        json!({"x": 0, "y": 0, "user": "alice"}),
        json!({"x": 0, "y": 0, "rgb": "#abc"}),
        json!({"x": 0, "y": 0, "rgb": "", "user": "alice"}),
        json!({"x": null, "y": 0, "rgb": "#abc", "user": "alice"}),
    ] {
        let (status, response) = send_json(&app, Method::POST, "/api/pixels", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Missing parameters"}));
    }

    let (status, response) =
        send_json(&app, Method::DELETE, "/api/pixels", Some(json!({"x": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({"error": "Missing parameters"}));

    let (status, response) = send_json(&app, Method::DELETE, "/api/pixels", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({"error": "Missing parameters"}));

    let (_, body) = send_json(&app, Method::GET, "/api/pixels", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = app();
    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/pixels",
        Some(json!({"x": "zero", "y": 0, "rgb": "#abc", "user": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/pixels")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("x=1"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_form_body_and_color_alias() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/pixels")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("x=-4&y=7&color=%23a1b2c3&user=carol"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"x": -4, "y": 7, "rgb": "#a1b2c3", "user": "carol"}));
}

#[tokio::test]
async fn test_update_keeps_list_position() {
    let app = app_with(StoreKind::Indexed);
    for (x, user) in [(0, "a"), (1, "b"), (2, "c"), (3, "d")] {
        send(
            &app,
            Method::POST,
            "/api/pixels",
            Some(json!({"x": x, "y": 0, "rgb": "#000", "user": user})),
        )
        .await;
    }
    send(
        &app,
        Method::POST,
        "/api/pixels",
        Some(json!({"x": 2, "y": 0, "rgb": "#fff", "user": "z"})),
    )
    .await;

    let (_, body) = send_json(&app, Method::GET, "/api/pixels", None).await;
    assert_eq!(body[2], json!({"x": 2, "y": 0, "rgb": "#fff", "user": "z"}));
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_unsupported_method() {
    for method in [Method::PUT, Method::PATCH, Method::OPTIONS] {
        let (status, headers, body) = send(&app(), method.clone(), "/api/pixels", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(headers[header::ALLOW], "GET, POST, DELETE");
        assert_eq!(
            String::from_utf8(body).unwrap(),
            format!("Method {method} Not Allowed")
        );
    }

    let (status, headers, _) = send(&app(), Method::HEAD, "/api/pixels", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers[header::ALLOW], "GET, POST, DELETE");
}

#[tokio::test]
async fn test_unsupported_method_without_cors() {
    let mut config = Config::defaults().unwrap();
    config.cors.allow_local_origins = false;
    let app = place_api::app(Arc::new(Canvas::default()), &config);

    for method in [Method::HEAD, Method::OPTIONS, Method::PUT] {
        let (status, headers, _) = send(&app, method.clone(), "/api/pixels", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(headers[header::ALLOW], "GET, POST, DELETE");
    }
}

#[tokio::test]
async fn test_options_without_preflight_headers_is_not_allowed() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/pixels")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, POST, DELETE");
}

#[tokio::test]
async fn test_lookup_with_non_integer_coordinates() {
    let (status, body) = send_json(&app(), Method::GET, "/api/pixels/a/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid coordinates: ")
    );
}

#[tokio::test]
async fn test_empty_form_values_are_missing() {
    let app = app();
    for form in [
        "x=&y=1&rgb=%23abc&user=alice",
        "x=1&y=&rgb=%23abc&user=alice",
        "x=1&y=1&rgb=&user=alice",
    ] {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/pixels")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form}");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "Missing parameters"}), "{form}");
    }

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/pixels")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("x=1&y="))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pixel_lookup() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/api/pixels",
        Some(json!({"x": 5, "y": -5, "rgb": "#0f0", "user": "dave"})),
    )
    .await;

    let (status, body) = send_json(&app, Method::GET, "/api/pixels/5/-5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"x": 5, "y": -5, "rgb": "#0f0", "user": "dave"}));

    let (status, body) = send_json(&app, Method::GET, "/api/pixels/-5/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Pixel does not exist");
}

#[tokio::test]
async fn test_leaderboard() {
    let app = app();
    for (x, user) in [(0, "bob"), (1, "alice"), (2, "alice"), (3, "bob"), (4, "alice")] {
        send(
            &app,
            Method::POST,
            "/api/pixels",
            Some(json!({"x": x, "y": 0, "rgb": "#abc", "user": user})),
        )
        .await;
    }
    let (status, body) = send_json(&app, Method::GET, "/api/leaderboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"user": "alice", "pixels": 3}, {"user": "bob", "pixels": 2}])
    );
}

#[tokio::test]
async fn test_cors_for_local_origins() {
    let app = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/pixels")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/pixels")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_custom_prefix() {
    let mut config = Config::defaults().unwrap();
    config.server.api_prefix = "/v1/".to_string();
    let app = place_api::app(Arc::new(Canvas::default()), &config);

    let (status, body) = send_json(&app, Method::GET, "/v1/pixels", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _, _) = send(&app, Method::GET, "/api/pixels", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
