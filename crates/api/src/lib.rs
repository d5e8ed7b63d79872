pub mod config;
pub mod error;
pub mod payload;
pub mod routes;

use crate::config::Config;
use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, header, request};
use axum::routing::{MethodFilter, get};
use place_canvas::Canvas;
use std::sync::Arc;
use tower::ServiceExt;
use tower::service_fn;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub type AppState = Arc<Canvas>;

/// Builds the HTTP application serving `canvas` under the configured prefix.
pub fn app(canvas: AppState, config: &Config) -> Router {
    let api = Router::new()
        .route("/", get(routes::server_info))
        .route(
            "/pixels",
            get(routes::list_pixels)
                .post(routes::upsert_pixel)
                .delete(routes::delete_pixel)
                .on(MethodFilter::HEAD, routes::method_not_allowed)
                .fallback(routes::method_not_allowed),
        )
        .route("/pixels/{x}/{y}", get(routes::pixel_at))
        .route("/leaderboard", get(routes::leaderboard))
        .with_state(canvas);

    let prefix = config.server.api_prefix.trim_matches('/');
    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&format!("/{prefix}"), api)
    };

    if !config.cors.allow_local_origins {
        return app.layer(TraceLayer::new_for_http());
    }

    // CorsLayer answers every OPTIONS request itself; only real preflights go through it
    let with_cors = app.clone().layer(local_cors());
    Router::new()
        .fallback_service(service_fn(move |req: Request| {
            let target = if req.method() == Method::OPTIONS && !is_preflight(&req) {
                app.clone()
            } else {
                with_cors.clone()
            };
            target.oneshot(req)
        }))
        .layer(TraceLayer::new_for_http())
}

fn is_preflight(req: &Request) -> bool {
    req.method() == Method::OPTIONS
        && req.headers().contains_key(header::ORIGIN)
        && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

fn local_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &HeaderValue, _: &request::Parts| is_local_origin(origin.as_bytes()),
        ))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}

/// `http://localhost` or `http://127.x.y.z`, with an optional port.
pub fn is_local_origin(origin: &[u8]) -> bool {
    let Ok(origin) = std::str::from_utf8(origin) else {
        return false;
    };
    let Some(authority) = origin.strip_prefix("http://") else {
        return false;
    };
    let host = match authority.split_once(':') {
        Some((host, port)) => {
            if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
                return false;
            }
            host
        }
        None => authority,
    };
    if host == "localhost" {
        return true;
    }
    let octets: Vec<&str> = host.split('.').collect();
    octets.len() == 4
        && octets[0] == "127"
        && octets.iter().all(|octet| {
            !octet.is_empty() && octet.len() <= 3 && octet.bytes().all(|b| b.is_ascii_digit())
        })
}
