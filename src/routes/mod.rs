//! HTTP route handlers

mod graphql;
mod health;

pub use graphql::{handle_graphql, handle_preflight};
pub use health::health_check;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// Build a JSON response with the given status
pub fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// 404 response for unknown paths
pub fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::NOT_FOUND,
        format!(r#"{{"error":"Not found","path":"{}"}}"#, path),
    )
}
