//! The /graphql endpoint
//!
//! One POST route carries every operation. The handler extracts the
//! session from the Cookie header (never rejecting on its own), attaches
//! a per-request cookie sink, executes the schema, and copies any pushed
//! Set-Cookie values plus the credentialed CORS headers onto the reply.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, SET_COOKIE};
use hyper::http::response::Builder;
use hyper::{Request, Response, StatusCode};
use tracing::debug;

use crate::auth::cookies::Session;
use crate::graphql::CookieSink;
use crate::server::AppState;

/// Handle POST /graphql
pub async fn handle_graphql(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let cookie_header = req
        .headers()
        .get(hyper::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = req.collect().await?.to_bytes();

    let gql_request: async_graphql::Request = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected malformed GraphQL request: {}", e);
            return Ok(with_cors(
                Response::builder().status(StatusCode::BAD_REQUEST),
                &state.args.allowed_origin,
            )
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(format!(
                r#"{{"errors":[{{"message":"Invalid request body: {}"}}]}}"#,
                e
            ))))
            .unwrap());
        }
    };

    let session = Session::from_cookie_header(&state.tokens, cookie_header.as_deref());
    let sink = Arc::new(CookieSink::default());

    let response = state
        .schema
        .execute(gql_request.data(session).data(Arc::clone(&sink)))
        .await;

    let body = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"errors":[{"message":"Serialization failed"}]}"#.to_string());

    let mut builder = with_cors(
        Response::builder().status(StatusCode::OK),
        &state.args.allowed_origin,
    )
    .header("Content-Type", "application/json");

    for cookie in sink.drain() {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            builder = builder.header(SET_COOKIE, value);
        }
    }

    Ok(builder.body(Full::new(Bytes::from(body))).unwrap())
}

/// Handle OPTIONS /graphql (CORS preflight)
pub fn handle_preflight(state: &AppState) -> Response<Full<Bytes>> {
    with_cors(
        Response::builder().status(StatusCode::NO_CONTENT),
        &state.args.allowed_origin,
    )
    .header("Access-Control-Allow-Methods", "POST, OPTIONS")
    .header("Access-Control-Allow-Headers", "Content-Type")
    .header("Access-Control-Max-Age", "86400")
    .body(Full::new(Bytes::new()))
    .unwrap()
}

/// Credentialed CORS headers for the configured browser origin
fn with_cors(builder: Builder, origin: &str) -> Builder {
    builder
        .header("Access-Control-Allow-Origin", origin)
        .header("Access-Control-Allow-Credentials", "true")
        .header("Vary", "Origin")
}
