//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one task per connection.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::jwt::TokenService;
use crate::config::Args;
use crate::graphql::DevLinkSchema;
use crate::routes;
use crate::types::DevLinkError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub schema: DevLinkSchema,
    pub tokens: Arc<TokenService>,
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), DevLinkError> {
    let listener = TcpListener::bind(state.args.listen)
        .await
        .map_err(|e| DevLinkError::Internal(format!("Failed to bind {}: {}", state.args.listen, e)))?;

    info!("DevLink listening on {}", state.args.listen);

    if state.args.dev_mode {
        warn!("Development mode enabled - insecure JWT fallback allowed");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("{} {}", method, path);

    let response = match (method, path.as_str()) {
        (Method::POST, "/graphql") => {
            return routes::handle_graphql(Arc::clone(&state), req).await;
        }

        (Method::OPTIONS, "/graphql") => routes::handle_preflight(&state),

        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state))
        }

        _ => routes::not_found_response(&path),
    };

    Ok(response)
}
