//! Request identification and access logging.
//!
//! # Responsibilities
//! - Assign an `x-request-id` (UUID v4) as early as possible
//! - Log one access line per request, optionally with client location
//!
//! # Design Decisions
//! - The access line for geolocated requests is emitted from a spawned task
//!   so the lookup never delays the response

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::observability::GeoLocator;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that stamps incoming requests with a UUID request ID.
pub fn set_request_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Middleware writing the access log.
pub async fn access_log(
    State(geo): State<Option<GeoLocator>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match (geo, peer) {
        (Some(geo), Some(peer)) => {
            tokio::spawn(async move {
                let location = geo.locate(peer.ip()).await;
                tracing::info!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status,
                    elapsed_ms,
                    client = %peer,
                    location = %location,
                    "Request served"
                );
            });
        }
        _ => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                elapsed_ms,
                "Request served"
            );
        }
    }

    response
}
