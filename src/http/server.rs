//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with a single catch-all handler
//! - Wire up middleware (request ID, tracing, CORS header, access log)
//! - Dispatch each request to a responder or the live-reload hub
//! - Serve over plain HTTP, or HTTPS (HTTP/1.1 + h2) when credentials exist
//! - Stop accepting and drain on the shutdown signal

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    middleware,
    response::{sse::Sse, IntoResponse, Response},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::fallback::serve_route;
use crate::http::request::{access_log, propagate_request_id, set_request_id};
use crate::http::response::status_response;
use crate::http::static_file::serve_file;
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::live_reload::LiveReloadHub;
use crate::observability::GeoLocator;
use crate::routing::{Dispatch, NormalizedPathname, RequestRouter};

/// How long open connections get to finish once shutdown starts.
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub router: RequestRouter,
    pub hub: LiveReloadHub,
}

/// HTTP server for the served directory.
pub struct HttpServer {
    router: Router,
    config: Arc<ServerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and hub.
    pub fn new(config: Arc<ServerConfig>, hub: LiveReloadHub) -> Self {
        let state = AppState {
            router: RequestRouter::new(Arc::clone(&config)),
            config: Arc::clone(&config),
            hub,
        };
        let geo = config.geolocate.then(GeoLocator::new);

        let router = Self::build_router(state, geo);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, geo: Option<GeoLocator>) -> Router {
        Router::new()
            .fallback(handle_request)
            .with_state(state)
            .layer(middleware::from_fn_with_state(geo, access_log))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(propagate_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id())
    }

    /// The fully layered router, e.g. for driving requests in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        tls: Option<RustlsConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            protocol = self.config.protocol(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        match tls {
            None => {
                axum::serve(listener, app)
                    .with_graceful_shutdown(wait_for_shutdown(shutdown))
                    .await?;
            }
            Some(tls) => {
                let handle = axum_server::Handle::new();
                let trigger = handle.clone();
                tokio::spawn(async move {
                    wait_for_shutdown(shutdown).await;
                    trigger.graceful_shutdown(Some(GRACEFUL_TIMEOUT));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, tls)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: classify, then respond.
async fn handle_request(State(state): State<AppState>, uri: Uri) -> Response {
    let pathname = NormalizedPathname::from_raw(uri.path());

    match state.router.dispatch(&pathname).await {
        Dispatch::LiveReload => live_reload(&state.hub).await,
        Dispatch::StaticFile(path) => serve_file(&path).await.into_response(),
        Dispatch::Route(pathname) => serve_route(&state.config, &pathname).await.into_response(),
    }
}

/// Open a persistent event stream registered with the hub.
async fn live_reload(hub: &LiveReloadHub) -> Response {
    let subscription = match hub.subscribe().await {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting live reload subscription");
            return status_response(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    (
        [(header::CONNECTION, "keep-alive")],
        Sse::new(subscription),
    )
        .into_response()
}
