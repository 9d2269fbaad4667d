//! HTTP front door: routes, CORS, body limits, and the listener.

pub mod handlers;
pub mod multipart;
mod signal;

use crate::ai::AiService;
use crate::auth::{require_bearer, BearerGate};
use crate::models::Config;
use crate::Result;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Largest accepted `image` upload.
pub const MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

/// Room for the text fields and multipart framing around the image.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<dyn AiService>,
    pub render_model: Arc<str>,
}

impl AppState {
    pub fn new(ai: Arc<dyn AiService>, render_model: impl Into<Arc<str>>) -> Self {
        Self {
            ai,
            render_model: render_model.into(),
        }
    }
}

pub fn router(state: AppState, gate: BearerGate) -> Router {
    let relay = Router::new()
        .route("/tidy", post(handlers::tidy))
        .route(
            "/render",
            post(handlers::render)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + FORM_OVERHEAD_BYTES)),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_bearer));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(relay)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C or SIGTERM.
pub async fn serve(config: &Config, ai: Arc<dyn AiService>) -> Result<()> {
    let state = AppState::new(ai, config.render_model.clone());
    let app = router(state, BearerGate::new(config.bearer_token.clone()));

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("window-relay listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(signal::shutdown_signal())
        .await?;

    info!("window-relay stopped");
    Ok(())
}
