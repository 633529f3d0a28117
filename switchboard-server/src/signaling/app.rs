use crate::config::ServerConfig;
use crate::router::SignalRouter;
use crate::signaling::{root_handler, ws_handler};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub router: SignalRouter,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(router: SignalRouter, config: ServerConfig) -> Self {
        Self {
            router,
            config: Arc::new(config),
        }
    }
}

/// `/` answers a liveness string, `/ws` upgrades into the envelope protocol.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}
