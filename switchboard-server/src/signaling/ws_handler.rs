use crate::session::run_session;
use crate::signaling::AppState;
use crate::transport::split_websocket;
use axum::extract::State;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::warn;

/// Liveness probe served at `/`.
pub const LIVENESS_MESSAGE: &str = "Switchboard signaling relay is running!";

pub async fn root_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// Upgrades to the envelope protocol. Every client that reaches this path
/// is trusted; there is no origin check.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_failed_upgrade(|e| warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (sink, source) = split_websocket(socket);
    run_session(state.router.clone(), &state.config, source, sink).await;
}
