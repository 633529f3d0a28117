use crate::config::ServerConfig;
use crate::room::RoomRegistry;
use crate::router::SignalRouter;
use crate::signaling::{AppState, app};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// The relay process: one registry, one router, one listener.
pub struct SignalingServer {
    config: ServerConfig,
    router: SignalRouter,
}

impl SignalingServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            router: SignalRouter::new(RoomRegistry::new()),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn registry(&self) -> &RoomRegistry {
        self.router.registry()
    }

    pub fn app(&self) -> axum::Router {
        app(AppState::new(self.router.clone(), self.config.clone()))
    }

    pub async fn bind(&self) -> io::Result<TcpListener> {
        TcpListener::bind(self.config.bind_addr()).await
    }

    /// Serves until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        info!("Signaling relay listening on http://{}", addr);

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Signaling relay stopped");
        Ok(())
    }
}
