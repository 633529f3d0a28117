use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use switchboard::server::{DEFAULT_QUEUE_CAPACITY, DeliveryPolicy, ServerConfig, SignalingServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// WebRTC signaling relay: peers join rooms and exchange offers, answers
/// and ICE candidates over a WebSocket.
#[derive(Parser, Debug)]
#[command(name = "switchboard", version)]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Outbound envelopes buffered per connection.
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// What happens when a peer's outbound queue is full:
    /// `backpressure` or `drop-newest`.
    #[arg(long, default_value_t = DeliveryPolicy::Backpressure)]
    delivery: DeliveryPolicy,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            queue_capacity: cli.queue_capacity,
            delivery: cli.delivery,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from(Cli::parse());
    config.validate()?;

    println!("{}", "📡 Starting Switchboard relay...".green().bold());

    let server = SignalingServer::new(config);
    let listener = server
        .bind()
        .await
        .with_context(|| format!("Failed to bind {}", server.config().bind_addr()))?;

    info!(
        queue_capacity = server.config().queue_capacity,
        delivery = %server.config().delivery,
        "Relay configured"
    );

    server.serve(listener, shutdown_signal()).await?;

    println!("{}", "👋 Switchboard stopped.".cyan());
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => {
            error!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
