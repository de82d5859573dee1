use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn, Level};
use tracing_subscriber;

use doorman::bus::{EventBus, ThrottleEvent};
use doorman::config::DoormanConfig;
use doorman::grpc::GrpcServer;
use doorman::throttle::{spawn_sweeper, AttemptLimiter};

#[derive(Parser, Debug)]
#[command(name = "doorman")]
#[command(about = "Attempt throttling service for abuse-prone endpoints")]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .init();

    info!("Starting Doorman Attempt Throttling Service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // Load configuration
    let config = match args.config {
        Some(path) => DoormanConfig::from_file(&path)?,
        None => DoormanConfig::default(),
    };
    let policy = config.throttle.policy()?;
    info!(
        grpc_addr = %config.server.grpc_addr,
        max_attempts = config.throttle.max_attempts,
        window_ms = config.throttle.window_ms,
        "Configuration loaded"
    );

    // Initialize the limiter with an event bus for block notifications
    let events = EventBus::default();
    let limiter = Arc::new(AttemptLimiter::with_events(events.clone()));
    info!("Attempt limiter initialized");

    // Log throttle events as they happen
    let mut event_rx = events.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            match event {
                ThrottleEvent::Blocked {
                    identifier,
                    blocked_until_ms,
                } => {
                    warn!(
                        identifier = %identifier,
                        blocked_until_ms = blocked_until_ms,
                        "Identifier blocked"
                    );
                }
                ThrottleEvent::Reset { identifier } => {
                    info!(identifier = %identifier, "Identifier reset");
                }
                ThrottleEvent::Swept { removed } => {
                    info!(removed = removed, "Expired entries swept");
                }
            }
        }
    });

    // Start the housekeeping sweeper
    let sweeper = spawn_sweeper(limiter.clone(), config.throttle.sweep_interval());
    info!(
        interval_secs = config.throttle.sweep_interval_secs,
        "Sweeper started"
    );

    // Create and start the gRPC server
    let grpc_server = GrpcServer::new(config.server.grpc_addr, limiter, policy);

    info!("Starting gRPC server on {}", config.server.grpc_addr);

    // Run the server with graceful shutdown on Ctrl+C
    grpc_server.serve_with_shutdown(shutdown_signal()).await?;

    sweeper.shutdown().await;

    info!("Doorman Attempt Throttling Service stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
