//! # autolightsd
//!
//! Composition root that wires the host, the controller and the HTTP
//! inspection surface together.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and install tracing
//! - Construct the event bus and the virtual host (adapter)
//! - Set up the controller, run the startup sync, then drive it from the bus
//! - Publish a reconciliation tick every `tick.interval_secs`
//! - Build the axum router and serve it until SIGTERM/SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no controller logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use autolights_adapter_http_axum::router;
use autolights_adapter_http_axum::state::AppState;
use autolights_adapter_virtual::VirtualHost;
use autolights_app::controller::AutoLights;
use autolights_app::event_bus::InProcessEventBus;
use autolights_app::runner;
use autolights_domain::time::now;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter()))
        .init();

    // Event bus and host
    let bus = Arc::new(InProcessEventBus::new(256));
    let host = Arc::new(VirtualHost::new(&config.virtual_host, Arc::clone(&bus)));
    tracing::info!(entities = host.entity_ids().len(), "virtual host ready");

    // Controller
    let mut controller =
        AutoLights::setup(config.autolights.clone(), Arc::clone(&host), Arc::clone(&host)).await?;
    let events = bus.subscribe();
    controller.initialize(now()).await;

    let (snapshots, tracked) = watch::channel(controller.snapshot());
    let controller_task = tokio::spawn(runner::run(controller, events, snapshots));
    let ticker = runner::spawn_ticker(
        Arc::clone(&bus),
        Duration::from_secs(config.tick.interval_secs),
    );

    // HTTP
    let app = router::build(AppState::new(host, tracked));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "autolightsd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ticker.abort();
    controller_task.abort();
    tracing::info!("autolightsd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
