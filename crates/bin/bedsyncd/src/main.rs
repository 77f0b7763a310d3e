//! # bedsyncd: bedsync daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Seed the device store from the configured devices
//! - Log in to the SleepIQ service
//! - Spawn the poll loop keeping devices in sync with the account
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT), stopping the poll loop with the server
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use bedsync_adapter_http_axum::router;
use bedsync_adapter_http_axum::state::AppState;
use bedsync_adapter_memory::InMemoryDeviceStore;
use bedsync_adapter_sleepiq::SleepIqClient;
use bedsync_app::ports::RemoteSession;
use bedsync_app::services::account_service::AccountService;
use bedsync_app::services::command_service::CommandService;
use bedsync_app::services::poll_loop::{PollLoop, login_failure_message};
use bedsync_app::services::reconcile::Reconciler;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("unable to load configuration")?;
    init_tracing(&config)?;

    // Adapters
    let store = InMemoryDeviceStore::seeded(config.local_devices()?)
        .context("unable to seed the device store")?;
    let client = SleepIqClient::new(&config.sleepiq, config.credentials())
        .context("unable to build the SleepIQ client")?;

    login(&client).await?;

    // Poll loop
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poll_loop = PollLoop::new(
        Reconciler::new(client.clone(), store.clone()),
        config.poll_config(),
    );
    let poller = tokio::spawn(poll_loop.run(shutdown_rx));

    // HTTP
    let state = AppState::new(
        CommandService::new(client.clone(), store.clone()),
        AccountService::new(client),
        store,
    );
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("unable to bind {bind_addr}"))?;
    tracing::info!("bedsyncd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The loop may already be gone if it panicked; the join below reports it.
    let _ = shutdown_tx.send(true);
    poller.await.context("poll loop terminated abnormally")?;
    tracing::info!("bedsyncd stopped");

    Ok(())
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let mut filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    if config.logging.debug {
        filter = filter.add_directive("bedsync=debug".parse()?);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Establish the first session.
///
/// Rejected credentials stop the daemon. Any other failure is logged and left
/// to the poll loop, which logs in again on its first tick.
async fn login(client: &SleepIqClient) -> anyhow::Result<()> {
    match client.login().await {
        Ok(()) => {
            tracing::info!("logged in to the SleepIQ service");
            Ok(())
        }
        Err(err) if err.is_authentication() => {
            tracing::error!("{}", login_failure_message(&err));
            Err(err).context("SleepIQ credentials rejected")
        }
        Err(err) => {
            tracing::error!("{}", login_failure_message(&err));
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "unable to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
