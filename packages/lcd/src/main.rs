//! `lcd` binary: wires configuration, collaborators, the directory core,
//! background timers, and the RPC surface together, then serves until a
//! shutdown signal arrives.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use lcd::access::AllowAllAccessController;
use lcd::cli::Cli;
use lcd::directory::LocalCapabilitiesDirectory;
use lcd::gcd::{GcdClient, InMemoryGcdClient};
use lcd::persistence::{JsonFilePersistence, NullPersistence, PersistenceStore};
use lcd::router::{MessageRouter, RecordingMessageRouter};
use lcd::rpc::{build_router, AppState};
use lcd::shutdown::ShutdownController;
use lcd::timers;
use lcd_core::{ClockSource, SystemClock};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.to_config();

    let persistence: Arc<dyn PersistenceStore> = if config.persistency_enabled {
        Arc::new(JsonFilePersistence::new(config.persistence_filename.clone()))
    } else {
        Arc::new(NullPersistence)
    };

    // The real GCD proxy and message router are external collaborators
    // (§1 "Out of scope"); the binary wires in-memory/recording stand-ins
    // so the service is runnable standalone. A deployment wires real
    // implementations of `GcdClient`/`MessageRouter` here instead.
    let gcd: Arc<dyn GcdClient> = Arc::new(InMemoryGcdClient::new());
    let router: Arc<dyn MessageRouter> = Arc::new(RecordingMessageRouter::new());
    let access = Arc::new(AllowAllAccessController);
    let clock: Arc<dyn ClockSource> = Arc::new(SystemClock);

    let directory = Arc::new(LocalCapabilitiesDirectory::new(
        gcd,
        router,
        access,
        persistence,
        clock,
        config,
    ));
    directory.load_persisted().await.context("loading persisted discovery entries")?;

    let shutdown = Arc::new(ShutdownController::new());
    let timer_handles = timers::spawn_all(&directory, &shutdown);

    let state = AppState { directory: Arc::clone(&directory), shutdown: Arc::clone(&shutdown) };
    let app = build_router(state);

    let listener = TcpListener::bind(&cli.bind_addr).await.context("binding RPC listener")?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "local capabilities directory listening");
    shutdown.set_ready();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving RPC surface")?;

    shutdown.trigger_shutdown();
    for handle in timer_handles {
        let _ = handle.await;
    }
    directory.flush_on_shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
