use anyhow::Context;
use departures_core::ServiceConfig;
use departures_server::{load_store, start_server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("failed to load service configuration")?;

    if let Err(err) = departures_core::logging::init_tracing(config.log_level.as_deref()) {
        eprintln!("failed to initialise tracing: {err}");
    }

    let store = load_store(&config)?;
    let handle = start_server(&config, store).await?;
    info!(addr = %handle.addr, "departures-server ready");

    shutdown_signal().await;
    info!("shutdown signal received");
    handle.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
