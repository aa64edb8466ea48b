pub mod health;
pub mod routes;
pub mod routing;

use std::net::SocketAddr;

use anyhow::Context;
use departures_core::ServiceConfig;
use departures_engine::{BoardRuntime, ScheduleStore};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

use routing::build_app;

/// Loads board configuration and reference data, then builds an empty store.
///
/// Any configuration problem surfaces here, before the listener is bound.
pub fn load_store(config: &ServiceConfig) -> anyhow::Result<ScheduleStore> {
    ScheduleStore::from_service_config(config).context("invalid board configuration")
}

/// Handle returned when the server is started programmatically.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Stops accepting requests, then stops the board timers.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

/// Starts the board runtime and serves it on `config.bind_address`.
pub async fn start_server(
    config: &ServiceConfig,
    store: ScheduleStore,
) -> anyhow::Result<ServerHandle> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("invalid bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    let actual_addr = listener
        .local_addr()
        .context("failed to read socket address")?;
    info!(%actual_addr, "starting departures-server");

    let mut runtime = BoardRuntime::new(store.clone());
    runtime.start();
    let app = build_app(store, config.public_dir.as_deref());

    let (tx, rx) = oneshot::channel();
    let task = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await
        {
            error!(?err, "departures-server terminated with error");
        }
        runtime.shutdown().await;
    });

    Ok(ServerHandle {
        addr: actual_addr,
        shutdown: tx,
        task,
    })
}
