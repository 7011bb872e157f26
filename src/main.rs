#![warn(clippy::pedantic, clippy::all, clippy::nursery)]

use crate::{
    config::{RuntimeConfiguration, StorageConfig},
    routes::build_router,
    state::RegistrarState,
    store::{Storage, memory::MemoryStorage, postgres::PostgresStorage},
};
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod config;
mod data;
mod error;
mod routes;
mod state;
mod store;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

/// Storage is only closed once every in-flight request has finished.
async fn serve<S: Storage>(
    storage: S,
    listener: TcpListener,
    signal: impl Future<Output = ()> + Send + 'static,
) {
    let state = RegistrarState::new(storage);
    let app = build_router(state.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await
        .expect("unable to serve app");

    state.sensible_shutdown().await;
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv {
        warn!(?e, "No .env loaded, using process environment only");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");

    let listener = TcpListener::bind(config.server_ip())
        .await
        .expect("unable to listen on server ip");
    info!(server_ip = config.server_ip(), "Listening");

    match &*config.storage() {
        StorageConfig::Postgres(db_config) => {
            info!("Using postgres storage");
            let storage = PostgresStorage::new(db_config)
                .await
                .expect("unable to open database");
            serve(storage, listener, shutdown_signal()).await;
        }
        StorageConfig::Memory => {
            warn!("Using in-memory storage, nothing will survive a restart");
            serve(MemoryStorage::default(), listener, shutdown_signal()).await;
        }
    }
}
