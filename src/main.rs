// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use axum_server::tls_rustls::RustlsConfig;
use tracing_subscriber::EnvFilter;

use verichain_server::{
    api::router,
    config::{LogFormat, ServerConfig, TlsConfig},
    state::AppState,
};

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(verichain_server::config::DEFAULT_LOG_FILTER));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

async fn serve_tls(
    addr: SocketAddr,
    tls: &TlsConfig,
    app: axum::Router,
) -> Result<(), Box<dyn std::error::Error>> {
    // Install the ring crypto provider for rustls before any TLS operations.
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install rustls crypto provider")?;

    let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(None);
    });

    tracing::info!(%addr, "VeriChain server listening on https (docs at /docs)");
    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;
    Ok(())
}

async fn serve_plain(addr: SocketAddr, app: axum::Router) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "VeriChain server listening on http (docs at /docs)");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    let state = match &config.data_dir {
        Some(dir) => {
            tracing::info!(data_dir = %dir.display(), "Using persistent storage");
            AppState::persistent(&config.jwt_secret, dir)?
        }
        None => {
            tracing::warn!("DATA_DIR not set; accounts and login history are kept in memory");
            AppState::in_memory(&config.jwt_secret)
        }
    };
    let app = router(state);

    match &config.tls {
        Some(tls) => serve_tls(config.bind_addr, tls, app).await,
        None => serve_plain(config.bind_addr, app).await,
    }
}
