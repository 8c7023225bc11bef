// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use krosswalks_wallet::{
    api::router,
    chain::SolanaRpcClient,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    identity::LocalIdentityProvider,
    session::SessionOrchestrator,
    state::AppState,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let rpc = SolanaRpcClient::new(config.chain.rpc_target.clone())?;
    let identity = LocalIdentityProvider::new(config.local_identity.clone());
    let orchestrator = SessionOrchestrator::new(
        Arc::new(identity),
        Arc::new(rpc),
        config.identity_options(),
        config.ramp.clone(),
    );
    let state = AppState::new(orchestrator);

    // Identity setup runs in the background; the view reports `initializing`
    // until it finishes.
    let startup = state.orchestrator.clone();
    tokio::spawn(async move {
        startup.initialize().await;
    });

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        signal_token.cancel();
    });

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        app = %config.app_name,
        network = %config.chain.display_name,
        rpc = %config.chain.rpc_target,
        "{} wallet service listening (docs at /docs)",
        config.app_name
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}
