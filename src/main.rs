// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use stacks_walletconnect_bridge::{
    api::router,
    config::BridgeConfig,
    logging::init_logging,
    relay::HttpRelayTransport,
    signing::UnwiredBackend,
    state::AppState,
    walletconnect::{events::EVENT_CHANNEL_CAPACITY, EventLoop, WalletBridge},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let config = match BridgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let transport = match HttpRelayTransport::new(
        config.relay_sidecar_url.clone(),
        config.relay_timeout,
    ) {
        Ok(transport) => transport,
        Err(e) => {
            error!(error = %e, "Failed to create relay transport");
            return ExitCode::FAILURE;
        }
    };

    if config.wallet_address.is_none() {
        warn!("WALLET_STX_ADDRESS not set, every session proposal will be rejected");
    }

    let bridge = Arc::new(WalletBridge::new(
        config.approval_policy(),
        Arc::new(UnwiredBackend),
    ));
    bridge.initialize(Arc::new(transport)).await;

    // Relay webhook -> event loop
    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let shutdown = CancellationToken::new();
    let event_loop = tokio::spawn(EventLoop::new(bridge.clone()).run(events_rx, shutdown.clone()));

    let app = router(AppState::new(bridge, events_tx));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %addr, error = %e, "Failed to bind control API");
            shutdown.cancel();
            return ExitCode::FAILURE;
        }
    };

    info!(
        addr = %addr,
        relay = %config.relay_sidecar_url,
        network = %config.network,
        "Stacks WalletConnect bridge listening (docs at /docs)"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    shutdown.cancel();
    if let Err(e) = event_loop.await {
        warn!(error = %e, "Event loop task failed");
    }

    match served {
        Ok(()) => {
            info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Control API server failed");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
