// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Relay Event Loop
//!
//! Drains relay events one at a time, so requests on a topic are handled in
//! delivery order and a proposal is resolved before the next event starts.
//!
//! ## Shutdown
//!
//! Stops when the cancellation token fires or every sender is dropped, then
//! clears the session store.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::types::TransportEvent;
use super::WalletBridge;

/// Default capacity of the relay event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

pub struct EventLoop {
    bridge: Arc<WalletBridge>,
}

impl EventLoop {
    pub fn new(bridge: Arc<WalletBridge>) -> Self {
        Self { bridge }
    }

    /// Run until cancelled or the channel closes.
    ///
    /// ```rust,ignore
    /// tokio::spawn(EventLoop::new(bridge).run(events, shutdown.clone()));
    /// ```
    pub async fn run(self, mut events: mpsc::Receiver<TransportEvent>, shutdown: CancellationToken) {
        info!("WalletConnect event loop starting");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        debug!(event = event_kind(&event), "Relay event received");
                        self.bridge.handle_event(event).await;
                    }
                    None => {
                        info!("Relay event channel closed");
                        break;
                    }
                },
                _ = shutdown.cancelled() => {
                    info!("WalletConnect event loop shutting down");
                    break;
                }
            }
        }

        self.bridge.shutdown().await;
    }
}

fn event_kind(event: &TransportEvent) -> &'static str {
    match event {
        TransportEvent::SessionProposal(_) => "session_proposal",
        TransportEvent::SessionRequest(_) => "session_request",
        TransportEvent::SessionDelete { .. } => "session_delete",
    }
}
