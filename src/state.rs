// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::walletconnect::{TransportEvent, WalletBridge};

#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<WalletBridge>,
    /// Feeds relay events posted to the webhook into the event loop.
    pub events: mpsc::Sender<TransportEvent>,
}

impl AppState {
    pub fn new(bridge: Arc<WalletBridge>, events: mpsc::Sender<TransportEvent>) -> Self {
        Self { bridge, events }
    }
}
