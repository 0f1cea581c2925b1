// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relay transport contract.
//!
//! The relay owns pairing crypto, message delivery and reconnection. The
//! bridge only consumes this trait; see [`crate::relay`] for the HTTP sidecar
//! adapter used in production.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::BridgeError;
use super::types::{
    ApproveSessionParams, ApprovedSession, DisconnectSessionParams, EmitSessionEventParams,
    RejectSessionParams, RespondSessionRequestParams,
};

/// The relay refused an operation (malformed URI, proposal already resolved,
/// unknown topic, unreachable sidecar).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outbound operations of a WalletConnect v2 sign client.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn pair(&self, uri: &str) -> Result<(), TransportError>;

    async fn approve_session(
        &self,
        params: ApproveSessionParams,
    ) -> Result<ApprovedSession, TransportError>;

    async fn reject_session(&self, params: RejectSessionParams) -> Result<(), TransportError>;

    async fn respond_session_request(
        &self,
        params: RespondSessionRequestParams,
    ) -> Result<(), TransportError>;

    async fn disconnect_session(
        &self,
        params: DisconnectSessionParams,
    ) -> Result<(), TransportError>;

    async fn emit_session_event(
        &self,
        params: EmitSessionEventParams,
    ) -> Result<(), TransportError>;
}

/// Slot holding the transport once it has been initialized.
///
/// Cloning shares the slot, so every component sees initialization at once.
#[derive(Clone, Default)]
pub struct TransportHandle {
    inner: Arc<RwLock<Option<Arc<dyn RelayTransport>>>>,
}

impl TransportHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the transport. Replaces any previously installed one.
    pub async fn install(&self, transport: Arc<dyn RelayTransport>) {
        *self.inner.write().await = Some(transport);
    }

    pub async fn is_initialized(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// The installed transport, or `NotInitialized`.
    pub async fn get(&self) -> Result<Arc<dyn RelayTransport>, BridgeError> {
        self.inner
            .read()
            .await
            .clone()
            .ok_or(BridgeError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    #[tokio::test]
    async fn handle_reports_not_initialized_until_installed() {
        let handle = TransportHandle::new();
        assert!(!handle.is_initialized().await);
        assert_eq!(handle.get().await.err(), Some(BridgeError::NotInitialized));

        handle.install(Arc::new(RecordingTransport::new("abc123"))).await;
        assert!(handle.is_initialized().await);
        assert!(handle.get().await.is_ok());

        // Clones share the slot.
        let shared = handle.clone();
        assert!(shared.is_initialized().await);
    }
}
