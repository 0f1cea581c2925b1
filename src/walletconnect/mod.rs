// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! WalletConnect v2 session bridge for the Stacks namespace.
//!
//! ## Components
//!
//! - `store` - in-memory session store (topic → session)
//! - `pairing` - hands pairing URIs to the relay
//! - `proposal` - approves or rejects session proposals via a policy
//! - `dispatcher` - routes requests and guarantees one response each
//! - `handlers` - the fixed Stacks method table
//! - `transport` - the relay contract this module consumes
//! - `events` - serial event loop fed by the relay
//!
//! ## Data Flow
//!
//! ```text
//! relay ──session_proposal──▶ ProposalNegotiator ──approve──▶ SessionStore
//! relay ──session_request───▶ RequestDispatcher ──▶ MethodHandlers ──▶ SigningBackend
//!                                     │
//! relay ◀──respondSessionRequest──────┘
//! relay ──session_delete────▶ SessionStore::remove
//! ```

pub mod dispatcher;
pub mod error;
pub mod events;
pub mod handlers;
pub mod pairing;
pub mod proposal;
pub mod store;
pub mod transport;
pub mod types;

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::models::{Session, SessionEventName, StacksNetwork};
use crate::signing::SigningBackend;

pub use dispatcher::RequestDispatcher;
pub use error::BridgeError;
pub use events::EventLoop;
pub use handlers::{MethodHandlers, StacksMethod};
pub use pairing::{PairingInitiator, PairingUri};
pub use proposal::{
    ApprovalDecision, ApprovalPolicy, ProposalNegotiator, RejectAllPolicy, StaticAccountPolicy,
};
pub use store::{SessionStore, SharedSessionStore};
pub use transport::{RelayTransport, TransportError, TransportHandle};
pub use types::*;

/// Wallet-side WalletConnect bridge.
///
/// Owns the session store and wires the pairing initiator, proposal
/// negotiator and request dispatcher to one relay transport. The transport is
/// installed with [`WalletBridge::initialize`]; until then every relay-facing
/// operation fails with [`BridgeError::NotInitialized`].
pub struct WalletBridge {
    transport: TransportHandle,
    sessions: SharedSessionStore,
    pairing: PairingInitiator,
    negotiator: ProposalNegotiator,
    dispatcher: RequestDispatcher,
}

impl WalletBridge {
    pub fn new(policy: Arc<dyn ApprovalPolicy>, backend: Arc<dyn SigningBackend>) -> Self {
        let transport = TransportHandle::new();
        let sessions = SessionStore::shared();

        Self {
            pairing: PairingInitiator::new(transport.clone()),
            negotiator: ProposalNegotiator::new(transport.clone(), sessions.clone(), policy),
            dispatcher: RequestDispatcher::new(MethodHandlers::new(sessions.clone(), backend)),
            transport,
            sessions,
        }
    }

    pub async fn initialize(&self, transport: Arc<dyn RelayTransport>) {
        self.transport.install(transport).await;
        info!("WalletConnect transport initialized");
    }

    pub async fn is_initialized(&self) -> bool {
        self.transport.is_initialized().await
    }

    /// Handle to the session store, for read access from the control API.
    pub fn sessions(&self) -> SharedSessionStore {
        self.sessions.clone()
    }

    pub async fn session(&self, topic: &str) -> Option<Session> {
        self.sessions.read().await.get(topic).cloned()
    }

    pub async fn list_sessions(&self) -> Vec<Session> {
        self.sessions.read().await.list()
    }

    pub async fn pair(&self, uri: &str) -> Result<PairingUri, BridgeError> {
        self.pairing.pair(uri).await
    }

    pub async fn approve(
        &self,
        proposal: Proposal,
        address: &str,
        network: StacksNetwork,
    ) -> Result<Session, BridgeError> {
        self.negotiator.approve(proposal, address, network).await
    }

    pub async fn reject(&self, proposal: Proposal) -> Result<(), BridgeError> {
        self.negotiator.reject(proposal).await
    }

    pub async fn on_proposal(&self, proposal: Proposal) -> Result<Option<Session>, BridgeError> {
        self.negotiator.on_proposal(proposal).await
    }

    /// Dispatch `request` and deliver its response over the relay.
    ///
    /// The response is always produced; a failed delivery is logged and not
    /// retried. The produced response is returned to the caller.
    pub async fn handle_request(&self, request: RequestEvent) -> JsonRpcResponse {
        let topic = request.topic.clone();
        let response = self.dispatcher.handle(request).await;

        let delivery = match self.transport.get().await {
            Ok(transport) => transport
                .respond_session_request(RespondSessionRequestParams {
                    topic: topic.clone(),
                    response: response.clone(),
                })
                .await
                .map_err(BridgeError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = delivery {
            warn!(topic = %topic, id = response.id, error = %e, "Failed to deliver response");
        }

        response
    }

    /// Remote disconnect: drop the session. Unknown topics are ignored.
    pub async fn on_session_delete(&self, topic: &str) {
        if self.sessions.write().await.remove(topic).is_some() {
            info!(topic = %topic, "Session deleted by peer");
        }
    }

    /// Local disconnect: drop the session, then tell the relay.
    pub async fn disconnect(&self, topic: &str) -> Result<(), BridgeError> {
        let transport = self.transport.get().await?;

        if self.sessions.write().await.remove(topic).is_none() {
            return Err(BridgeError::SessionNotFound(topic.to_string()));
        }
        info!(topic = %topic, "Session disconnected locally");

        transport
            .disconnect_session(DisconnectSessionParams {
                topic: topic.to_string(),
                reason: SdkReason::user_disconnected(),
            })
            .await?;
        Ok(())
    }

    /// Push an `addressChanged` / `networkChanged` event to the session's dApp.
    pub async fn emit_session_event(
        &self,
        topic: &str,
        name: SessionEventName,
        data: Value,
    ) -> Result<(), BridgeError> {
        let transport = self.transport.get().await?;
        let session = self
            .session(topic)
            .await
            .ok_or_else(|| BridgeError::SessionNotFound(topic.to_string()))?;

        transport
            .emit_session_event(EmitSessionEventParams {
                topic: topic.to_string(),
                event: SessionEvent {
                    name: name.as_str().to_string(),
                    data,
                },
                chain_id: session.network.chain_id(),
            })
            .await?;
        Ok(())
    }

    /// Route one relay event. Errors are logged; nothing propagates.
    pub async fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::SessionProposal(proposal) => {
                let proposal_id = proposal.id;
                if let Err(e) = self.on_proposal(proposal).await {
                    warn!(proposal_id, error = %e, "Failed to resolve session proposal");
                }
            }
            TransportEvent::SessionRequest(request) => {
                self.handle_request(request).await;
            }
            TransportEvent::SessionDelete { topic } => {
                self.on_session_delete(&topic).await;
            }
        }
    }

    /// Drop every session. Called when the event loop stops.
    pub async fn shutdown(&self) {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.clear();
        info!(sessions = count, "WalletConnect bridge shut down");
    }
}
