// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stacks RPC method table and per-method handlers.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::models::{Session, StacksNetwork};
use crate::signing::SigningBackend;

use super::error::BridgeError;
use super::store::SharedSessionStore;

/// Every RPC method the bridge can route. This is also the exact method set
/// granted to a dApp on approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StacksMethod {
    GetAddresses,
    TransferStx,
    SignTransaction,
    SignMessage,
    SignStructuredMessage,
    CallContract,
}

impl StacksMethod {
    pub const ALL: [StacksMethod; 6] = [
        StacksMethod::GetAddresses,
        StacksMethod::TransferStx,
        StacksMethod::SignTransaction,
        StacksMethod::SignMessage,
        StacksMethod::SignStructuredMessage,
        StacksMethod::CallContract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StacksMethod::GetAddresses => "stx_getAddresses",
            StacksMethod::TransferStx => "stx_transferStx",
            StacksMethod::SignTransaction => "stx_signTransaction",
            StacksMethod::SignMessage => "stx_signMessage",
            StacksMethod::SignStructuredMessage => "stx_signStructuredMessage",
            StacksMethod::CallContract => "stx_callContract",
        }
    }

    /// Look a method name up in the table. Exact, case-sensitive match.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == name)
    }
}

impl fmt::Display for StacksMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Executes one method for a session, reading the store and delegating
/// signing work to the backend.
#[derive(Clone)]
pub struct MethodHandlers {
    sessions: SharedSessionStore,
    backend: Arc<dyn SigningBackend>,
}

impl MethodHandlers {
    pub fn new(sessions: SharedSessionStore, backend: Arc<dyn SigningBackend>) -> Self {
        Self { sessions, backend }
    }

    /// Run `method` for the session on `topic`.
    ///
    /// When the request names a chain it must be the session's chain.
    pub async fn invoke(
        &self,
        method: StacksMethod,
        topic: &str,
        chain_id: Option<&str>,
        params: Value,
    ) -> Result<Value, BridgeError> {
        let session = self.session(topic).await?;
        if let Some(requested) = chain_id {
            if StacksNetwork::from_chain_id(requested) != Some(session.network) {
                return Err(BridgeError::ChainMismatch {
                    requested: requested.to_string(),
                    session: session.network.chain_id(),
                });
            }
        }

        match method {
            StacksMethod::GetAddresses => Ok(get_addresses(&session)),
            StacksMethod::TransferStx => Ok(self.backend.transfer_stx(&session, params).await?),
            StacksMethod::SignTransaction => {
                Ok(self.backend.sign_transaction(&session, params).await?)
            }
            StacksMethod::SignMessage => Ok(self.backend.sign_message(&session, params).await?),
            StacksMethod::SignStructuredMessage => {
                Ok(self.backend.sign_structured_message(&session, params).await?)
            }
            StacksMethod::CallContract => Ok(self.backend.call_contract(&session, params).await?),
        }
    }

    /// Snapshot of the session; the store lock is released before any
    /// backend call.
    async fn session(&self, topic: &str) -> Result<Session, BridgeError> {
        self.sessions
            .read()
            .await
            .get(topic)
            .cloned()
            .ok_or_else(|| BridgeError::SessionNotFound(topic.to_string()))
    }
}

fn get_addresses(session: &Session) -> Value {
    json!({ "addresses": session.accounts })
}
