// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors raised by the WalletConnect core.

use crate::signing::SigningError;

use super::transport::TransportError;
use super::types::{JsonRpcError, APPLICATION_ERROR_CODE, METHOD_NOT_FOUND_CODE};

/// Errors that can occur while pairing, negotiating or serving requests.
///
/// Pairing and negotiation errors propagate to the caller. Errors raised by a
/// method handler are converted into a JSON-RPC error at the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("WalletConnect transport is not initialized")]
    NotInitialized,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Chain {requested} does not match session chain {session}")]
    ChainMismatch { requested: String, session: String },

    #[error("Signing backend error: {0}")]
    Backend(String),
}

impl BridgeError {
    /// JSON-RPC error body sent back to the dApp for this failure.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        let code = match self {
            BridgeError::UnsupportedMethod(_) => METHOD_NOT_FOUND_CODE,
            _ => APPLICATION_ERROR_CODE,
        };
        JsonRpcError {
            code,
            message: self.to_string(),
        }
    }
}

impl From<SigningError> for BridgeError {
    fn from(e: SigningError) -> Self {
        match e {
            SigningError::NotImplemented(_) => BridgeError::NotImplemented(e.to_string()),
            other => BridgeError::Backend(other.to_string()),
        }
    }
}
