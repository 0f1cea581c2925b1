// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing backend capability.
//!
//! The request handlers never build or sign Stacks transactions themselves.
//! Every signing method is delegated to a [`SigningBackend`]; the backend
//! validates the request params and produces the signature or transaction id.
//!
//! ## Default Behavior
//!
//! All trait methods default to [`SigningError::NotImplemented`], so
//! [`UnwiredBackend`] reports every signing method as not implemented. A
//! concrete backend overrides the methods it supports.
//!
//! ## Param Shapes
//!
//! | Method | Params |
//! |--------|--------|
//! | `stx_transferStx` | [`TransferStxParams`] |
//! | `stx_signTransaction` | [`SignTransactionParams`] |
//! | `stx_signMessage` | [`SignMessageParams`] |
//! | `stx_signStructuredMessage` | [`SignStructuredMessageParams`] |
//! | `stx_callContract` | [`CallContractParams`] |

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Session;

/// Errors a signing backend can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    /// No backend is wired for this method.
    #[error("{0} is not implemented")]
    NotImplemented(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// The wallet user declined the request.
    #[error("Request declined: {0}")]
    Declined(String),

    #[error("Signing failed: {0}")]
    Failed(String),
}

/// One method per signing RPC operation.
///
/// Each method receives the session the request arrived on and the raw
/// request params, and returns the JSON-RPC `result` payload.
#[async_trait]
pub trait SigningBackend: Send + Sync {
    async fn transfer_stx(&self, _session: &Session, _params: Value) -> Result<Value, SigningError> {
        Err(SigningError::NotImplemented("stx_transferStx".to_string()))
    }

    async fn sign_transaction(
        &self,
        _session: &Session,
        _params: Value,
    ) -> Result<Value, SigningError> {
        Err(SigningError::NotImplemented("stx_signTransaction".to_string()))
    }

    async fn sign_message(&self, _session: &Session, _params: Value) -> Result<Value, SigningError> {
        Err(SigningError::NotImplemented("stx_signMessage".to_string()))
    }

    async fn sign_structured_message(
        &self,
        _session: &Session,
        _params: Value,
    ) -> Result<Value, SigningError> {
        Err(SigningError::NotImplemented(
            "stx_signStructuredMessage".to_string(),
        ))
    }

    async fn call_contract(&self, _session: &Session, _params: Value) -> Result<Value, SigningError> {
        Err(SigningError::NotImplemented("stx_callContract".to_string()))
    }
}

/// Backend used when no signer is wired: every method is not implemented.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnwiredBackend;

#[async_trait]
impl SigningBackend for UnwiredBackend {}

/// Deserialize request params into a typed shape.
pub fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, SigningError> {
    serde_json::from_value(params).map_err(|e| SigningError::InvalidParams(e.to_string()))
}

// =============================================================================
// Param shapes
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferStxParams {
    pub recipient: String,
    /// Amount in micro-STX, as a decimal string.
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionParams {
    /// Hex-encoded serialized transaction.
    pub transaction: String,
    #[serde(default)]
    pub broadcast: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageParams {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignStructuredMessageParams {
    /// Hex-encoded Clarity value.
    pub message: String,
    /// Hex-encoded Clarity domain tuple.
    pub domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallContractParams {
    /// Fully qualified contract id, `<principal>.<contract-name>`.
    pub contract: String,
    pub function_name: String,
    /// Hex-encoded Clarity arguments.
    #[serde(default)]
    pub function_args: Vec<String>,
}
