// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! WalletConnect wire types exchanged with the relay transport.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::PeerMetadata;

/// JSON-RPC protocol version carried by every response.
pub const JSONRPC_VERSION: &str = "2.0";

/// Application error code used for every handler failure.
pub const APPLICATION_ERROR_CODE: i64 = 5000;

/// Error code for methods outside the approved method table.
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;

// =============================================================================
// Inbound events
// =============================================================================

/// Capabilities a dApp asks for under one namespace key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProposalNamespace {
    pub chains: Vec<String>,
    pub methods: Vec<String>,
    pub events: Vec<String>,
}

/// A dApp's request to establish a session. Consumed exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: u64,
    #[serde(default)]
    pub proposer: PeerMetadata,
    #[serde(default)]
    pub required_namespaces: BTreeMap<String, ProposalNamespace>,
    #[serde(default)]
    pub optional_namespaces: BTreeMap<String, ProposalNamespace>,
}

/// An inbound JSON-RPC call on an established session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestEvent {
    pub topic: String,
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
}

/// Events delivered by the relay, in delivery order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportEvent {
    SessionProposal(Proposal),
    SessionRequest(RequestEvent),
    SessionDelete { topic: String },
}

// =============================================================================
// JSON-RPC responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Exactly one of `result` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum JsonRpcOutcome {
    Result(Value),
    Error(JsonRpcError),
}

/// Response correlated with a [`RequestEvent`] by `id`.
///
/// Serializes as `{id, jsonrpc: "2.0", result}` or
/// `{id, jsonrpc: "2.0", error: {code, message}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub id: u64,
    pub jsonrpc: String,
    #[serde(flatten)]
    pub outcome: JsonRpcOutcome,
}

impl JsonRpcResponse {
    pub fn result(id: u64, result: Value) -> Self {
        Self {
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
            outcome: JsonRpcOutcome::Result(result),
        }
    }

    pub fn error(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
            outcome: JsonRpcOutcome::Error(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, JsonRpcOutcome::Error(_))
    }
}

// =============================================================================
// Outbound calls
// =============================================================================

/// Reason attached to rejections and disconnects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SdkReason {
    pub code: i64,
    pub message: String,
}

impl SdkReason {
    pub fn user_rejected() -> Self {
        Self {
            code: 5000,
            message: "User rejected.".to_string(),
        }
    }

    pub fn user_disconnected() -> Self {
        Self {
            code: 6000,
            message: "User disconnected.".to_string(),
        }
    }
}

/// Namespace granted to a dApp on approval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionNamespace {
    pub chains: Vec<String>,
    pub methods: Vec<String>,
    pub events: Vec<String>,
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApproveSessionParams {
    pub id: u64,
    pub namespaces: BTreeMap<String, SessionNamespace>,
    pub session_properties: BTreeMap<String, String>,
}

/// What the relay hands back after materializing a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApprovedSession {
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectSessionParams {
    pub id: u64,
    pub reason: SdkReason,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RespondSessionRequestParams {
    pub topic: String,
    pub response: JsonRpcResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisconnectSessionParams {
    pub topic: String,
    pub reason: SdkReason,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionEvent {
    pub name: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmitSessionEventParams {
    pub topic: String,
    pub event: SessionEvent,
    pub chain_id: String,
}
