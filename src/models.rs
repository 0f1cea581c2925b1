// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Bridge Data Models
//!
//! Domain types shared by the WalletConnect core and the control API.
//! Types exposed over HTTP derive `ToSchema` for the OpenAPI document.
//!
//! ## Identifier Formats
//!
//! - Namespace / chain id: `stacks:<network>` (e.g. `stacks:mainnet`)
//! - Account id: `stacks:<network>:<address>`

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Chain family prefix used in namespace, chain and account identifiers.
pub const CHAIN_FAMILY: &str = "stacks";

/// Symbol reported for every account exposed to a dApp.
pub const STX_SYMBOL: &str = "STX";

// =============================================================================
// Network
// =============================================================================

/// Stacks network a session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StacksNetwork {
    Mainnet,
    Testnet,
    Devnet,
}

impl StacksNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            StacksNetwork::Mainnet => "mainnet",
            StacksNetwork::Testnet => "testnet",
            StacksNetwork::Devnet => "devnet",
        }
    }

    /// CAIP-2 style chain identifier, e.g. `stacks:testnet`.
    pub fn chain_id(&self) -> String {
        format!("{CHAIN_FAMILY}:{}", self.as_str())
    }

    /// CAIP-10 style account identifier, e.g. `stacks:mainnet:SP3F...`.
    pub fn account_id(&self, address: &str) -> String {
        format!("{}:{address}", self.chain_id())
    }

    /// Resolve a chain identifier back to its network.
    pub fn from_chain_id(chain_id: &str) -> Option<Self> {
        let (family, network) = chain_id.split_once(':')?;
        if family != CHAIN_FAMILY {
            return None;
        }
        network.parse().ok()
    }
}

impl fmt::Display for StacksNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StacksNetwork {
    type Err = String;

    /// Case-insensitive parse of `mainnet`, `testnet` or `devnet`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(StacksNetwork::Mainnet),
            "testnet" => Ok(StacksNetwork::Testnet),
            "devnet" => Ok(StacksNetwork::Devnet),
            other => Err(format!(
                "Unknown Stacks network `{other}` (expected mainnet, testnet or devnet)"
            )),
        }
    }
}

// =============================================================================
// Accounts & Sessions
// =============================================================================

/// An account exposed to a dApp for the lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StacksAccount {
    /// Asset symbol, always `STX` for accounts approved by this bridge.
    pub symbol: String,
    /// Stacks principal (e.g. `SP3F7GQ48JY59521DZEE6KABHBF4Q33PEYJ823ZXQ`).
    pub address: String,
}

impl StacksAccount {
    pub fn stx(address: impl Into<String>) -> Self {
        Self {
            symbol: STX_SYMBOL.to_string(),
            address: address.into(),
        }
    }
}

/// Metadata a dApp publishes about itself when proposing a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(default)]
pub struct PeerMetadata {
    pub name: String,
    pub url: String,
    pub description: String,
    pub icons: Vec<String>,
}

/// An approved dApp ↔ wallet relationship.
///
/// Sessions are immutable snapshots: they are inserted on approval and removed
/// on disconnect, never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Session {
    /// Relay-assigned session topic (primary key).
    pub topic: String,
    /// Accounts exposed to the dApp, in approval order.
    pub accounts: Vec<StacksAccount>,
    /// Network the session is bound to.
    pub network: StacksNetwork,
    /// The dApp that proposed the session.
    pub peer: PeerMetadata,
    /// When the session was approved.
    pub created_at: DateTime<Utc>,
}


// =============================================================================
// Session Events
// =============================================================================

/// Session events the wallet may push to a connected dApp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SessionEventName {
    AddressChanged,
    NetworkChanged,
}

impl SessionEventName {
    /// Every event approved for a session, in declaration order.
    pub const ALL: [SessionEventName; 2] = [
        SessionEventName::AddressChanged,
        SessionEventName::NetworkChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEventName::AddressChanged => "addressChanged",
            SessionEventName::NetworkChanged => "networkChanged",
        }
    }
}

// =============================================================================
// Control API Requests
// =============================================================================

/// Body of `POST /v1/pair`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PairRequest {
    /// Pairing URI scanned from a QR code or received through a deep link.
    pub uri: String,
}

/// Acknowledgement returned once the relay accepted a pairing URI.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PairResponse {
    /// Pairing topic extracted from the URI.
    pub pairing_topic: String,
    /// Pairing expiry as a unix timestamp, when the URI carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_timestamp: Option<i64>,
}

/// Body of `POST /v1/sessions/{topic}/events`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct EmitSessionEventRequest {
    pub name: SessionEventName,
    /// Event payload forwarded verbatim to the dApp.
    #[schema(value_type = Object)]
    #[serde(default)]
    pub data: Value,
}
