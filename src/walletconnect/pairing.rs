// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pairing initiator.
//!
//! Hands a pairing URI obtained out-of-band (QR code, deep link) to the relay.
//! Pairing never creates a session by itself; sessions only come from an
//! approved proposal.
//!
//! ## URI Format
//!
//! ```text
//! wc:{pairing_topic}@2?relay-protocol=irn&symKey={hex}&expiryTimestamp={unix}
//! ```

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use url::Url;

use super::error::BridgeError;
use super::transport::{TransportError, TransportHandle};

const PAIRING_SCHEME: &str = "wc";
const PROTOCOL_VERSION: u32 = 2;

/// A structurally valid WalletConnect v2 pairing URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingUri {
    pub topic: String,
    pub version: u32,
    pub sym_key: String,
    pub relay_protocol: String,
    pub expiry_timestamp: Option<i64>,
    raw: String,
}

// Rejected URIs surface the same way a relay rejection would.
fn invalid(reason: impl std::fmt::Display) -> BridgeError {
    BridgeError::Transport(TransportError::new(format!(
        "Invalid pairing URI: {reason}"
    )))
}

impl PairingUri {
    pub fn parse(raw: &str) -> Result<Self, BridgeError> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;

        if url.scheme() != PAIRING_SCHEME {
            return Err(invalid(format!(
                "expected `{PAIRING_SCHEME}:` scheme, got `{}:`",
                url.scheme()
            )));
        }

        let (topic, version) = url
            .path()
            .split_once('@')
            .ok_or_else(|| invalid("missing protocol version"))?;
        if topic.is_empty() {
            return Err(invalid("missing pairing topic"));
        }
        let version: u32 = version
            .parse()
            .map_err(|_| invalid(format!("invalid protocol version `{version}`")))?;
        if version != PROTOCOL_VERSION {
            return Err(invalid(format!(
                "unsupported protocol version {version} (expected {PROTOCOL_VERSION})"
            )));
        }

        let mut sym_key = None;
        let mut relay_protocol = None;
        let mut expiry_timestamp = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "symKey" => sym_key = Some(value.into_owned()),
                "relay-protocol" => relay_protocol = Some(value.into_owned()),
                "expiryTimestamp" => {
                    let expiry = value
                        .parse::<i64>()
                        .map_err(|_| invalid(format!("invalid expiryTimestamp `{value}`")))?;
                    expiry_timestamp = Some(expiry);
                }
                _ => {}
            }
        }

        let sym_key = sym_key
            .filter(|v| !v.is_empty())
            .ok_or_else(|| invalid("missing symKey"))?;
        let relay_protocol = relay_protocol
            .filter(|v| !v.is_empty())
            .ok_or_else(|| invalid("missing relay-protocol"))?;

        Ok(Self {
            topic: topic.to_string(),
            version,
            sym_key,
            relay_protocol,
            expiry_timestamp,
            raw: raw.to_string(),
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_timestamp
            .is_some_and(|expiry| expiry <= now.timestamp())
    }

    /// The URI exactly as it will be handed to the relay.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Starts pairing handshakes against the relay.
#[derive(Clone)]
pub struct PairingInitiator {
    transport: TransportHandle,
}

impl PairingInitiator {
    pub fn new(transport: TransportHandle) -> Self {
        Self { transport }
    }

    /// Validate `uri` and hand it to the relay's pairing primitive.
    pub async fn pair(&self, uri: &str) -> Result<PairingUri, BridgeError> {
        let transport = self.transport.get().await?;

        let pairing = PairingUri::parse(uri)?;
        if pairing.is_expired_at(Utc::now()) {
            return Err(invalid("pairing URI has expired"));
        }

        info!(pairing_topic = %pairing.topic, "Pairing with dApp");
        if let Err(e) = transport.pair(pairing.as_str()).await {
            warn!(pairing_topic = %pairing.topic, error = %e, "Relay rejected pairing URI");
            return Err(e.into());
        }

        Ok(pairing)
    }
}
