// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Control API bind address | `0.0.0.0` |
//! | `PORT` | Control API bind port | `8080` |
//! | `RELAY_SIDECAR_URL` | Base URL of the WalletConnect relay sidecar | `http://127.0.0.1:8787` |
//! | `RELAY_TIMEOUT_SECS` | Timeout for each sidecar call | `15` |
//! | `STACKS_NETWORK` | Network bound to auto-approved sessions | `mainnet` |
//! | `WALLET_STX_ADDRESS` | Auto-approve proposals with this address | unset (reject all) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::models::StacksNetwork;
use crate::walletconnect::{ApprovalPolicy, RejectAllPolicy, StaticAccountPolicy};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const RELAY_SIDECAR_URL_ENV: &str = "RELAY_SIDECAR_URL";
pub const RELAY_TIMEOUT_SECS_ENV: &str = "RELAY_TIMEOUT_SECS";
pub const STACKS_NETWORK_ENV: &str = "STACKS_NETWORK";
pub const WALLET_STX_ADDRESS_ENV: &str = "WALLET_STX_ADDRESS";

/// Environment variable selecting the log format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RELAY_SIDECAR_URL: &str = "http://127.0.0.1:8787";
pub const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    pub relay_sidecar_url: Url,
    pub relay_timeout: Duration,
    pub network: StacksNetwork,
    /// When set, every proposal is approved with this address.
    pub wallet_address: Option<String>,
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get(PORT_ENV) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| invalid(PORT_ENV, e.to_string()))?,
            None => DEFAULT_PORT,
        };

        let relay_sidecar_url = get(RELAY_SIDECAR_URL_ENV)
            .unwrap_or_else(|| DEFAULT_RELAY_SIDECAR_URL.to_string());
        let relay_sidecar_url = Url::parse(&relay_sidecar_url)
            .map_err(|e| invalid(RELAY_SIDECAR_URL_ENV, e.to_string()))?;
        if !matches!(relay_sidecar_url.scheme(), "http" | "https") {
            return Err(invalid(
                RELAY_SIDECAR_URL_ENV,
                "expected an http or https URL",
            ));
        }

        let relay_timeout = match get(RELAY_TIMEOUT_SECS_ENV) {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| invalid(RELAY_TIMEOUT_SECS_ENV, e.to_string()))?;
                if secs == 0 {
                    return Err(invalid(RELAY_TIMEOUT_SECS_ENV, "must be at least 1"));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_RELAY_TIMEOUT,
        };

        let network = match get(STACKS_NETWORK_ENV) {
            Some(raw) => raw
                .parse::<StacksNetwork>()
                .map_err(|reason| invalid(STACKS_NETWORK_ENV, reason))?,
            None => StacksNetwork::Mainnet,
        };

        Ok(Self {
            host,
            port,
            relay_sidecar_url,
            relay_timeout,
            network,
            wallet_address: get(WALLET_STX_ADDRESS_ENV),
        })
    }

    /// `host:port` for the control API listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Auto-approve with the configured address, or reject everything.
    pub fn approval_policy(&self) -> Arc<dyn ApprovalPolicy> {
        match &self.wallet_address {
            Some(address) => Arc::new(StaticAccountPolicy {
                address: address.clone(),
                network: self.network,
            }),
            None => Arc::new(RejectAllPolicy),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::testing::{sample_proposal, MAINNET_ADDRESS};
    use crate::walletconnect::ApprovalDecision;

    fn config(vars: &[(&str, &str)]) -> Result<BridgeConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BridgeConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.relay_sidecar_url.as_str(), "http://127.0.0.1:8787/");
        assert_eq!(config.relay_timeout, DEFAULT_RELAY_TIMEOUT);
        assert_eq!(config.network, StacksNetwork::Mainnet);
        assert_eq!(config.wallet_address, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (RELAY_SIDECAR_URL_ENV, "https://sidecar.internal/wc"),
            (RELAY_TIMEOUT_SECS_ENV, "3"),
            (STACKS_NETWORK_ENV, "Testnet"),
            (WALLET_STX_ADDRESS_ENV, "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.relay_sidecar_url.as_str(), "https://sidecar.internal/wc");
        assert_eq!(config.relay_timeout, Duration::from_secs(3));
        assert_eq!(config.network, StacksNetwork::Testnet);
        assert_eq!(
            config.wallet_address.as_deref(),
            Some("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM")
        );
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = config(&[(WALLET_STX_ADDRESS_ENV, "  "), (PORT_ENV, "")]).unwrap();
        assert_eq!(config.wallet_address, None);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            (PORT_ENV, "eighty"),
            (PORT_ENV, "70000"),
            (RELAY_SIDECAR_URL_ENV, "not a url"),
            (RELAY_SIDECAR_URL_ENV, "ws://127.0.0.1:8787"),
            (RELAY_TIMEOUT_SECS_ENV, "0"),
            (RELAY_TIMEOUT_SECS_ENV, "-1"),
            (STACKS_NETWORK_ENV, "regtest"),
        ];
        for (name, value) in cases {
            let err = config(&[(name, value)]).unwrap_err();
            let ConfigError::InvalidValue { name: reported, .. } = err;
            assert_eq!(reported, name, "{name}={value}");
        }
    }

    #[tokio::test]
    async fn policy_follows_wallet_address() {
        let rejecting = config(&[]).unwrap().approval_policy();
        assert_eq!(
            rejecting.decide(&sample_proposal(1)).await,
            ApprovalDecision::Reject
        );

        let approving = config(&[
            (WALLET_STX_ADDRESS_ENV, MAINNET_ADDRESS),
            (STACKS_NETWORK_ENV, "devnet"),
        ])
        .unwrap()
        .approval_policy();
        assert_eq!(
            approving.decide(&sample_proposal(1)).await,
            ApprovalDecision::Approve {
                address: MAINNET_ADDRESS.to_string(),
                network: StacksNetwork::Devnet,
            }
        );
    }
}
