// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Proposal negotiator.
//!
//! Each proposal transitions exactly once:
//!
//! ```text
//! RECEIVED --approve--> SESSION_ESTABLISHED   (session store gains an entry)
//! RECEIVED --reject---> REJECTED              (session store unchanged)
//! ```
//!
//! Whether to approve is decided by an injected [`ApprovalPolicy`]. The
//! capability set granted on approval is fixed: exactly the methods the
//! dispatcher can route and the events the wallet can emit, whatever the dApp
//! asked for.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::models::{Session, SessionEventName, StacksAccount, StacksNetwork, CHAIN_FAMILY};

use super::error::BridgeError;
use super::handlers::StacksMethod;
use super::store::SharedSessionStore;
use super::transport::TransportHandle;
use super::types::{
    ApproveSessionParams, Proposal, RejectSessionParams, SdkReason, SessionNamespace,
};

/// Outcome of an approval policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve {
        address: String,
        network: StacksNetwork,
    },
    Reject,
}

/// Decides whether a proposal is approved, and with which account.
///
/// Implemented for plain closures so callers can inject a decision function.
#[async_trait]
pub trait ApprovalPolicy: Send + Sync {
    async fn decide(&self, proposal: &Proposal) -> ApprovalDecision;
}

#[async_trait]
impl<F> ApprovalPolicy for F
where
    F: Fn(&Proposal) -> ApprovalDecision + Send + Sync,
{
    async fn decide(&self, proposal: &Proposal) -> ApprovalDecision {
        self(proposal)
    }
}

/// Approves every proposal with a fixed account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAccountPolicy {
    pub address: String,
    pub network: StacksNetwork,
}

#[async_trait]
impl ApprovalPolicy for StaticAccountPolicy {
    async fn decide(&self, _proposal: &Proposal) -> ApprovalDecision {
        ApprovalDecision::Approve {
            address: self.address.clone(),
            network: self.network,
        }
    }
}

/// Rejects every proposal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAllPolicy;

#[async_trait]
impl ApprovalPolicy for RejectAllPolicy {
    async fn decide(&self, _proposal: &Proposal) -> ApprovalDecision {
        ApprovalDecision::Reject
    }
}

/// Namespaces granted for a single address on `network`.
pub fn build_namespaces(
    address: &str,
    network: StacksNetwork,
) -> BTreeMap<String, SessionNamespace> {
    let namespace = SessionNamespace {
        chains: vec![network.chain_id()],
        methods: StacksMethod::ALL
            .iter()
            .map(|method| method.as_str().to_string())
            .collect(),
        events: SessionEventName::ALL
            .iter()
            .map(|event| event.as_str().to_string())
            .collect(),
        accounts: vec![network.account_id(address)],
    };
    BTreeMap::from([(CHAIN_FAMILY.to_string(), namespace)])
}

/// Session properties advertising the approved addresses up front.
fn build_session_properties(accounts: &[StacksAccount]) -> BTreeMap<String, String> {
    let addresses = json!({ "addresses": accounts }).to_string();
    BTreeMap::from([(StacksMethod::GetAddresses.as_str().to_string(), addresses)])
}

#[derive(Clone)]
pub struct ProposalNegotiator {
    transport: TransportHandle,
    sessions: SharedSessionStore,
    policy: Arc<dyn ApprovalPolicy>,
}

impl ProposalNegotiator {
    pub fn new(
        transport: TransportHandle,
        sessions: SharedSessionStore,
        policy: Arc<dyn ApprovalPolicy>,
    ) -> Self {
        Self {
            transport,
            sessions,
            policy,
        }
    }

    /// Ask the policy about `proposal` and carry out its decision.
    ///
    /// Returns the new session when approved, `None` when rejected.
    pub async fn on_proposal(&self, proposal: Proposal) -> Result<Option<Session>, BridgeError> {
        info!(
            proposal_id = proposal.id,
            peer = %proposal.proposer.name,
            url = %proposal.proposer.url,
            "Session proposal received"
        );

        match self.policy.decide(&proposal).await {
            ApprovalDecision::Approve { address, network } => {
                self.approve(proposal, &address, network).await.map(Some)
            }
            ApprovalDecision::Reject => self.reject(proposal).await.map(|_| None),
        }
    }

    /// Approve `proposal` binding `address` on `network`, then record the
    /// session under the relay-assigned topic.
    pub async fn approve(
        &self,
        proposal: Proposal,
        address: &str,
        network: StacksNetwork,
    ) -> Result<Session, BridgeError> {
        let transport = self.transport.get().await?;

        let accounts = vec![StacksAccount::stx(address)];
        let params = ApproveSessionParams {
            id: proposal.id,
            namespaces: build_namespaces(address, network),
            session_properties: build_session_properties(&accounts),
        };

        let approved = transport.approve_session(params).await.map_err(|e| {
            warn!(proposal_id = proposal.id, error = %e, "Relay refused session approval");
            BridgeError::from(e)
        })?;

        let session = Session {
            topic: approved.topic,
            accounts,
            network,
            peer: proposal.proposer,
            created_at: Utc::now(),
        };

        // Topic uniqueness is guaranteed by the relay; a collision replaces.
        if self.sessions.write().await.put(session.clone()).is_some() {
            warn!(topic = %session.topic, "Approved session replaced an existing topic");
        }

        info!(
            proposal_id = proposal.id,
            topic = %session.topic,
            network = %network,
            "Session approved"
        );
        Ok(session)
    }

    /// Reject `proposal` as a user rejection. The session store is untouched.
    pub async fn reject(&self, proposal: Proposal) -> Result<(), BridgeError> {
        let transport = self.transport.get().await?;

        transport
            .reject_session(RejectSessionParams {
                id: proposal.id,
                reason: SdkReason::user_rejected(),
            })
            .await?;

        info!(proposal_id = proposal.id, "Session proposal rejected");
        Ok(())
    }
}
