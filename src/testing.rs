// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{PeerMetadata, Session, StacksAccount, StacksNetwork};
use crate::walletconnect::store::{SessionStore, SharedSessionStore};
use crate::walletconnect::transport::{RelayTransport, TransportError};
use crate::walletconnect::types::{
    ApproveSessionParams, ApprovedSession, DisconnectSessionParams, EmitSessionEventParams,
    JsonRpcResponse, Proposal, ProposalNamespace, RejectSessionParams,
    RespondSessionRequestParams,
};

pub const MAINNET_ADDRESS: &str = "SP3F7GQ48JY59521DZEE6KABHBF4Q33PEYJ823ZXQ";

pub const PAIRING_URI: &str = "wc:7f6e504bfad60b485450578e05678ed3e8e8c4751d3c6160be17160d63ec90f9@2?relay-protocol=irn&symKey=587d5484ce2a2a6ee3ba1962fdd7e8588e06200c46823bd18fbd67def96ad303";

/// One outbound call observed by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    Pair(String),
    Approve(ApproveSessionParams),
    Reject(RejectSessionParams),
    Respond(RespondSessionRequestParams),
    Disconnect(DisconnectSessionParams),
    Emit(EmitSessionEventParams),
}

/// Transport double that records every call and answers approvals with a
/// fixed topic, or fails every call with a fixed message.
pub struct RecordingTransport {
    topic: String,
    failure: Option<String>,
    calls: Mutex<Vec<TransportCall>>,
}

impl RecordingTransport {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            topic: String::new(),
            failure: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Responses delivered through `respondSessionRequest`, in order.
    pub fn responses(&self) -> Vec<JsonRpcResponse> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Respond(params) => Some(params.response),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: TransportCall) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(TransportError::new(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RelayTransport for RecordingTransport {
    async fn pair(&self, uri: &str) -> Result<(), TransportError> {
        self.record(TransportCall::Pair(uri.to_string()))
    }

    async fn approve_session(
        &self,
        params: ApproveSessionParams,
    ) -> Result<ApprovedSession, TransportError> {
        self.record(TransportCall::Approve(params))?;
        Ok(ApprovedSession {
            topic: self.topic.clone(),
        })
    }

    async fn reject_session(&self, params: RejectSessionParams) -> Result<(), TransportError> {
        self.record(TransportCall::Reject(params))
    }

    async fn respond_session_request(
        &self,
        params: RespondSessionRequestParams,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::Respond(params))
    }

    async fn disconnect_session(
        &self,
        params: DisconnectSessionParams,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::Disconnect(params))
    }

    async fn emit_session_event(
        &self,
        params: EmitSessionEventParams,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::Emit(params))
    }
}

pub fn sample_proposal(id: u64) -> Proposal {
    Proposal {
        id,
        proposer: PeerMetadata {
            name: "Example dApp".into(),
            url: "https://dapp.example".into(),
            description: "Swaps and stacking".into(),
            icons: vec!["https://dapp.example/icon.png".into()],
        },
        required_namespaces: BTreeMap::from([(
            "stacks".to_string(),
            ProposalNamespace {
                chains: vec!["stacks:mainnet".into()],
                methods: vec!["stx_getAddresses".into(), "stx_transferStx".into()],
                events: vec!["addressChanged".into()],
            },
        )]),
        optional_namespaces: BTreeMap::new(),
    }
}

/// A store holding one mainnet session for `topic`.
pub async fn session_store_with(topic: &str) -> SharedSessionStore {
    let store = SessionStore::shared();
    store.write().await.put(Session {
        topic: topic.to_string(),
        accounts: vec![StacksAccount::stx(MAINNET_ADDRESS)],
        network: StacksNetwork::Mainnet,
        peer: PeerMetadata::default(),
        created_at: Utc::now(),
    });
    store
}
