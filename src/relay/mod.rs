// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP adapter for the relay sidecar.
//!
//! The WalletConnect sign client (relay websocket, pairing crypto, reconnects)
//! runs in a sidecar process. This adapter implements [`RelayTransport`] by
//! POSTing JSON to the sidecar; the sidecar pushes inbound events back to the
//! control API at `POST /v1/relay/events`.
//!
//! ## Sidecar Endpoints
//!
//! | Path | Body | Response |
//! |------|------|----------|
//! | `/pair` | `{uri}` | empty |
//! | `/approveSession` | `{id, namespaces, sessionProperties}` | `{topic}` |
//! | `/rejectSession` | `{id, reason}` | empty |
//! | `/respondSessionRequest` | `{topic, response}` | empty |
//! | `/disconnectSession` | `{topic, reason}` | empty |
//! | `/emitSessionEvent` | `{topic, event, chainId}` | empty |
//!
//! Non-2xx responses carry `{"error": "..."}` and become [`TransportError`]s.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::walletconnect::transport::{RelayTransport, TransportError};
use crate::walletconnect::types::{
    ApproveSessionParams, ApprovedSession, DisconnectSessionParams, EmitSessionEventParams,
    RejectSessionParams, RespondSessionRequestParams,
};

#[derive(Serialize)]
struct PairBody<'a> {
    uri: &'a str,
}

#[derive(Deserialize)]
struct SidecarErrorBody {
    error: String,
}

/// Relay transport backed by an HTTP sidecar.
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRelayTransport {
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        // `Url::join` drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::new(format!("Invalid sidecar endpoint {path}: {e}")))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, TransportError> {
        let url = self.endpoint(path)?;
        debug!(endpoint = %url, "Relay sidecar call");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::new(format!("Relay sidecar unreachable: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<SidecarErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });
        Err(TransportError::new(message))
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), TransportError> {
        self.send(path, body).await.map(|_| ())
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(path, body)
            .await?
            .json::<R>()
            .await
            .map_err(|e| TransportError::new(format!("Invalid sidecar response: {e}")))
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn pair(&self, uri: &str) -> Result<(), TransportError> {
        self.post("pair", &PairBody { uri }).await
    }

    async fn approve_session(
        &self,
        params: ApproveSessionParams,
    ) -> Result<ApprovedSession, TransportError> {
        self.post_json("approveSession", &params).await
    }

    async fn reject_session(&self, params: RejectSessionParams) -> Result<(), TransportError> {
        self.post("rejectSession", &params).await
    }

    async fn respond_session_request(
        &self,
        params: RespondSessionRequestParams,
    ) -> Result<(), TransportError> {
        self.post("respondSessionRequest", &params).await
    }

    async fn disconnect_session(
        &self,
        params: DisconnectSessionParams,
    ) -> Result<(), TransportError> {
        self.post("disconnectSession", &params).await
    }

    async fn emit_session_event(
        &self,
        params: EmitSessionEventParams,
    ) -> Result<(), TransportError> {
        self.post("emitSessionEvent", &params).await
    }
}
