// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Inbound webhook for the relay sidecar.
//!
//! The sidecar posts `session_proposal`, `session_request` and
//! `session_delete` events here. Events are queued for the serial event loop
//! and acknowledged with 202 before they are processed.

use axum::{extract::State, http::StatusCode, Json};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState, walletconnect::TransportEvent};

#[utoipa::path(
    post,
    path = "/v1/relay/events",
    tag = "Relay",
    request_body(
        content = Object,
        description = "Relay event tagged by `type`: `session_proposal`, `session_request` or `session_delete`"
    ),
    responses(
        (status = 202, description = "Event queued"),
        (status = 422, description = "Malformed event"),
        (status = 503, description = "Event loop is full or stopped")
    )
)]
pub async fn relay_event(
    State(state): State<AppState>,
    Json(event): Json<TransportEvent>,
) -> Result<StatusCode, ApiError> {
    match state.events.try_send(event) {
        Ok(()) => {
            debug!("Relay event queued");
            Ok(StatusCode::ACCEPTED)
        }
        Err(TrySendError::Full(_)) => {
            warn!("Relay event queue full, dropping event");
            Err(ApiError::service_unavailable("Event queue is full"))
        }
        Err(TrySendError::Closed(_)) => {
            Err(ApiError::service_unavailable("Event loop is not running"))
        }
    }
}
