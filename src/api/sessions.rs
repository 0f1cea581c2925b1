// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::{EmitSessionEventRequest, PairRequest, PairResponse, Session},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/pair",
    request_body = PairRequest,
    tag = "Pairing",
    responses(
        (status = 202, body = PairResponse),
        (status = 502, description = "Malformed or expired pairing URI, or the relay rejected it"),
        (status = 503, description = "Relay transport not initialized")
    )
)]
pub async fn pair(
    State(state): State<AppState>,
    Json(request): Json<PairRequest>,
) -> Result<(StatusCode, Json<PairResponse>), ApiError> {
    let pairing = state.bridge.pair(&request.uri).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(PairResponse {
            pairing_topic: pairing.topic,
            expiry_timestamp: pairing.expiry_timestamp,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/sessions",
    tag = "Sessions",
    responses((status = 200, body = [Session]))
)]
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<Session>> {
    Json(state.bridge.list_sessions().await)
}

#[utoipa::path(
    get,
    path = "/v1/sessions/{topic}",
    params(
        ("topic" = String, Path, description = "Session topic")
    ),
    tag = "Sessions",
    responses(
        (status = 200, body = Session),
        (status = 404, description = "Unknown session topic")
    )
)]
pub async fn get_session(
    Path(topic): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Session>, ApiError> {
    state
        .bridge
        .session(&topic)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Session {topic} not found")))
}

#[utoipa::path(
    delete,
    path = "/v1/sessions/{topic}",
    params(
        ("topic" = String, Path, description = "Session topic to disconnect")
    ),
    tag = "Sessions",
    responses(
        (status = 204),
        (status = 404, description = "Unknown session topic"),
        (status = 502, description = "Session removed locally but the relay call failed")
    )
)]
pub async fn disconnect_session(
    Path(topic): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.bridge.disconnect(&topic).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/v1/sessions/{topic}/events",
    params(
        ("topic" = String, Path, description = "Session topic")
    ),
    request_body = EmitSessionEventRequest,
    tag = "Sessions",
    responses(
        (status = 202),
        (status = 404, description = "Unknown session topic"),
        (status = 502, description = "Relay rejected the event")
    )
)]
pub async fn emit_session_event(
    Path(topic): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<EmitSessionEventRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .bridge
        .emit_session_event(&topic, request.name, request.data)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;
    use crate::models::{SessionEventName, StacksNetwork};
    use crate::signing::UnwiredBackend;
    use crate::testing::{
        sample_proposal, RecordingTransport, TransportCall, MAINNET_ADDRESS, PAIRING_URI,
    };
    use crate::walletconnect::{RejectAllPolicy, SdkReason, WalletBridge};

    async fn state(transport: Option<Arc<RecordingTransport>>) -> AppState {
        let bridge = Arc::new(WalletBridge::new(
            Arc::new(RejectAllPolicy),
            Arc::new(UnwiredBackend),
        ));
        if let Some(transport) = transport {
            bridge.initialize(transport).await;
        }
        let (tx, _rx) = mpsc::channel(8);
        AppState::new(bridge, tx)
    }

    async fn approved(state: &AppState) {
        state
            .bridge
            .approve(sample_proposal(1), MAINNET_ADDRESS, StacksNetwork::Mainnet)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn pair_returns_accepted_with_topic() {
        let transport = Arc::new(RecordingTransport::new("abc123"));
        let state = state(Some(transport.clone())).await;

        let (status, Json(body)) = pair(
            State(state),
            Json(PairRequest {
                uri: PAIRING_URI.to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(
            body.pairing_topic,
            "7f6e504bfad60b485450578e05678ed3e8e8c4751d3c6160be17160d63ec90f9"
        );
        assert_eq!(transport.calls(), vec![TransportCall::Pair(PAIRING_URI.into())]);
    }

    #[tokio::test]
    async fn pair_before_initialize_is_unavailable() {
        let state = state(None).await;

        let err = pair(
            State(state),
            Json(PairRequest {
                uri: PAIRING_URI.to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn pair_with_garbage_uri_is_bad_gateway() {
        let state = state(Some(Arc::new(RecordingTransport::new("abc123")))).await;

        let err = pair(
            State(state),
            Json(PairRequest {
                uri: "https://not-a-pairing-uri".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(err.message.starts_with("Transport error: Invalid pairing URI"));
    }

    #[tokio::test]
    async fn get_and_list_sessions() {
        let state = state(Some(Arc::new(RecordingTransport::new("abc123")))).await;
        assert!(list_sessions(State(state.clone())).await.0.is_empty());

        approved(&state).await;

        let Json(all) = list_sessions(State(state.clone())).await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].topic, "abc123");

        let Json(session) = get_session(Path("abc123".into()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(session.accounts[0].address, MAINNET_ADDRESS);

        let err = get_session(Path("nope".into()), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_disconnects_and_removes() {
        let transport = Arc::new(RecordingTransport::new("abc123"));
        let state = state(Some(transport.clone())).await;
        approved(&state).await;

        let status = disconnect_session(Path("abc123".into()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.bridge.session("abc123").await.is_none());
        assert!(transport.calls().iter().any(|call| matches!(
            call,
            TransportCall::Disconnect(params)
                if params.topic == "abc123" && params.reason == SdkReason::user_disconnected()
        )));

        let err = disconnect_session(Path("abc123".into()), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn emit_event_uses_session_chain() {
        let transport = Arc::new(RecordingTransport::new("abc123"));
        let state = state(Some(transport.clone())).await;
        approved(&state).await;

        let status = emit_session_event(
            Path("abc123".into()),
            State(state),
            Json(EmitSessionEventRequest {
                name: SessionEventName::AddressChanged,
                data: json!({"address": MAINNET_ADDRESS}),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::ACCEPTED);
        let emitted = transport
            .calls()
            .into_iter()
            .find_map(|call| match call {
                TransportCall::Emit(params) => Some(params),
                _ => None,
            })
            .unwrap();
        assert_eq!(emitted.chain_id, "stacks:mainnet");
        assert_eq!(emitted.event.name, "addressChanged");
    }

    #[tokio::test]
    async fn relay_failure_is_bad_gateway() {
        let state = state(Some(Arc::new(RecordingTransport::failing("relay offline")))).await;

        let err = pair(
            State(state),
            Json(PairRequest {
                uri: PAIRING_URI.to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.message, "Transport error: relay offline");
    }
}
