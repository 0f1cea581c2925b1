// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        EmitSessionEventRequest, PairRequest, PairResponse, PeerMetadata, Session,
        SessionEventName, StacksAccount, StacksNetwork,
    },
    state::AppState,
};

pub mod health;
pub mod relay;
pub mod sessions;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/pair", post(sessions::pair))
        .route("/sessions", get(sessions::list_sessions))
        .route(
            "/sessions/{topic}",
            get(sessions::get_session).delete(sessions::disconnect_session),
        )
        .route("/sessions/{topic}/events", post(sessions::emit_session_event))
        .route("/relay/events", post(relay::relay_event))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        sessions::pair,
        sessions::list_sessions,
        sessions::get_session,
        sessions::disconnect_session,
        sessions::emit_session_event,
        relay::relay_event
    ),
    components(
        schemas(
            Session,
            StacksAccount,
            StacksNetwork,
            PeerMetadata,
            SessionEventName,
            PairRequest,
            PairResponse,
            EmitSessionEventRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Pairing", description = "Hand pairing URIs to the relay"),
        (name = "Sessions", description = "Inspect, disconnect and notify WalletConnect sessions"),
        (name = "Relay", description = "Inbound events from the relay sidecar")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use super::*;
    use crate::signing::UnwiredBackend;
    use crate::testing::{sample_proposal, RecordingTransport, MAINNET_ADDRESS};
    use crate::walletconnect::{RejectAllPolicy, TransportEvent, WalletBridge};

    async fn app() -> (Router, AppState, mpsc::Receiver<TransportEvent>) {
        let bridge = Arc::new(WalletBridge::new(
            Arc::new(RejectAllPolicy),
            Arc::new(UnwiredBackend),
        ));
        bridge
            .initialize(Arc::new(RecordingTransport::new("abc123")))
            .await;
        let (tx, rx) = mpsc::channel(8);
        let state = AppState::new(bridge, tx);
        (router(state.clone()), state, rx)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (app, _, _rx) = app().await;
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn health_route_reports_ok_with_request_id() {
        let (app, _, _rx) = app().await;

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn session_routes_use_topic_path() {
        let (app, state, _rx) = app().await;
        state
            .bridge
            .approve(sample_proposal(1), MAINNET_ADDRESS, StacksNetwork::Mainnet)
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(Request::get("/v1/sessions/abc123").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["topic"], "abc123");
        assert_eq!(body["network"], "mainnet");

        let response = app
            .clone()
            .oneshot(
                Request::delete("/v1/sessions/abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(Request::get("/v1/sessions/abc123").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Session abc123 not found"})
        );
    }

    #[tokio::test]
    async fn webhook_accepts_tagged_events() {
        let (app, _, mut rx) = app().await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/v1/relay/events")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "type": "session_request",
                            "topic": "abc123",
                            "id": 7,
                            "method": "stx_getAddresses",
                            "params": {}
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(matches!(
            rx.recv().await,
            Some(TransportEvent::SessionRequest(request)) if request.id == 7
        ));

        let response = app
            .oneshot(
                Request::post("/v1/relay/events")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"type":"session_ping"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn openapi_lists_control_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for path in [
            "/health",
            "/health/live",
            "/v1/pair",
            "/v1/sessions",
            "/v1/sessions/{topic}",
            "/v1/sessions/{topic}/events",
            "/v1/relay/events",
        ] {
            assert!(paths.contains(&path), "missing {path}");
        }
    }
}
