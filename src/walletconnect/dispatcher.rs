// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request dispatcher.
//!
//! Routes one inbound request to its method handler and always produces
//! exactly one response carrying the request id. Handler failures become
//! JSON-RPC errors here and never propagate further.

use tracing::{debug, warn};

use super::error::BridgeError;
use super::handlers::{MethodHandlers, StacksMethod};
use super::types::{JsonRpcResponse, RequestEvent};

#[derive(Clone)]
pub struct RequestDispatcher {
    handlers: MethodHandlers,
}

impl RequestDispatcher {
    pub fn new(handlers: MethodHandlers) -> Self {
        Self { handlers }
    }

    pub async fn handle(&self, request: RequestEvent) -> JsonRpcResponse {
        let RequestEvent {
            topic,
            id,
            method,
            params,
            chain_id,
        } = request;

        let Some(stacks_method) = StacksMethod::lookup(&method) else {
            warn!(topic = %topic, id, method = %method, "Unsupported method requested");
            return error_response(id, BridgeError::UnsupportedMethod(method));
        };

        debug!(topic = %topic, id, method = %stacks_method, "Dispatching request");
        match self
            .handlers
            .invoke(stacks_method, &topic, chain_id.as_deref(), params)
            .await
        {
            Ok(result) => JsonRpcResponse::result(id, result),
            Err(e) => {
                warn!(
                    topic = %topic,
                    id,
                    method = %stacks_method,
                    error = %e,
                    "Request handler failed"
                );
                error_response(id, e)
            }
        }
    }
}

fn error_response(id: u64, error: BridgeError) -> JsonRpcResponse {
    let body = error.to_rpc_error();
    JsonRpcResponse::error(id, body.code, body.message)
}
