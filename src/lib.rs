// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stacks WalletConnect Bridge - Wallet-side WalletConnect v2 session router
//!
//! Negotiates sessions for the `stacks` namespace on behalf of a wallet and
//! answers dApp JSON-RPC calls (`stx_*`) with exactly one response each. The
//! relay client runs in a sidecar process driven over HTTP.
//!
//! ## Modules
//!
//! - `walletconnect` - session store, pairing, proposals, request dispatch
//! - `signing` - pluggable signing backend for the `stx_*` methods
//! - `relay` - HTTP adapter for the relay sidecar
//! - `api` - control API and relay webhook (Axum)
//! - `config` - environment configuration
//! - `logging` - tracing subscriber setup

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod relay;
pub mod signing;
pub mod state;
pub mod walletconnect;

#[cfg(test)]
pub(crate) mod testing;
