// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Krosswalks Wallet - Session Service
//!
//! Drives a hosted-identity login, a Solana signing provider and a small set
//! of wallet operations (balance, self-transfer, fiat ramp redirects) from a
//! single session state machine, exposed over a local HTTP API.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `chain` - Solana JSON-RPC client, signing adapter and amounts
//! - `config` - Environment configuration
//! - `identity` - Identity provider contracts and the local provider
//! - `ramp` - Fiat on/off-ramp URL construction
//! - `session` - Session state and the operation orchestrator

pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod identity;
pub mod ramp;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
