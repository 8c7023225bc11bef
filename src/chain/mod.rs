// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for Solana.
//!
//! This module provides functionality for:
//! - Querying native SOL balances over JSON-RPC
//! - Fetching recent blockhashes, submitting signed transactions and polling
//!   for confirmation
//! - Wrapping a signing provider as a Solana wallet adapter

pub mod adapter;
pub mod client;
pub mod transaction;
pub mod types;

pub use adapter::SolanaWallet;
pub use client::{ChainError, ChainRpc, SolanaRpcClient};
pub use transaction::TransferTransaction;
pub use types::*;
