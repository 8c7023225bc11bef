// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain types, constants and unit conversion.

use serde::{Deserialize, Serialize};
use solana_sdk::{hash::Hash, signature::Signature, transaction::Transaction};
use utoipa::ToSchema;

use super::client::ChainError;

/// Lamports per whole SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Number of fractional digits of the native asset.
pub const SOL_DECIMALS: u8 = 9;

/// Chain configuration handed to the identity provider and used for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_namespace: String,
    pub chain_id: String,
    pub rpc_target: String,
    pub display_name: String,
    pub block_explorer_url: String,
    pub ticker: String,
    pub ticker_name: String,
}

impl ChainConfig {
    /// Explorer link for a transaction signature.
    pub fn explorer_tx_url(&self, signature: &str) -> String {
        format!(
            "{}/tx/{}",
            self.block_explorer_url.trim_end_matches('/'),
            signature
        )
    }
}

/// Commitment level for RPC reads and confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// Freshness token a transaction must carry to be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentBlockhash {
    pub blockhash: Hash,
    /// Last block height at which a transaction using this blockhash is valid.
    pub last_valid_block_height: u64,
}

/// A transaction carrying every signature its message requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction(Transaction);

impl SignedTransaction {
    /// Accept `transaction` only if each required signature is present and
    /// verifies against the message.
    pub fn new(transaction: Transaction) -> Result<Self, ChainError> {
        let required = usize::from(transaction.message.header.num_required_signatures);
        if required == 0 || transaction.signatures.len() != required {
            return Err(ChainError::InvalidTransaction(format!(
                "expected {required} signature(s), found {}",
                transaction.signatures.len()
            )));
        }
        transaction
            .verify()
            .map_err(|e| ChainError::InvalidTransaction(e.to_string()))?;
        Ok(Self(transaction))
    }

    pub fn transaction(&self) -> &Transaction {
        &self.0
    }

    /// Fee payer's signature, which also identifies the transaction.
    pub fn signature(&self) -> &Signature {
        &self.0.signatures[0]
    }

    /// Wire encoding accepted by `sendTransaction`.
    pub fn to_wire(&self) -> Result<Vec<u8>, ChainError> {
        bincode::serialize(&self.0).map_err(|e| ChainError::InvalidTransaction(e.to_string()))
    }
}

/// Native balance in both denominations.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Balance {
    /// Balance in lamports
    pub lamports: u64,
    /// Balance in whole units
    pub whole: f64,
    /// Balance formatted for display
    pub formatted: String,
}

impl Balance {
    pub fn from_lamports(lamports: u64) -> Self {
        Self {
            lamports,
            whole: lamports as f64 / LAMPORTS_PER_SOL as f64,
            formatted: format_balance(lamports, SOL_DECIMALS),
        }
    }
}

/// Format a balance with the specified number of decimals.
pub fn format_balance(balance: u64, decimals: u8) -> String {
    if balance == 0 {
        return "0".to_string();
    }

    let divisor = 10u64.pow(decimals as u32);
    let whole = balance / divisor;
    let remainder = balance % divisor;

    if remainder == 0 {
        return whole.to_string();
    }

    let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
    let trimmed = decimal_str.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}

/// Parse a human-readable amount (e.g. "0.01") into the smallest unit.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<u64, ChainError> {
    let amount = amount.trim();
    let parts: Vec<&str> = amount.split('.').collect();

    if amount.is_empty() || parts.len() > 2 {
        return Err(ChainError::InvalidAmount(format!(
            "`{amount}` is not a decimal amount"
        )));
    }

    let whole = if parts[0].is_empty() {
        0
    } else {
        parts[0]
            .parse::<u64>()
            .map_err(|_| ChainError::InvalidAmount("invalid whole number".to_string()))?
    };

    let fraction = match parts.get(1) {
        Some(dec) if dec.len() > decimals as usize => {
            return Err(ChainError::InvalidAmount(format!(
                "too many decimal places (max {decimals})"
            )));
        }
        Some(dec) if !dec.is_empty() => {
            let padded = format!("{:0<width$}", dec, width = decimals as usize);
            padded
                .parse::<u64>()
                .map_err(|_| ChainError::InvalidAmount("invalid decimal".to_string()))?
        }
        _ => 0,
    };

    let total = whole
        .checked_mul(10u64.pow(decimals as u32))
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| ChainError::InvalidAmount("amount overflow".to_string()))?;

    if total == 0 {
        return Err(ChainError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }

    Ok(total)
}
