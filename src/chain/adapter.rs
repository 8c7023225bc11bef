// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana wallet adapter over an opaque signing provider.

use std::str::FromStr;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use solana_sdk::{pubkey::Pubkey, transaction::Transaction};

use super::transaction::TransferTransaction;
use super::types::SignedTransaction;
use crate::identity::{ProviderError, SigningProvider};

const REQUEST_ACCOUNTS: &str = "requestAccounts";
const SIGN_TRANSACTION: &str = "signTransaction";

/// Translates a signing provider into Solana account and signing calls.
#[derive(Clone)]
pub struct SolanaWallet {
    provider: Arc<dyn SigningProvider>,
}

impl SolanaWallet {
    pub fn new(provider: Arc<dyn SigningProvider>) -> Self {
        Self { provider }
    }

    /// Base58 public keys controlled by the provider, primary account first.
    pub async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let response = self.provider.request(REQUEST_ACCOUNTS, Value::Null).await?;
        serde_json::from_value(response)
            .map_err(|e| ProviderError::InvalidResponse(format!("{REQUEST_ACCOUNTS}: {e}")))
    }

    /// The primary account, which must be a valid public key.
    pub async fn primary_account(&self) -> Result<Pubkey, ProviderError> {
        let account = self
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("no accounts returned".to_string()))?;

        Pubkey::from_str(&account).map_err(|e| {
            ProviderError::InvalidResponse(format!("invalid public key `{account}`: {e}"))
        })
    }

    /// Ask the provider to sign `transaction`.
    ///
    /// The provider gets the base64 serialized message and must answer with
    /// the base64 serialized transaction signed over that exact message.
    pub async fn sign_transaction(
        &self,
        transaction: &TransferTransaction,
    ) -> Result<SignedTransaction, ProviderError> {
        let params = json!({
            "message": STANDARD.encode(transaction.message_bytes()),
            "encoding": "base64",
        });
        let response = self.provider.request(SIGN_TRANSACTION, params).await?;

        let encoded = response.as_str().ok_or_else(|| {
            ProviderError::InvalidResponse(format!(
                "{SIGN_TRANSACTION}: expected a base64 string"
            ))
        })?;
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ProviderError::InvalidResponse(format!("{SIGN_TRANSACTION}: {e}")))?;
        let signed: Transaction = bincode::deserialize(&bytes)
            .map_err(|e| ProviderError::InvalidResponse(format!("{SIGN_TRANSACTION}: {e}")))?;

        if &signed.message != transaction.message() {
            return Err(ProviderError::InvalidResponse(format!(
                "{SIGN_TRANSACTION}: signed message differs from the request"
            )));
        }

        SignedTransaction::new(signed)
            .map_err(|e| ProviderError::InvalidResponse(format!("{SIGN_TRANSACTION}: {e}")))
    }
}
