// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana JSON-RPC client for blockchain interactions.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use solana_sdk::{hash::Hash, pubkey::Pubkey};

use super::types::{Commitment, RecentBlockhash, SignedTransaction};

/// Default interval between signature status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Per-request HTTP timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Chain RPC collaborator used by the session orchestrator.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Native balance of `address` in lamports.
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ChainError>;

    /// Most recent blockhash at the given commitment.
    async fn get_latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> Result<RecentBlockhash, ChainError>;

    /// Submit a signed transaction, returning its signature.
    async fn send_raw_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<String, ChainError>;

    /// Suspend until `signature` reaches `commitment`, fails, or its
    /// blockhash expires.
    async fn confirm_transaction(
        &self,
        signature: &str,
        freshness: &RecentBlockhash,
        commitment: Commitment,
    ) -> Result<(), ChainError>;
}

/// Solana JSON-RPC 2.0 client over HTTP.
#[derive(Debug, Clone)]
pub struct SolanaRpcClient {
    endpoint: String,
    http: Client,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
    last_valid_block_height: u64,
}

/// Status entry returned by `getSignatureStatuses`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
    #[serde(default)]
    pub err: Option<Value>,
}

impl SignatureStatus {
    /// Commitment reached by the transaction.
    ///
    /// Nodes that omit `confirmationStatus` report rooted transactions with
    /// `confirmations: null`.
    pub fn reached(&self) -> Commitment {
        match (self.confirmation_status, self.confirmations) {
            (Some(status), _) => status,
            (None, None) => Commitment::Finalized,
            (None, Some(_)) => Commitment::Confirmed,
        }
    }
}

impl SolanaRpcClient {
    /// Create a client for the given RPC endpoint.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ChainError> {
        let endpoint = endpoint.into();
        let url: url::Url = endpoint
            .parse()
            .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ChainError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: url.to_string(),
            http,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the confirmation poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Current block height.
    pub async fn get_block_height(&self, commitment: Commitment) -> Result<u64, ChainError> {
        self.call(
            "getBlockHeight",
            json!([{ "commitment": commitment.as_str() }]),
        )
        .await
    }

    /// Status of a single signature, `None` while the cluster has not seen it.
    pub async fn get_signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SignatureStatus>, ChainError> {
        let response: WithContext<Vec<Option<SignatureStatus>>> = self
            .call("getSignatureStatuses", json!([[signature]]))
            .await?;

        Ok(response.value.into_iter().next().flatten())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ChainError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChainError::Transport(format!(
                "HTTP {} from RPC endpoint",
                response.status()
            )));
        }

        let payload: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| ChainError::InvalidResponse(format!("{method}: {e}")))?;

        if let Some(error) = payload.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        payload
            .result
            .ok_or_else(|| ChainError::InvalidResponse(format!("{method}: missing result")))
    }
}

#[async_trait]
impl ChainRpc for SolanaRpcClient {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ChainError> {
        let response: WithContext<u64> = self
            .call(
                "getBalance",
                json!([address.to_string(), { "commitment": Commitment::Finalized.as_str() }]),
            )
            .await?;
        Ok(response.value)
    }

    async fn get_latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> Result<RecentBlockhash, ChainError> {
        let response: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": commitment.as_str() }]),
            )
            .await?;

        let blockhash = Hash::from_str(&response.value.blockhash).map_err(|e| {
            ChainError::InvalidResponse(format!(
                "getLatestBlockhash: invalid blockhash `{}`: {e}",
                response.value.blockhash
            ))
        })?;

        Ok(RecentBlockhash {
            blockhash,
            last_valid_block_height: response.value.last_valid_block_height,
        })
    }

    async fn send_raw_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<String, ChainError> {
        let encoded = STANDARD.encode(transaction.to_wire()?);
        self.call(
            "sendTransaction",
            json!([
                encoded,
                {
                    "encoding": "base64",
                    "preflightCommitment": Commitment::Finalized.as_str(),
                }
            ]),
        )
        .await
    }

    async fn confirm_transaction(
        &self,
        signature: &str,
        freshness: &RecentBlockhash,
        commitment: Commitment,
    ) -> Result<(), ChainError> {
        loop {
            if let Some(status) = self.get_signature_status(signature).await? {
                if let Some(err) = status.err {
                    return Err(ChainError::TransactionFailed(format!(
                        "{signature}: {err}"
                    )));
                }
                if status.reached() >= commitment {
                    tracing::debug!(
                        %signature,
                        commitment = commitment.as_str(),
                        "Transaction confirmed"
                    );
                    return Ok(());
                }
            }

            let height = self.get_block_height(Commitment::Confirmed).await?;
            if height > freshness.last_valid_block_height {
                return Err(ChainError::BlockhashExpired(signature.to_string()));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Blockhash expired before transaction {0} was confirmed")]
    BlockhashExpired(String),
}
