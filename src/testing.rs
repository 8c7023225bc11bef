// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scripted collaborator fakes shared by unit tests.

use std::str::FromStr;
use std::sync::{Arc, LazyLock, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use solana_sdk::{
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_instruction::SystemInstruction,
    transaction::Transaction,
};
use tokio::sync::{watch, Notify};

use crate::chain::{ChainError, ChainRpc, Commitment, RecentBlockhash, SignedTransaction};
use crate::config::AppConfig;
use crate::identity::{
    IdentityClient, IdentityError, IdentityOptions, IdentityProvider, ProviderError,
    SigningProvider, UserProfile,
};
use crate::session::{Session, SessionOrchestrator};

/// Key behind the fake signing provider.
static SIGNER: LazyLock<Keypair> = LazyLock::new(Keypair::new);

pub const SIGNATURE: &str = "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnb";
pub const BLOCKHASH: &str = "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N";

/// Base58 address of the fake signing provider's account.
pub fn address() -> String {
    SIGNER.pubkey().to_string()
}

pub fn blockhash() -> Hash {
    Hash::from_str(BLOCKHASH).unwrap()
}

/// Lamports moved by the single transfer instruction in `message`.
pub fn transfer_lamports(message: &Message) -> u64 {
    match bincode::deserialize(&message.instructions[0].data).unwrap() {
        SystemInstruction::Transfer { lamports } => lamports,
        other => panic!("not a transfer: {other:?}"),
    }
}

/// What each collaborator call should do.
#[derive(Debug, Clone)]
pub struct Script {
    pub init_error: Option<IdentityError>,
    pub prepare_error: Option<IdentityError>,
    pub connect_error: Option<IdentityError>,
    pub profile_error: Option<IdentityError>,
    pub logout_error: Option<IdentityError>,
    pub already_connected: bool,
    pub accounts: Vec<String>,
    pub sign_error: Option<ProviderError>,
    pub balance_lamports: u64,
    pub balance_error: Option<String>,
    pub blockhash_error: Option<String>,
    pub send_error: Option<String>,
    pub confirm_error: Option<String>,
    /// When set, `connect` waits for a notification before answering.
    pub connect_gate: Option<Arc<Notify>>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            init_error: None,
            prepare_error: None,
            connect_error: None,
            profile_error: None,
            logout_error: None,
            already_connected: false,
            accounts: vec![address()],
            sign_error: None,
            balance_lamports: 1_500_000_000,
            balance_error: None,
            blockhash_error: None,
            send_error: None,
            confirm_error: None,
            connect_gate: None,
        }
    }
}

/// Shared state behind every fake: the script plus a call log.
#[derive(Default)]
pub struct Harness {
    pub script: Mutex<Script>,
    calls: Mutex<Vec<String>>,
    busy_seen: Mutex<Vec<bool>>,
    observer: Mutex<Option<watch::Receiver<Session>>>,
    signed_messages: Mutex<Vec<Message>>,
}

impl Harness {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            ..Self::default()
        })
    }

    fn script(&self) -> Script {
        self.script.lock().unwrap().clone()
    }

    pub fn edit(&self, f: impl FnOnce(&mut Script)) {
        f(&mut self.script.lock().unwrap());
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
        if let Some(observer) = self.observer.lock().unwrap().as_ref() {
            self.busy_seen.lock().unwrap().push(observer.borrow().busy());
        }
    }

    pub fn observe(&self, receiver: watch::Receiver<Session>) {
        *self.observer.lock().unwrap() = Some(receiver);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
        self.busy_seen.lock().unwrap().clear();
    }

    /// Busy flag as observed from inside each collaborator call.
    pub fn busy_seen(&self) -> Vec<bool> {
        self.busy_seen.lock().unwrap().clone()
    }

    /// Messages the signing provider was asked to sign.
    pub fn signed_messages(&self) -> Vec<Message> {
        self.signed_messages.lock().unwrap().clone()
    }
}

pub struct FakeIdentity(pub Arc<Harness>);

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn init(
        &self,
        _options: &IdentityOptions,
    ) -> Result<Arc<dyn IdentityClient>, IdentityError> {
        self.0.record("init");
        match self.0.script().init_error {
            Some(e) => Err(e),
            None => Ok(Arc::new(FakeClient(self.0.clone()))),
        }
    }
}

struct FakeClient(Arc<Harness>);

#[async_trait]
impl IdentityClient for FakeClient {
    async fn prepare_modal(&self) -> Result<(), IdentityError> {
        self.0.record("prepare_modal");
        self.0.script().prepare_error.map_or(Ok(()), Err)
    }

    async fn connect(&self) -> Result<Arc<dyn SigningProvider>, IdentityError> {
        self.0.record("connect");
        let script = self.0.script();
        if let Some(gate) = script.connect_gate {
            gate.notified().await;
        }
        match script.connect_error {
            Some(e) => Err(e),
            None => Ok(Arc::new(FakeSigner(self.0.clone()))),
        }
    }

    async fn user_info(&self) -> Result<UserProfile, IdentityError> {
        self.0.record("user_info");
        match self.0.script().profile_error {
            Some(e) => Err(e),
            None => Ok(UserProfile {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
                ..UserProfile::default()
            }),
        }
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        self.0.record("logout");
        self.0.script().logout_error.map_or(Ok(()), Err)
    }

    fn is_connected(&self) -> bool {
        self.0.script().already_connected
    }

    fn current_provider(&self) -> Option<Arc<dyn SigningProvider>> {
        self.0
            .script()
            .already_connected
            .then(|| Arc::new(FakeSigner(self.0.clone())) as Arc<dyn SigningProvider>)
    }
}

struct FakeSigner(Arc<Harness>);

#[async_trait]
impl SigningProvider for FakeSigner {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.0.record(method);
        let script = self.0.script();
        match method {
            "requestAccounts" => Ok(json!(script.accounts)),
            "signTransaction" => {
                if let Some(e) = script.sign_error {
                    return Err(e);
                }
                let bytes = STANDARD.decode(params["message"].as_str().unwrap()).unwrap();
                let message: Message = bincode::deserialize(&bytes).unwrap();
                self.0.signed_messages.lock().unwrap().push(message.clone());

                let blockhash = message.recent_blockhash;
                let mut transaction = Transaction::new_unsigned(message);
                transaction.sign(&[&*SIGNER], blockhash);
                Ok(json!(STANDARD.encode(bincode::serialize(&transaction).unwrap())))
            }
            other => Err(ProviderError::UnsupportedMethod(other.to_string())),
        }
    }
}

pub struct FakeRpc(pub Arc<Harness>);

#[async_trait]
impl ChainRpc for FakeRpc {
    async fn get_balance(&self, _address: &Pubkey) -> Result<u64, ChainError> {
        self.0.record("get_balance");
        let script = self.0.script();
        match script.balance_error {
            Some(e) => Err(ChainError::Transport(e)),
            None => Ok(script.balance_lamports),
        }
    }

    async fn get_latest_blockhash(
        &self,
        _commitment: Commitment,
    ) -> Result<RecentBlockhash, ChainError> {
        self.0.record("get_latest_blockhash");
        match self.0.script().blockhash_error {
            Some(e) => Err(ChainError::Transport(e)),
            None => Ok(RecentBlockhash {
                blockhash: blockhash(),
                last_valid_block_height: 100,
            }),
        }
    }

    async fn send_raw_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<String, ChainError> {
        self.0.record("send_raw_transaction");
        assert_eq!(transaction.transaction().message.account_keys[0], SIGNER.pubkey());
        assert!(transaction.transaction().verify().is_ok());
        match self.0.script().send_error {
            Some(e) => Err(ChainError::Rpc {
                code: -32002,
                message: e,
            }),
            None => Ok(SIGNATURE.to_string()),
        }
    }

    async fn confirm_transaction(
        &self,
        _signature: &str,
        _freshness: &RecentBlockhash,
        _commitment: Commitment,
    ) -> Result<(), ChainError> {
        self.0.record("confirm_transaction");
        self.0
            .script()
            .confirm_error
            .map_or(Ok(()), |e| Err(ChainError::TransactionFailed(e)))
    }
}

/// Orchestrator wired to fakes driven by `script`.
pub fn orchestrator(script: Script) -> (SessionOrchestrator, Arc<Harness>) {
    let harness = Harness::new(script);
    let config = AppConfig::from_lookup(|name| match name {
        "WEB3AUTH_CLIENT_ID" => Some("cid".to_string()),
        "MOONPAY_API_KEY" => Some("k1".to_string()),
        _ => None,
    })
    .expect("config");

    let orchestrator = SessionOrchestrator::new(
        Arc::new(FakeIdentity(harness.clone())),
        Arc::new(FakeRpc(harness.clone())),
        config.identity_options(),
        config.ramp.clone(),
    );
    harness.observe(orchestrator.subscribe());
    (orchestrator, harness)
}
