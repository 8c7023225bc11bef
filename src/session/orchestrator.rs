// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session orchestrator.
//!
//! Each public operation checks its precondition and marks the session busy
//! in a single state transition, delegates to a collaborator and writes the
//! result back. A failed precondition, or another operation already holding
//! the session, is a no-op. Failures never propagate: they are logged and
//! recorded as the session's last message.
//!
//! Session state lives in a `watch` channel. Mutations are synchronous
//! closures, so no mutation ever spans an await point.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use super::error::{ErrorKind, Operation, OperationError, Outcome};
use super::model::{AuthState, Session, SessionView};
use crate::chain::{
    parse_amount, Balance, ChainConfig, ChainRpc, Commitment, SolanaWallet, TransferTransaction,
    SOL_DECIMALS,
};
use crate::identity::{IdentityClient, IdentityOptions, IdentityProvider, SigningProvider};
use crate::ramp::{build_ramp_url, RampConfig, RampDirection};

/// Amount used when the caller does not specify one.
pub const DEFAULT_TRANSFER_AMOUNT: &str = "0.01";

/// Marks the session busy for as long as it is alive.
struct BusyGuard<'a> {
    state: &'a watch::Sender<Session>,
}

impl<'a> BusyGuard<'a> {
    fn acquire(state: &'a watch::Sender<Session>) -> Self {
        state.send_modify(|s| s.set_busy(true));
        Self { state }
    }

    /// Take the session if it is idle and `precondition` holds, as one
    /// transition. Leaves the state untouched otherwise.
    fn try_acquire<T>(
        state: &'a watch::Sender<Session>,
        precondition: impl FnOnce(&Session) -> Option<T>,
    ) -> Result<(Self, T), Outcome> {
        let mut admitted = Err(Outcome::Skipped);
        state.send_if_modified(|s| {
            if s.busy() {
                admitted = Err(Outcome::Busy);
                return false;
            }
            match precondition(s) {
                Some(value) => {
                    s.set_busy(true);
                    admitted = Ok(value);
                    true
                }
                None => false,
            }
        });
        admitted.map(|value| (Self { state }, value))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.set_busy(false));
    }
}

pub struct SessionOrchestrator {
    identity: Arc<dyn IdentityProvider>,
    rpc: Arc<dyn ChainRpc>,
    identity_options: IdentityOptions,
    ramp: RampConfig,
    state: watch::Sender<Session>,
}

impl SessionOrchestrator {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        rpc: Arc<dyn ChainRpc>,
        identity_options: IdentityOptions,
        ramp: RampConfig,
    ) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            identity,
            rpc,
            identity_options,
            ramp,
            state,
        }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.identity_options.chain
    }

    /// Current render model.
    pub fn snapshot(&self) -> SessionView {
        self.state.borrow().view(self.chain())
    }

    /// Receiver notified on every session mutation.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy()
    }

    /// Build the identity client and prepare its modal. Runs once.
    pub async fn initialize(&self) -> Outcome {
        if !self.state.send_if_modified(Session::begin_initialization) {
            debug!("initialize skipped: identity client already initialized");
            return Outcome::Skipped;
        }

        let span = operation_span(Operation::Initialize);
        async {
            let _busy = BusyGuard::acquire(&self.state);

            let client = match self.create_client().await {
                Ok(client) => client,
                Err(e) => {
                    let message = e.user_message(Operation::Initialize);
                    error!(error = %e, "Identity initialization failed");
                    self.state.send_modify(|s| s.fail_initialization(message));
                    return Outcome::Failed(ErrorKind::Initialization);
                }
            };

            self.state
                .send_modify(|s| s.finish_initialization(client.clone()));
            info!(network = %self.identity_options.network, "Identity client ready");

            if !client.is_connected() {
                return Outcome::Completed;
            }
            let Some(provider) = client.current_provider() else {
                return Outcome::Completed;
            };

            match self.establish(provider).await {
                Ok(address) => {
                    info!(%address, "Restored existing session");
                    Outcome::Completed
                }
                Err(e) => self.fail(Operation::RestoreSession, e),
            }
        }
        .instrument(span)
        .await
    }

    /// Run the interactive login and bind the wallet address.
    pub async fn login(&self) -> Outcome {
        let admitted = BusyGuard::try_acquire(&self.state, |s| {
            if s.auth_state() != AuthState::Ready || s.is_logged_in() {
                None
            } else {
                s.auth_client().cloned()
            }
        });
        let (_busy, client) = match admitted {
            Ok(admitted) => admitted,
            Err(outcome) => {
                debug!(?outcome, "login not started");
                return outcome;
            }
        };

        let span = operation_span(Operation::Login);
        async {
            let result = async {
                let provider = client.connect().await?;
                self.establish(provider).await
            }
            .await;

            match result {
                Ok(address) => {
                    info!(%address, "Login successful");
                    Outcome::Completed
                }
                Err(e) => self.fail(Operation::Login, e),
            }
        }
        .instrument(span)
        .await
    }

    /// Fetch identity claims and show the profile panel.
    pub async fn fetch_profile(&self) -> Outcome {
        let admitted = BusyGuard::try_acquire(&self.state, |s| {
            if s.auth_state() == AuthState::Ready && s.is_logged_in() {
                s.auth_client().cloned()
            } else {
                None
            }
        });
        let (_busy, client) = match admitted {
            Ok(admitted) => admitted,
            Err(outcome) => {
                debug!(?outcome, "fetch_profile not started");
                return outcome;
            }
        };

        let span = operation_span(Operation::FetchProfile);
        async {
            match client.user_info().await {
                Ok(profile) => {
                    debug!("User info retrieved");
                    self.state.send_modify(|s| s.show_profile(profile));
                    Outcome::Completed
                }
                Err(e) => self.fail(Operation::FetchProfile, e.into()),
            }
        }
        .instrument(span)
        .await
    }

    /// Query the native balance and show the balance panel.
    pub async fn fetch_balance(&self) -> Outcome {
        let (_busy, provider) = match self.acquire_with_provider() {
            Ok(admitted) => admitted,
            Err(outcome) => {
                debug!(?outcome, "fetch_balance not started");
                return outcome;
            }
        };

        let span = operation_span(Operation::FetchBalance);
        async {
            match self.refresh_balance(provider).await {
                Ok(_) => Outcome::Completed,
                Err(e) => self.fail(Operation::FetchBalance, e),
            }
        }
        .instrument(span)
        .await
    }

    /// Transfer `amount` whole units from the account to itself, wait for
    /// finalization, then refresh the balance.
    pub async fn send_self_transfer(&self, amount: &str) -> Outcome {
        let (_busy, provider) = match self.acquire_with_provider() {
            Ok(admitted) => admitted,
            Err(outcome) => {
                debug!(?outcome, "send_self_transfer not started");
                return outcome;
            }
        };

        let span = operation_span(Operation::SendTransfer);
        async {
            let signature = match self.transfer_to_self(&provider, amount).await {
                Ok(signature) => signature,
                Err(e) => return self.fail(Operation::SendTransfer, e),
            };

            info!(
                %signature,
                explorer = %self.chain().explorer_tx_url(&signature),
                "Transaction sent successfully"
            );
            self.state.send_modify(|s| {
                s.set_message(format!("Transaction sent successfully: {signature}"))
            });

            if let Err(e) = self.refresh_balance(provider).await {
                self.fail(Operation::FetchBalance, e);
            }
            Outcome::Completed
        }
        .instrument(span)
        .await
    }

    /// Tear down the identity session and reset the local session.
    ///
    /// The local reset happens even when teardown fails.
    pub async fn logout(&self) -> Outcome {
        let admitted = BusyGuard::try_acquire(&self.state, |s| s.auth_client().cloned());
        let (_busy, client) = match admitted {
            Ok(admitted) => admitted,
            Err(outcome) => {
                debug!(?outcome, "logout not started");
                return outcome;
            }
        };

        let span = operation_span(Operation::Logout);
        async {
            let teardown = client.logout().await;
            self.state.send_modify(Session::sign_out);

            match teardown {
                Ok(()) => {
                    info!("Logged out successfully");
                    Outcome::Completed
                }
                Err(e) => self.fail(Operation::Logout, e.into()),
            }
        }
        .instrument(span)
        .await
    }

    /// Partner URL for buying the native asset, if logged in.
    pub fn buy_asset(&self) -> Option<String> {
        self.ramp_url(RampDirection::Buy)
    }

    /// Partner URL for selling the native asset, if logged in.
    pub fn sell_asset(&self) -> Option<String> {
        self.ramp_url(RampDirection::Sell)
    }

    fn ramp_url(&self, direction: RampDirection) -> Option<String> {
        let session = self.state.borrow();
        let address = session.wallet_address()?;
        Some(build_ramp_url(&self.ramp, direction, address))
    }

    async fn create_client(&self) -> Result<Arc<dyn IdentityClient>, OperationError> {
        let client = self.identity.init(&self.identity_options).await?;
        client.prepare_modal().await?;
        Ok(client)
    }

    /// Wrap `provider`, resolve the primary account and sign in atomically.
    async fn establish(
        &self,
        provider: Arc<dyn SigningProvider>,
    ) -> Result<String, OperationError> {
        let address = SolanaWallet::new(provider.clone())
            .primary_account()
            .await?
            .to_string();
        self.state
            .send_modify(|s| s.sign_in(provider, address.clone()));
        Ok(address)
    }

    async fn refresh_balance(
        &self,
        provider: Arc<dyn SigningProvider>,
    ) -> Result<Balance, OperationError> {
        let address = SolanaWallet::new(provider).primary_account().await?;
        let lamports = self.rpc.get_balance(&address).await?;
        let balance = Balance::from_lamports(lamports);

        debug!(%address, lamports, whole = balance.whole, "Balance retrieved");
        self.state.send_modify(|s| s.show_balance(balance.clone()));
        Ok(balance)
    }

    async fn transfer_to_self(
        &self,
        provider: &Arc<dyn SigningProvider>,
        amount: &str,
    ) -> Result<String, OperationError> {
        let lamports = parse_amount(amount, SOL_DECIMALS)?;
        let wallet = SolanaWallet::new(provider.clone());
        let from = wallet.primary_account().await?;

        let block = self.rpc.get_latest_blockhash(Commitment::Finalized).await?;
        let transaction = TransferTransaction::self_transfer(&from, lamports, &block);
        let signed = wallet.sign_transaction(&transaction).await?;
        debug!(signature = %signed.signature(), lamports, "Transaction signed");

        let signature = self.rpc.send_raw_transaction(&signed).await?;
        debug!(%signature, "Transaction submitted, awaiting confirmation");
        self.rpc
            .confirm_transaction(&signature, &block, Commitment::Finalized)
            .await?;

        Ok(signature)
    }

    fn acquire_with_provider(
        &self,
    ) -> Result<(BusyGuard<'_>, Arc<dyn SigningProvider>), Outcome> {
        BusyGuard::try_acquire(&self.state, |s| s.signing_provider().cloned())
    }

    fn fail(&self, operation: Operation, err: OperationError) -> Outcome {
        let kind = err.kind();
        let message = err.user_message(operation);
        warn!(operation = operation.name(), ?kind, error = %err, "Operation failed");
        self.state.send_modify(|s| s.set_message(message));
        Outcome::Failed(kind)
    }
}

fn operation_span(operation: Operation) -> tracing::Span {
    tracing::info_span!(
        "session_op",
        op = operation.name(),
        op_id = %Uuid::new_v4()
    )
}
