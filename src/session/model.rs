// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session record and its render model.
//!
//! Fields are private: related fields only change together through the
//! transition methods below, which is what keeps the address/provider and
//! value/panel pairs consistent.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::chain::{Balance, ChainConfig};
use crate::identity::{IdentityClient, SigningProvider, UserProfile};

/// Lifecycle of the identity client. Never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    InitFailed,
}

/// Which result panel is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    #[default]
    None,
    Balance,
    Profile,
}

/// Combined auth/login state, as rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Initializing,
    LoggedOut,
    LoggedIn,
    InitFailed,
}

#[derive(Default)]
pub struct Session {
    auth_state: AuthState,
    auth_client: Option<Arc<dyn IdentityClient>>,
    signing_provider: Option<Arc<dyn SigningProvider>>,
    wallet_address: Option<String>,
    balance: Option<Balance>,
    user_profile: Option<UserProfile>,
    last_message: Option<String>,
    busy: bool,
    visible_panel: Panel,
    updated_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("auth_state", &self.auth_state)
            .field("auth_client", &self.auth_client.is_some())
            .field("signing_provider", &self.signing_provider.is_some())
            .field("wallet_address", &self.wallet_address)
            .field("balance", &self.balance)
            .field("user_profile", &self.user_profile)
            .field("last_message", &self.last_message)
            .field("busy", &self.busy)
            .field("visible_panel", &self.visible_panel)
            .finish()
    }
}

impl Session {
    pub fn auth_state(&self) -> AuthState {
        self.auth_state
    }

    pub fn auth_client(&self) -> Option<&Arc<dyn IdentityClient>> {
        self.auth_client.as_ref()
    }

    pub fn signing_provider(&self) -> Option<&Arc<dyn SigningProvider>> {
        self.signing_provider.as_ref()
    }

    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet_address.as_deref()
    }

    pub fn balance(&self) -> Option<&Balance> {
        self.balance.as_ref()
    }

    pub fn user_profile(&self) -> Option<&UserProfile> {
        self.user_profile.as_ref()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn visible_panel(&self) -> Panel {
        self.visible_panel
    }

    pub fn is_logged_in(&self) -> bool {
        self.signing_provider.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        match self.auth_state {
            AuthState::Uninitialized => SessionPhase::Uninitialized,
            AuthState::Initializing => SessionPhase::Initializing,
            AuthState::InitFailed => SessionPhase::InitFailed,
            AuthState::Ready if self.is_logged_in() => SessionPhase::LoggedIn,
            AuthState::Ready => SessionPhase::LoggedOut,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// `Uninitialized → Initializing`. Returns false from any other state.
    pub(crate) fn begin_initialization(&mut self) -> bool {
        if self.auth_state != AuthState::Uninitialized {
            return false;
        }
        self.auth_state = AuthState::Initializing;
        self.touch();
        true
    }

    pub(crate) fn finish_initialization(&mut self, client: Arc<dyn IdentityClient>) {
        if self.auth_state == AuthState::Initializing {
            self.auth_client = Some(client);
            self.auth_state = AuthState::Ready;
            self.touch();
        }
    }

    pub(crate) fn fail_initialization(&mut self, message: String) {
        if self.auth_state == AuthState::Initializing {
            self.auth_state = AuthState::InitFailed;
            self.last_message = Some(message);
            self.touch();
        }
    }

    /// Set provider and address together and clear the result panel.
    pub(crate) fn sign_in(&mut self, provider: Arc<dyn SigningProvider>, address: String) {
        self.signing_provider = Some(provider);
        self.wallet_address = Some(address);
        self.visible_panel = Panel::None;
        self.touch();
    }

    /// Drop everything tied to the login; the identity client stays.
    pub(crate) fn sign_out(&mut self) {
        self.signing_provider = None;
        self.wallet_address = None;
        self.balance = None;
        self.user_profile = None;
        self.visible_panel = Panel::None;
        self.touch();
    }

    pub(crate) fn show_balance(&mut self, balance: Balance) {
        self.balance = Some(balance);
        self.visible_panel = Panel::Balance;
        self.touch();
    }

    pub(crate) fn show_profile(&mut self, profile: UserProfile) {
        self.user_profile = Some(profile);
        self.visible_panel = Panel::Profile;
        self.touch();
    }

    pub(crate) fn set_message(&mut self, message: String) {
        self.last_message = Some(message);
        self.touch();
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        self.touch();
    }

    /// Render model for the interface layer.
    pub fn view(&self, chain: &ChainConfig) -> SessionView {
        SessionView {
            state: self.phase(),
            busy: self.busy,
            network: chain.display_name.clone(),
            ticker: chain.ticker.clone(),
            block_explorer_url: chain.block_explorer_url.clone(),
            wallet_address: self.wallet_address.clone(),
            balance: self.balance.clone(),
            user_profile: self.user_profile.clone(),
            last_message: self.last_message.clone(),
            visible_panel: self.visible_panel,
            updated_at: self.updated_at,
        }
    }
}

/// Serializable snapshot of the session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionView {
    /// Lifecycle state
    pub state: SessionPhase,
    /// True while an operation is in flight
    pub busy: bool,
    /// Chain display name
    pub network: String,
    /// Native ticker symbol
    pub ticker: String,
    /// Block explorer base URL
    pub block_explorer_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
    /// Identity claims of the logged-in user
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub user_profile: Option<UserProfile>,
    /// Most recent status or error text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    pub visible_panel: Panel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
