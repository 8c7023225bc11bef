// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity collaborator contracts.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::error::{IdentityError, ProviderError};
use super::types::{IdentityOptions, UserProfile};

/// Constructs identity clients.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build a client bound to the configured network and chain.
    async fn init(&self, options: &IdentityOptions)
        -> Result<Arc<dyn IdentityClient>, IdentityError>;
}

/// A configured identity client (login modal plus session).
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Prepare the login modal. Must succeed before `connect`.
    async fn prepare_modal(&self) -> Result<(), IdentityError>;

    /// Run the interactive login and return a signing provider.
    async fn connect(&self) -> Result<Arc<dyn SigningProvider>, IdentityError>;

    /// Identity claims of the logged-in user.
    async fn user_info(&self) -> Result<UserProfile, IdentityError>;

    /// Tear down the session. Best effort.
    async fn logout(&self) -> Result<(), IdentityError>;

    /// Whether a session is already active (e.g. restored from storage).
    fn is_connected(&self) -> bool;

    /// Signing provider of the active session, if any.
    fn current_provider(&self) -> Option<Arc<dyn SigningProvider>>;
}

/// Opaque signing capability: a request/response channel to the key holder.
#[async_trait]
pub trait SigningProvider: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}
