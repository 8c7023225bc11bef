// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local watch-only identity provider.
//!
//! Stands in for a hosted identity SDK during development: login always
//! succeeds for the configured address, profile claims come from
//! configuration, and signing requests are refused.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::client::{IdentityClient, IdentityProvider, SigningProvider};
use super::error::{IdentityError, ProviderError};
use super::types::{IdentityOptions, UserProfile};

/// Settings for the local identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalIdentityConfig {
    pub wallet_address: Option<String>,
    pub name: String,
    pub email: Option<String>,
}

/// Identity provider backed by [`LocalIdentityConfig`].
#[derive(Debug, Clone)]
pub struct LocalIdentityProvider {
    config: LocalIdentityConfig,
}

impl LocalIdentityProvider {
    pub fn new(config: LocalIdentityConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn init(
        &self,
        options: &IdentityOptions,
    ) -> Result<Arc<dyn IdentityClient>, IdentityError> {
        if options.client_id.trim().is_empty() {
            return Err(IdentityError::Configuration(
                "client id is required (set WEB3AUTH_CLIENT_ID)".to_string(),
            ));
        }

        tracing::info!(
            network = %options.network,
            chain_id = %options.chain.chain_id,
            app_name = %options.ui.app_name,
            "Local identity client created"
        );

        Ok(Arc::new(LocalIdentityClient {
            config: self.config.clone(),
            session: Mutex::new(None),
        }))
    }
}

struct LocalIdentityClient {
    config: LocalIdentityConfig,
    session: Mutex<Option<Arc<dyn SigningProvider>>>,
}

impl LocalIdentityClient {
    fn address(&self) -> Result<&str, IdentityError> {
        self.config.wallet_address.as_deref().ok_or_else(|| {
            IdentityError::Configuration(
                "no local wallet address configured (set LOCAL_WALLET_ADDRESS)".to_string(),
            )
        })
    }

    fn session(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn SigningProvider>>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityClient for LocalIdentityClient {
    async fn prepare_modal(&self) -> Result<(), IdentityError> {
        self.address().map(|_| ())
    }

    async fn connect(&self) -> Result<Arc<dyn SigningProvider>, IdentityError> {
        let provider: Arc<dyn SigningProvider> = Arc::new(WatchOnlyProvider {
            address: self.address()?.to_string(),
        });
        *self.session() = Some(provider.clone());
        Ok(provider)
    }

    async fn user_info(&self) -> Result<UserProfile, IdentityError> {
        if self.session().is_none() {
            return Err(IdentityError::NotConnected);
        }

        Ok(UserProfile {
            name: Some(self.config.name.clone()),
            email: self.config.email.clone(),
            verifier: Some("local".to_string()),
            verifier_id: self.config.wallet_address.clone(),
            type_of_login: Some("local".to_string()),
            ..UserProfile::default()
        })
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        match self.session().take() {
            Some(_) => Ok(()),
            None => Err(IdentityError::NotConnected),
        }
    }

    fn is_connected(&self) -> bool {
        self.session().is_some()
    }

    fn current_provider(&self) -> Option<Arc<dyn SigningProvider>> {
        self.session().clone()
    }
}

/// Answers account requests for a fixed address and refuses to sign.
struct WatchOnlyProvider {
    address: String,
}

#[async_trait]
impl SigningProvider for WatchOnlyProvider {
    async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
        match method {
            "requestAccounts" | "getAccounts" => Ok(json!([self.address])),
            other => Err(ProviderError::UnsupportedMethod(format!(
                "{other} (local identity is watch-only)"
            ))),
        }
    }
}
