// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Settings are read from the environment at startup. Every chain and
//! identity setting has a hardcoded default so the service starts against
//! Solana testnet with no configuration at all; blank values count as unset.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WEB3AUTH_CLIENT_ID` | Identity client identifier | empty |
//! | `WEB3AUTH_NETWORK` | Identity network selector | `sapphire_devnet` |
//! | `MOONPAY_API_KEY` | Fiat ramp partner API key | empty |
//! | `RAMP_PARTNER_DOMAIN` | Fiat ramp partner domain | `moonpay.com` |
//! | `CHAIN_ID` | Chain identifier | `0x2` |
//! | `RPC_TARGET` | Solana JSON-RPC endpoint | `https://api.testnet.solana.com` |
//! | `CHAIN_DISPLAY_NAME` | Chain display name | `Solana Testnet` |
//! | `BLOCK_EXPLORER_URL` | Block explorer | `https://explorer.solana.com` |
//! | `CHAIN_TICKER` | Native ticker | `SOL` |
//! | `CHAIN_TICKER_NAME` | Native ticker name | `Solana` |
//! | `APP_NAME` | App name shown by the identity modal | `KROSSWALKS` |
//! | `LOCAL_WALLET_ADDRESS` | Address served by the local identity | unset |
//! | `LOCAL_PROFILE_NAME` | Name served by the local identity | `Local User` |
//! | `LOCAL_PROFILE_EMAIL` | Email served by the local identity | unset |
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use url::Url;

use crate::chain::ChainConfig;
use crate::identity::{IdentityOptions, LocalIdentityConfig, LoginMethod, UiOptions};
use crate::ramp::RampConfig;

pub const DEFAULT_IDENTITY_NETWORK: &str = "sapphire_devnet";
pub const DEFAULT_CHAIN_ID: &str = "0x2";
pub const DEFAULT_RPC_TARGET: &str = "https://api.testnet.solana.com";
pub const DEFAULT_CHAIN_DISPLAY_NAME: &str = "Solana Testnet";
pub const DEFAULT_BLOCK_EXPLORER_URL: &str = "https://explorer.solana.com";
pub const DEFAULT_TICKER: &str = "SOL";
pub const DEFAULT_TICKER_NAME: &str = "Solana";
pub const DEFAULT_APP_NAME: &str = "KROSSWALKS";
pub const DEFAULT_RAMP_PARTNER_DOMAIN: &str = "moonpay.com";
pub const DEFAULT_LOCAL_PROFILE_NAME: &str = "Local User";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid RPC_TARGET `{value}`: {reason}")]
    InvalidRpcTarget { value: String, reason: String },

    #[error("Invalid PORT `{0}`")]
    InvalidPort(String),
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Fully resolved service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: String,
    pub identity_network: String,
    pub app_name: String,
    pub chain: ChainConfig,
    pub ramp: RampConfig,
    pub local_identity: LocalIdentityConfig,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or_default = |name: &str, default: &str| {
            optional(name).unwrap_or_else(|| default.to_string())
        };

        let rpc_target = or_default("RPC_TARGET", DEFAULT_RPC_TARGET);
        Url::parse(&rpc_target).map_err(|e| ConfigError::InvalidRpcTarget {
            value: rpc_target.clone(),
            reason: e.to_string(),
        })?;

        let port = match optional("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let log_format = match optional(LOG_FORMAT_ENV).as_deref() {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let chain = ChainConfig {
            chain_namespace: "solana".to_string(),
            chain_id: or_default("CHAIN_ID", DEFAULT_CHAIN_ID),
            rpc_target,
            display_name: or_default("CHAIN_DISPLAY_NAME", DEFAULT_CHAIN_DISPLAY_NAME),
            block_explorer_url: or_default("BLOCK_EXPLORER_URL", DEFAULT_BLOCK_EXPLORER_URL),
            ticker: or_default("CHAIN_TICKER", DEFAULT_TICKER),
            ticker_name: or_default("CHAIN_TICKER_NAME", DEFAULT_TICKER_NAME),
        };

        let ramp = RampConfig {
            partner_domain: or_default("RAMP_PARTNER_DOMAIN", DEFAULT_RAMP_PARTNER_DOMAIN),
            api_key: optional("MOONPAY_API_KEY").unwrap_or_default(),
            currency_code: chain.ticker.to_ascii_lowercase(),
        };

        let local_identity = LocalIdentityConfig {
            wallet_address: optional("LOCAL_WALLET_ADDRESS"),
            name: or_default("LOCAL_PROFILE_NAME", DEFAULT_LOCAL_PROFILE_NAME),
            email: optional("LOCAL_PROFILE_EMAIL"),
        };

        Ok(Self {
            client_id: optional("WEB3AUTH_CLIENT_ID").unwrap_or_default(),
            identity_network: or_default("WEB3AUTH_NETWORK", DEFAULT_IDENTITY_NETWORK),
            app_name: or_default("APP_NAME", DEFAULT_APP_NAME),
            chain,
            ramp,
            local_identity,
            host: or_default("HOST", DEFAULT_HOST),
            port,
            log_format,
        })
    }

    /// Options handed to the identity provider at initialization.
    pub fn identity_options(&self) -> IdentityOptions {
        IdentityOptions {
            client_id: self.client_id.clone(),
            network: self.identity_network.clone(),
            chain: self.chain.clone(),
            ui: UiOptions {
                app_name: self.app_name.clone(),
                theme: "dark".to_string(),
                login_methods: LoginMethod::default_order(),
                ux_mode: "popup".to_string(),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
