// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity provider options and profile claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chain::ChainConfig;

/// Login methods offered by the modal, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMethod {
    Google,
    Apple,
    Twitter,
    Discord,
    EmailPasswordless,
    SmsPasswordless,
}

impl LoginMethod {
    pub fn default_order() -> Vec<LoginMethod> {
        vec![
            LoginMethod::Google,
            LoginMethod::Apple,
            LoginMethod::Twitter,
            LoginMethod::Discord,
            LoginMethod::EmailPasswordless,
            LoginMethod::SmsPasswordless,
        ]
    }
}

/// Modal presentation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiOptions {
    pub app_name: String,
    pub theme: String,
    pub login_methods: Vec<LoginMethod>,
    /// `popup` or `redirect`
    pub ux_mode: String,
}

/// Everything the identity provider needs to construct a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityOptions {
    pub client_id: String,
    /// Identity network (e.g. `sapphire_devnet`, `mainnet`)
    pub network: String,
    pub chain: ChainConfig,
    pub ui: UiOptions,
}

/// Identity claims returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_of_login: Option<String>,
    /// Provider-specific claims not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
