// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fiat on-ramp/off-ramp redirect links.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Direction of a ramp redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RampDirection {
    Buy,
    Sell,
}

impl RampDirection {
    fn subdomain(&self) -> &'static str {
        match self {
            RampDirection::Buy => "buy",
            RampDirection::Sell => "sell",
        }
    }
}

/// Ramp partner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RampConfig {
    pub partner_domain: String,
    pub api_key: String,
    /// Lowercase ticker, e.g. `sol`
    pub currency_code: String,
}

/// Build the partner URL for `wallet_address`.
///
/// The partner expects the query directly after the host, without a path.
pub fn build_ramp_url(
    config: &RampConfig,
    direction: RampDirection,
    wallet_address: &str,
) -> String {
    let encode = |value: &str| -> String {
        url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
    };

    format!(
        "https://{}.{}?apiKey={}&currencyCode={}&walletAddress={}",
        direction.subdomain(),
        config.partner_domain.trim_matches('/'),
        encode(&config.api_key),
        encode(&config.currency_code),
        encode(wallet_address),
    )
}
