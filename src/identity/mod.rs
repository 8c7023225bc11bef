// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Identity Module
//!
//! Contracts for the hosted identity collaborator and a local stand-in.
//!
//! ## Login Flow
//!
//! 1. `IdentityProvider::init` builds a client bound to a client id, identity
//!    network, chain config and modal options
//! 2. `IdentityClient::prepare_modal` readies the login UI
//! 3. `IdentityClient::connect` runs the interactive login and yields an
//!    opaque `SigningProvider`
//! 4. The chain adapter (`crate::chain::SolanaWallet`) turns that provider
//!    into account and signing calls
//!
//! Session management, OAuth exchange and key custody stay inside the
//! collaborator.

pub mod client;
pub mod error;
pub mod local;
pub mod types;

pub use client::{IdentityClient, IdentityProvider, SigningProvider};
pub use error::{IdentityError, ProviderError};
pub use local::{LocalIdentityConfig, LocalIdentityProvider};
pub use types::{IdentityOptions, LoginMethod, UiOptions, UserProfile};
