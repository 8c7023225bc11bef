// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Operation errors and their classification.

use serde::Serialize;

use crate::chain::ChainError;
use crate::identity::{IdentityError, ProviderError};

/// Origin class of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Identity setup failed; no login is possible until restart.
    Initialization,
    /// The user cancelled or rejected an interactive step.
    Interactive,
    /// A collaborator or the network failed.
    Collaborator,
}

/// User-triggered session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Initialize,
    RestoreSession,
    Login,
    FetchProfile,
    FetchBalance,
    SendTransfer,
    Logout,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Initialize => "initialize",
            Operation::RestoreSession => "restore_session",
            Operation::Login => "login",
            Operation::FetchProfile => "fetch_profile",
            Operation::FetchBalance => "fetch_balance",
            Operation::SendTransfer => "send_self_transfer",
            Operation::Logout => "logout",
        }
    }

    /// Prefix of the user-visible failure message.
    pub fn failure_label(&self) -> &'static str {
        match self {
            Operation::Initialize => "Initialization error",
            Operation::RestoreSession => "Session restore error",
            Operation::Login => "Login error",
            Operation::FetchProfile => "Profile error",
            Operation::FetchBalance => "Balance error",
            Operation::SendTransfer => "Transaction error",
            Operation::Logout => "Logout error",
        }
    }
}

/// Failure of a delegated collaborator call.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl OperationError {
    /// Classification outside of initialization.
    pub fn kind(&self) -> ErrorKind {
        let user_initiated = match self {
            OperationError::Identity(e) => e.is_user_initiated(),
            OperationError::Provider(e) => e.is_user_initiated(),
            OperationError::Chain(_) => false,
        };
        if user_initiated {
            ErrorKind::Interactive
        } else {
            ErrorKind::Collaborator
        }
    }

    /// Text shown to the user for a failure of `operation`.
    pub fn user_message(&self, operation: Operation) -> String {
        format!("{}: {}", operation.failure_label(), self)
    }
}

/// Result of invoking an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All delegated calls succeeded.
    Completed,
    /// A delegated call failed; the message was recorded.
    Failed(ErrorKind),
    /// Precondition not met; nothing happened.
    Skipped,
    /// Another operation holds the session; nothing happened.
    Busy,
}
