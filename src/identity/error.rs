// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity and signing provider errors.

/// Errors reported by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The user closed the login modal or declined the flow.
    #[error("User closed the login modal")]
    Cancelled,

    /// The client was configured incorrectly.
    #[error("Invalid identity configuration: {0}")]
    Configuration(String),

    /// The client has no active session for an operation that needs one.
    #[error("Identity session is not connected")]
    NotConnected,

    /// The hosted service could not be reached or answered with an error.
    #[error("Identity service error: {0}")]
    Service(String),
}

impl IdentityError {
    /// Whether the error was caused by the user rather than the system.
    pub fn is_user_initiated(&self) -> bool {
        matches!(self, IdentityError::Cancelled)
    }
}

/// Errors reported by a signing provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The user rejected the request.
    #[error("User rejected the request")]
    Rejected,

    /// The provider does not implement the requested method.
    #[error("Unsupported provider method `{0}`")]
    UnsupportedMethod(String),

    /// The provider answered with something the adapter cannot interpret.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider error: {0}")]
    Internal(String),
}

impl ProviderError {
    pub fn is_user_initiated(&self) -> bool {
        matches!(self, ProviderError::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cancellation_and_rejection_are_user_initiated() {
        assert!(IdentityError::Cancelled.is_user_initiated());
        assert!(!IdentityError::Service("down".into()).is_user_initiated());
        assert!(ProviderError::Rejected.is_user_initiated());
        assert!(!ProviderError::UnsupportedMethod("x".into()).is_user_initiated());
    }

    #[test]
    fn display_messages_are_human_readable() {
        assert_eq!(
            IdentityError::Cancelled.to_string(),
            "User closed the login modal"
        );
        assert_eq!(
            ProviderError::UnsupportedMethod("signTransaction".into()).to_string(),
            "Unsupported provider method `signTransaction`"
        );
    }
}
