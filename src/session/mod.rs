// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Module
//!
//! The wallet session state machine:
//!
//! ```text
//! Uninitialized -> Initializing -> Ready(logged out) <-> Ready(logged in)
//!                       \
//!                        -> InitFailed (terminal)
//! ```
//!
//! `SessionOrchestrator` owns the only `Session` and exposes one method per
//! user-triggered operation.

pub mod error;
pub mod model;
pub mod orchestrator;


pub use error::{ErrorKind, Operation, OperationError, Outcome};
pub use model::{AuthState, Panel, Session, SessionPhase, SessionView};
pub use orchestrator::{SessionOrchestrator, DEFAULT_TRANSFER_AMOUNT};
