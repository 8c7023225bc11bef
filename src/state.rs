// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::session::SessionOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SessionOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: SessionOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
