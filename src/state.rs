// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::Path;
use std::sync::Arc;

use crate::auth::SessionIssuer;
use crate::login_flow::{LoginFlow, Repositories};
use crate::storage::StorageResult;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub login: Arc<LoginFlow>,
}

impl AppState {
    pub fn new(login: LoginFlow) -> Self {
        Self {
            login: Arc::new(login),
        }
    }

    /// State backed by in-memory stores, signing sessions with `secret`.
    pub fn in_memory(secret: &[u8]) -> Self {
        Self::new(LoginFlow::in_memory(SessionIssuer::new(secret)))
    }

    /// State whose accounts and login history persist under `data_dir`.
    pub fn persistent(secret: &[u8], data_dir: &Path) -> StorageResult<Self> {
        let repos = Repositories::persistent(data_dir)?;
        Ok(Self::new(LoginFlow::new(repos, SessionIssuer::new(secret))))
    }

    pub fn sessions(&self) -> &SessionIssuer {
        self.login.sessions()
    }
}
