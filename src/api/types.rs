//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;
use crate::models::User;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Body returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

/// Query string of `PATCH /api/appointments/:id/status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub status: String,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// Query string of `PATCH /api/prescriptions/:id/dispense`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispenseQuery {
    pub pharmacist_name: String,
}
