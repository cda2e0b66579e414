// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{auth::Auth, error::ApiError, models::LoginHistoryResponse, state::AppState};

/// Up to ten most recent logins of the caller's wallet, newest first.
#[utoipa::path(
    get,
    path = "/api/login-history",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = LoginHistoryResponse),
        (status = 401, description = "Missing or invalid session token"),
        (status = 500, description = "History could not be read")
    )
)]
pub async fn login_history(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<LoginHistoryResponse>, ApiError> {
    let logins = state.login.login_history(&user.wallet_address)?;
    Ok(Json(LoginHistoryResponse { logins }))
}
