//! Signup and login.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::run_blocking;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthResponse};
use crate::models::{LoginRequest, SignupRequest};
use crate::services::users;

/// `POST /auth/signup`
pub async fn signup(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(mut request) = payload?;
    // Only administrators choose the verification state.
    request.verified = None;

    let account = run_blocking(move || users::new_signup_account(request)).await?;
    let user = {
        let conn = ctx.core.lock_db()?;
        users::store_account(&conn, account)?
    };

    let message = if user.verified {
        "Account created successfully!"
    } else {
        "Account created! Waiting for admin approval."
    };
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: message.into(),
            user,
        }),
    ))
}

/// `POST /auth/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload?;
    let account = {
        let conn = ctx.core.lock_db()?;
        users::find_login_account(&conn, &request.email)?
    };
    let user =
        run_blocking(move || users::check_credentials(account, &request.password)).await?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful!".into(),
        user,
    }))
}
