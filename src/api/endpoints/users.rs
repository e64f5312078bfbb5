//! User administration endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::run_blocking;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{SignupRequest, User, UserUpdate};
use crate::services::users;

/// `GET /api/users`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<User>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(users::list_users(&conn)?))
}

/// `POST /api/users`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(request) = payload?;
    let account = run_blocking(move || users::new_admin_account(request)).await?;
    let conn = ctx.core.lock_db()?;
    let user = users::store_account(&conn, account)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /api/users/pending`
pub async fn pending(State(ctx): State<ApiContext>) -> Result<Json<Vec<User>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(users::pending_verification(&conn)?))
}

/// `GET /api/users/role/:role`
pub async fn by_role(
    State(ctx): State<ApiContext>,
    Path(role): Path<String>,
) -> Result<Json<Vec<User>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(users::users_by_role(&conn, &role)?))
}

/// `GET /api/users/:email`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(users::get_user(&conn, &email)?))
}

/// `PUT /api/users/:email`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(update) = payload?;
    let password = update.password.clone();
    let password_hash =
        run_blocking(move || users::new_password_hash(password.as_deref())).await?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(users::apply_user_update(&conn, &email, update, password_hash)?))
}

/// `PUT /api/users/:email/verify`
pub async fn verify(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(users::verify(&conn, &email)?))
}

/// `DELETE /api/users/:email`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.core.lock_db()?;
    users::delete_user(&conn, &email)?;
    Ok(StatusCode::NO_CONTENT)
}
