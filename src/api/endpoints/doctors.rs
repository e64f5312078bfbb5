//! Doctor roster endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Doctor, DoctorInput};
use crate::services::doctors;

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Doctor>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(doctors::list(&conn)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<DoctorInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    let Json(input) = payload?;
    let conn = ctx.core.lock_db()?;
    Ok((StatusCode::CREATED, Json(doctors::create(&conn, input)?)))
}

pub async fn available(State(ctx): State<ApiContext>) -> Result<Json<Vec<Doctor>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(doctors::available(&conn)?))
}

pub async fn by_department(
    State(ctx): State<ApiContext>,
    Path(department): Path<String>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(doctors::by_department(&conn, &department)?))
}

pub async fn by_specialization(
    State(ctx): State<ApiContext>,
    Path(specialization): Path<String>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(doctors::by_specialization(&conn, &specialization)?))
}

pub async fn by_email(
    State(ctx): State<ApiContext>,
    Path(email): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(doctors::by_email(&conn, &email)?))
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(doctors::get(&conn, &id)?))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<DoctorInput>, JsonRejection>,
) -> Result<Json<Doctor>, ApiError> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(doctors::update(&conn, &id, input)?))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    doctors::delete(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
