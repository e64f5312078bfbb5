//! Department endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Department, DepartmentInput};
use crate::services::departments;

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Department>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(departments::list(&conn)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<DepartmentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Department>), ApiError> {
    let Json(input) = payload?;
    let conn = ctx.core.lock_db()?;
    Ok((StatusCode::CREATED, Json(departments::create(&conn, input)?)))
}

pub async fn active(State(ctx): State<ApiContext>) -> Result<Json<Vec<Department>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(departments::active(&conn)?))
}

pub async fn by_name(
    State(ctx): State<ApiContext>,
    Path(name): Path<String>,
) -> Result<Json<Department>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(departments::by_name(&conn, &name)?))
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Department>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(departments::get(&conn, &id)?))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<DepartmentInput>, JsonRejection>,
) -> Result<Json<Department>, ApiError> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(departments::update(&conn, &id, input)?))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    departments::delete(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
