//! Appointment booking endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, StatusQuery};
use crate::models::enums::AppointmentStatus;
use crate::models::{Appointment, AppointmentInput, AppointmentUpdate};
use crate::services::appointments;

fn parse_status(raw: &str) -> Result<AppointmentStatus, ApiError> {
    AppointmentStatus::parse_ignore_case(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid appointment status: {raw}")))
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Appointment>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(appointments::list(&conn)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AppointmentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let Json(input) = payload?;
    let conn = ctx.core.lock_db()?;
    Ok((StatusCode::CREATED, Json(appointments::create(&conn, input)?)))
}

pub async fn by_patient(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(appointments::by_patient(&conn, &patient_id)?))
}

pub async fn by_doctor(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(appointments::by_doctor(&conn, &doctor_id)?))
}

/// `GET /api/appointments/status/:status` (status matched case-insensitively)
pub async fn by_status(
    State(ctx): State<ApiContext>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let status = parse_status(&status)?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(appointments::by_status(&conn, status)?))
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(appointments::get(&conn, &id)?))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentUpdate>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id)?;
    let Json(update) = payload?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(appointments::update(&conn, &id, update)?))
}

/// `PATCH /api/appointments/:id/status?status=&cancellationReason=`
pub async fn update_status(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id)?;
    let Query(query) = query?;
    let status = parse_status(&query.status)?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(appointments::update_status(
        &conn,
        &id,
        status,
        query.cancellation_reason,
    )?))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    appointments::delete(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
