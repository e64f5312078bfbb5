//! Prescription endpoints, including pharmacist dispensing.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DispenseQuery};
use crate::models::{Prescription, PrescriptionInput, PrescriptionUpdate};
use crate::services::prescriptions;

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Prescription>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(prescriptions::list(&conn)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PrescriptionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    let Json(input) = payload?;
    let conn = ctx.core.lock_db()?;
    Ok((StatusCode::CREATED, Json(prescriptions::create(&conn, input)?)))
}

pub async fn by_patient(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(prescriptions::by_patient(&conn, &patient_id)?))
}

pub async fn by_doctor(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(prescriptions::by_doctor(&conn, &doctor_id)?))
}

pub async fn by_patient_name(
    State(ctx): State<ApiContext>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(prescriptions::by_patient_name(&conn, &name)?))
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Prescription>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(prescriptions::get(&conn, &id)?))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<PrescriptionUpdate>, JsonRejection>,
) -> Result<Json<Prescription>, ApiError> {
    let id = parse_id(&id)?;
    let Json(update) = payload?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(prescriptions::update(&conn, &id, update)?))
}

/// `PATCH /api/prescriptions/:id/dispense?pharmacistName=`
pub async fn dispense(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    query: Result<Query<DispenseQuery>, QueryRejection>,
) -> Result<Json<Prescription>, ApiError> {
    let id = parse_id(&id)?;
    let Query(query) = query?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(prescriptions::dispense(&conn, &id, &query.pharmacist_name)?))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.lock_db()?;
    prescriptions::delete(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
