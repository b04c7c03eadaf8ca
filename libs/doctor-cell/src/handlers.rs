// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{DoctorError, DoctorPayload};
use crate::services::doctor::DoctorService;

fn map_doctor_error(err: DoctorError) -> AppError {
    match err {
        DoctorError::NotFound => AppError::NotFound(err.to_string()),
        DoctorError::DuplicateNationalId => AppError::Conflict(err.to_string()),
        DoctorError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let doctors = service.list_doctors().await.map_err(map_doctor_error)?;
    Ok(Json(json!(doctors)))
}

#[axum::debug_handler]
pub async fn find_doctor_by_national_id(
    State(state): State<Arc<AppState>>,
    Path(national_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let doctor = service
        .find_by_national_id(&national_id)
        .await
        .map_err(map_doctor_error)?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DoctorPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = DoctorService::new(&state);
    let doctor_id = service
        .create_doctor(payload)
        .await
        .map_err(map_doctor_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "Médico agregado correctamente",
            "id": doctor_id
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Json(payload): Json<DoctorPayload>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    service
        .update_doctor(doctor_id, payload)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "msg": "Médico actualizado correctamente" })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    service
        .delete_doctor(doctor_id)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "msg": "Médico eliminado correctamente" })))
}
