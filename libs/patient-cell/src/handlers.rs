// libs/patient-cell/src/handlers.rs
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

use crate::models::{PatientError, PatientPayload};
use crate::services::patient::PatientService;

fn map_patient_error(err: PatientError) -> AppError {
    match err {
        PatientError::NotFound => AppError::NotFound(err.to_string()),
        PatientError::DuplicateNationalId => AppError::Conflict(err.to_string()),
        PatientError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_patients(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);
    let patients = service.list_patients().await.map_err(map_patient_error)?;
    Ok(Json(json!(patients)))
}

#[axum::debug_handler]
pub async fn find_patient_by_national_id(
    State(state): State<Arc<AppState>>,
    Path(national_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);
    let patient = service
        .find_by_national_id(&national_id)
        .await
        .map_err(map_patient_error)?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PatientPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(&state);
    let patient_id = service
        .create_patient(payload)
        .await
        .map_err(map_patient_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "Paciente agregado correctamente",
            "id": patient_id
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    Json(payload): Json<PatientPayload>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);
    service
        .update_patient(patient_id, payload)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({ "msg": "Paciente actualizado correctamente" })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&state);
    service
        .delete_patient(patient_id)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({ "msg": "Paciente eliminado correctamente" })))
}
