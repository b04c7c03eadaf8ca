// libs/clinic-cell/src/handlers.rs
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

use crate::models::{ClinicError, ClinicPayload};
use crate::services::clinic::ClinicService;

fn map_clinic_error(err: ClinicError) -> AppError {
    match err {
        ClinicError::NotFound => AppError::NotFound(err.to_string()),
        ClinicError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_clinics(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let service = ClinicService::new(&state);
    let clinics = service.list_clinics().await.map_err(map_clinic_error)?;
    Ok(Json(json!(clinics)))
}

#[axum::debug_handler]
pub async fn create_clinic(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ClinicPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = ClinicService::new(&state);
    let clinic_id = service
        .create_clinic(payload)
        .await
        .map_err(map_clinic_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "Consultorio agregado correctamente",
            "id": clinic_id
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_clinic(
    State(state): State<Arc<AppState>>,
    Path(clinic_id): Path<Uuid>,
    Json(payload): Json<ClinicPayload>,
) -> Result<Json<Value>, AppError> {
    let service = ClinicService::new(&state);
    service
        .update_clinic(clinic_id, payload)
        .await
        .map_err(map_clinic_error)?;

    Ok(Json(json!({ "msg": "Consultorio actualizado correctamente" })))
}

#[axum::debug_handler]
pub async fn delete_clinic(
    State(state): State<Arc<AppState>>,
    Path(clinic_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ClinicService::new(&state);
    service
        .delete_clinic(clinic_id)
        .await
        .map_err(map_clinic_error)?;

    Ok(Json(json!({ "msg": "Consultorio eliminado correctamente" })))
}
