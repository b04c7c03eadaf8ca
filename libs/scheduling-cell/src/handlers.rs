// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{
    BookAppointmentRequest, OccupiedSlotsQuery, OccupiedSlotsResponse, SchedulingError,
};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;
use crate::services::slot_rules;

fn map_scheduling_error(err: SchedulingError) -> AppError {
    match err {
        SchedulingError::InvalidSlot(_) | SchedulingError::InvalidAmount => {
            AppError::BadRequest(err.to_string())
        }
        SchedulingError::PatientNotFound
        | SchedulingError::DoctorNotFound
        | SchedulingError::NotFound => AppError::NotFound(err.to_string()),
        SchedulingError::SlotTaken => AppError::Conflict(err.to_string()),
        SchedulingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);
    let appointments = booking_service
        .list_appointments()
        .await
        .map_err(map_scheduling_error)?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);
    let appointment = booking_service
        .get_appointment(appointment_id)
        .await
        .map_err(map_scheduling_error)?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking_service = BookingService::new(&state);
    let appointment_id = booking_service
        .book(request)
        .await
        .map_err(map_scheduling_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "Turno creado correctamente.",
            "id": appointment_id
        })),
    ))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);
    booking_service
        .reschedule(appointment_id, request)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({ "msg": "Turno actualizado correctamente." })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);
    booking_service
        .delete_appointment(appointment_id)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!({ "msg": "Turno eliminado correctamente." })))
}

/// Taken hours for a doctor on a date, for the slot picker. The date comes
/// in as raw text and goes through the same normalization as booking.
#[axum::debug_handler]
pub async fn occupied_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OccupiedSlotsQuery>,
) -> Result<Json<OccupiedSlotsResponse>, AppError> {
    let (doctor_id, raw_date) = match (query.doctor_id, query.date) {
        (Some(doctor_id), Some(date)) => (doctor_id, date),
        _ => {
            return Err(AppError::BadRequest(
                "medicoId y fecha son obligatorios.".to_string(),
            ))
        }
    };

    let date = slot_rules::normalize_date(&raw_date)
        .ok_or_else(|| AppError::BadRequest("Formato de fecha inválido.".to_string()))?;

    let availability = AvailabilityService::new(&state);
    let slots = availability
        .occupied_slots(doctor_id, date, query.exclude_id)
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(OccupiedSlotsResponse {
        occupied: slots
            .into_iter()
            .map(|time| time.format("%H:%M").to_string())
            .collect(),
    }))
}
