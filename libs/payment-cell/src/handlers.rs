// libs/payment-cell/src/handlers.rs
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

use crate::models::{PaymentError, RecordPaymentRequest, UpdatePaymentRequest};
use crate::services::ledger::PaymentLedgerService;

fn map_payment_error(err: PaymentError) -> AppError {
    match err {
        PaymentError::NotFound | PaymentError::AppointmentNotFound => {
            AppError::NotFound(err.to_string())
        }
        PaymentError::DuplicatePayment => AppError::Conflict(err.to_string()),
        PaymentError::InvalidAmount => AppError::BadRequest(err.to_string()),
        PaymentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let ledger = PaymentLedgerService::new(&state);
    let payments = ledger.list_payments().await.map_err(map_payment_error)?;
    Ok(Json(json!(payments)))
}

#[axum::debug_handler]
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let ledger = PaymentLedgerService::new(&state);
    let payment = ledger
        .get_payment(payment_id)
        .await
        .map_err(map_payment_error)?;
    Ok(Json(json!(payment)))
}

#[axum::debug_handler]
pub async fn record_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let ledger = PaymentLedgerService::new(&state);
    let payment_id = ledger
        .record_payment(request)
        .await
        .map_err(map_payment_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "Pago registrado correctamente.",
            "id": payment_id
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_payment(
    State(state): State<Arc<AppState>>,
    Path(payment_id): Path<Uuid>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let ledger = PaymentLedgerService::new(&state);
    ledger
        .update_payment(payment_id, request)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({ "msg": "Pago actualizado correctamente." })))
}

#[axum::debug_handler]
pub async fn delete_payment(
    State(state): State<Arc<AppState>>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let ledger = PaymentLedgerService::new(&state);
    ledger
        .delete_payment(payment_id)
        .await
        .map_err(map_payment_error)?;

    Ok(Json(json!({ "msg": "Pago eliminado correctamente." })))
}
