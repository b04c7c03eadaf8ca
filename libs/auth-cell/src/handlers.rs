// libs/auth-cell/src/handlers.rs
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

use crate::models::{AuthError, CreateUserRequest, LoginRequest, UpdateUserRequest};
use crate::services::account::AccountService;

fn map_auth_error(err: AuthError) -> AppError {
    match err {
        AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
        AuthError::RoleNotAllowed => AppError::Forbidden(err.to_string()),
        AuthError::DuplicateUsername => AppError::Conflict(err.to_string()),
        AuthError::NotFound => AppError::NotFound(err.to_string()),
        AuthError::HashingError => AppError::Internal(err.to_string()),
        AuthError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state);
    let account = service.login(request).await.map_err(map_auth_error)?;

    Ok(Json(json!({
        "ok": true,
        "msg": "Inicio de sesión correcto.",
        "user": account
    })))
}

#[axum::debug_handler]
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state);
    let users = service.list_users().await.map_err(map_auth_error)?;
    Ok(Json(json!(users)))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AccountService::new(&state);
    let user_id = service.create_user(request).await.map_err(map_auth_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "Usuario creado correctamente.",
            "id": user_id
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state);
    service
        .update_user(user_id, request)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(json!({ "msg": "Usuario actualizado correctamente." })))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&state);
    service.delete_user(user_id).await.map_err(map_auth_error)?;

    Ok(Json(json!({ "msg": "Usuario eliminado correctamente." })))
}
