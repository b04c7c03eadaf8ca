// libs/auth-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of an account; the password hash never leaves the cell.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "es_medico")]
    pub is_doctor: bool,
    pub created_at: DateTime<Utc>,
}

/// Full credential row, only used inside the cell for verification.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_doctor: bool,
    pub created_at: DateTime<Utc>,
}

/// The role the client claims at login; must match the account's flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginRole {
    Medico,
    Admin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "usuario", alias = "username")]
    pub username: String,
    #[serde(rename = "contrasena", alias = "password")]
    pub password: String,
    #[serde(rename = "rol", alias = "role")]
    pub role: LoginRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    #[serde(rename = "usuario", alias = "username")]
    pub username: String,
    #[serde(rename = "contrasena", alias = "password")]
    pub password: String,
    #[serde(rename = "es_medico", alias = "is_doctor")]
    pub is_doctor: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "usuario", alias = "username")]
    pub username: String,
    /// Absent means keep the current password.
    #[serde(rename = "contrasena", alias = "password", default)]
    pub password: Option<String>,
    #[serde(rename = "es_medico", alias = "is_doctor")]
    pub is_doctor: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Usuario o contraseña incorrectos.")]
    InvalidCredentials,

    #[error("Rol no autorizado para este usuario.")]
    RoleNotAllowed,

    #[error("El usuario ya existe.")]
    DuplicateUsername,

    #[error("Usuario no encontrado.")]
    NotFound,

    #[error("Password hashing error")]
    HashingError,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::DuplicateUsername,
            _ => AuthError::DatabaseError(err.to_string()),
        }
    }
}
