// libs/clinic-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Clinic {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "num_consultorio")]
    pub room_number: i32,
    #[serde(rename = "estado")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClinicPayload {
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
    #[serde(rename = "num_consultorio", alias = "room_number")]
    pub room_number: i32,
    #[serde(rename = "estado", alias = "active", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("Consultorio no encontrado")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for ClinicError {
    fn from(err: sqlx::Error) -> Self {
        ClinicError::DatabaseError(err.to_string())
    }
}
