// libs/patient-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Patient {
    pub id: Uuid,
    #[serde(rename = "dni")]
    pub national_id: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "domicilio")]
    pub address: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "obra_social")]
    pub insurer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload. The birth date arrives as raw text (the form also
/// sends full ISO timestamps) and is normalized by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientPayload {
    #[serde(rename = "dni", alias = "national_id")]
    pub national_id: String,
    #[serde(rename = "nombre", alias = "first_name")]
    pub first_name: String,
    #[serde(rename = "apellido", alias = "last_name")]
    pub last_name: String,
    #[serde(rename = "telefono", alias = "phone", default)]
    pub phone: Option<String>,
    #[serde(rename = "fecha_nacimiento", alias = "birth_date", default)]
    pub birth_date: Option<String>,
    #[serde(rename = "domicilio", alias = "address", default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "obra_social", alias = "insurer", default)]
    pub insurer: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Paciente no encontrado")]
    NotFound,

    #[error("Ya existe un paciente con ese DNI.")]
    DuplicateNationalId,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PatientError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PatientError::DuplicateNationalId
            }
            _ => PatientError::DatabaseError(err.to_string()),
        }
    }
}
