// libs/doctor-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Doctor {
    pub id: Uuid,
    #[serde(rename = "dni")]
    pub national_id: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    /// Authoritative value; booking copies it onto the appointment as a
    /// snapshot, so edits here never touch existing appointments.
    #[serde(rename = "especialidad")]
    pub specialty: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "domicilio")]
    pub address: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorPayload {
    #[serde(rename = "dni", alias = "national_id")]
    pub national_id: String,
    #[serde(rename = "nombre", alias = "first_name")]
    pub first_name: String,
    #[serde(rename = "apellido", alias = "last_name")]
    pub last_name: String,
    #[serde(rename = "especialidad", alias = "specialty")]
    pub specialty: String,
    #[serde(rename = "telefono", alias = "phone", default)]
    pub phone: Option<String>,
    #[serde(rename = "fecha_nacimiento", alias = "birth_date", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "domicilio", alias = "address", default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("Médico no encontrado")]
    NotFound,

    #[error("Ya existe un médico con ese DNI.")]
    DuplicateNationalId,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for DoctorError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DoctorError::DuplicateNationalId
            }
            _ => DoctorError::DatabaseError(err.to_string()),
        }
    }
}
