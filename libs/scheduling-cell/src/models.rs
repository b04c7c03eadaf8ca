// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use payment_cell::models::PaymentMethod;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Appointment {
    pub id: Uuid,
    #[serde(rename = "fecha")]
    #[sqlx(rename = "scheduled_date")]
    pub date: NaiveDate,
    #[serde(rename = "hora")]
    #[sqlx(rename = "scheduled_time")]
    pub time: NaiveTime,
    #[serde(rename = "medico_id")]
    pub doctor_id: Uuid,
    #[serde(rename = "paciente_id")]
    pub patient_id: Uuid,
    /// Specialty copied from the doctor at booking time. Deliberately not a
    /// live reference: editing the doctor later must not rewrite history.
    #[serde(rename = "especialidad")]
    pub specialty: String,
    #[serde(skip_serializing)]
    pub payment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: appointment joined with doctor, patient and payment data.
/// The payment id itself stays internal; only amount and method go out.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AppointmentDetails {
    pub id: Uuid,
    #[serde(rename = "fecha")]
    #[sqlx(rename = "scheduled_date")]
    pub date: NaiveDate,
    #[serde(rename = "hora")]
    #[sqlx(rename = "scheduled_time")]
    pub time: NaiveTime,
    #[serde(rename = "medico_id")]
    pub doctor_id: Uuid,
    #[serde(rename = "paciente_id")]
    pub patient_id: Uuid,
    #[serde(rename = "especialidad")]
    pub specialty: String,
    #[serde(rename = "medico_nombre")]
    pub doctor_first_name: Option<String>,
    #[serde(rename = "medico_apellido")]
    pub doctor_last_name: Option<String>,
    #[serde(rename = "medico_especialidad")]
    pub doctor_specialty: Option<String>,
    #[serde(rename = "paciente_nombre")]
    pub patient_first_name: Option<String>,
    #[serde(rename = "paciente_apellido")]
    pub patient_last_name: Option<String>,
    #[serde(rename = "paciente_dni")]
    pub patient_national_id: Option<String>,
    #[serde(rename = "pago_monto")]
    pub payment_amount: Option<Decimal>,
    #[serde(rename = "pago_tipo")]
    pub payment_method: Option<String>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Booking payload as the front end sends it. Date and time arrive as raw
/// text and go through slot normalization before anything touches storage.
#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    #[serde(rename = "dni", alias = "patient_national_id")]
    pub patient_national_id: String,
    #[serde(rename = "medico_id", alias = "doctor_id")]
    pub doctor_id: Uuid,
    #[serde(rename = "fecha", alias = "date")]
    pub date: String,
    #[serde(rename = "hora", alias = "time")]
    pub time: String,
    #[serde(rename = "monto", alias = "amount")]
    pub amount: Decimal,
    #[serde(rename = "tipo_pago", alias = "payment_method")]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OccupiedSlotsQuery {
    #[serde(rename = "medicoId", alias = "doctor_id")]
    pub doctor_id: Option<Uuid>,
    #[serde(rename = "fecha", alias = "date")]
    pub date: Option<String>,
    #[serde(rename = "excludeId", alias = "exclude_id")]
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OccupiedSlotsResponse {
    pub occupied: Vec<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

/// A slot policy violation. Messages are the exact user-facing Spanish
/// strings the front end displays.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotRuleViolation {
    #[error("Fecha u hora inválidas.")]
    Unparsable,

    #[error("Solo se permiten turnos de lunes a viernes.")]
    NotBusinessDay,

    #[error("La fecha debe ser futura.")]
    NotFuture,

    #[error("Solo se permiten turnos hasta 20 días adelante.")]
    BeyondHorizon,

    #[error("La hora debe estar entre las 09:00 y las 18:00.")]
    OutsideBusinessHours,
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("{0}")]
    InvalidSlot(#[from] SlotRuleViolation),

    #[error("El monto debe ser un número mayor a cero.")]
    InvalidAmount,

    #[error("No existe un paciente con ese DNI.")]
    PatientNotFound,

    #[error("El médico seleccionado no existe.")]
    DoctorNotFound,

    #[error("El turno no existe.")]
    NotFound,

    #[error("Ese horario ya está asignado para este médico.")]
    SlotTaken,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for SchedulingError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // The (doctor, date, time) unique index decides races the
            // in-transaction check could not see.
            sqlx::Error::Database(db) if db.is_unique_violation() => SchedulingError::SlotTaken,
            _ => SchedulingError::DatabaseError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_request_accepts_spanish_wire_names() {
        let request: BookAppointmentRequest = serde_json::from_str(
            r#"{
                "dni": "12345678",
                "medico_id": "7f2a1f9e-8a1e-4f9a-9d44-1df6f3f1a001",
                "fecha": "2025-11-10",
                "hora": "09:00",
                "monto": 1000,
                "tipo_pago": "Efectivo"
            }"#,
        )
        .unwrap();

        assert_eq!(request.patient_national_id, "12345678");
        assert_eq!(request.payment_method, PaymentMethod::Cash);
    }

    #[test]
    fn booking_request_rejects_missing_fields() {
        let result = serde_json::from_str::<BookAppointmentRequest>(
            r#"{"dni": "12345678", "fecha": "2025-11-10"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn booking_request_rejects_unknown_payment_method() {
        let result = serde_json::from_str::<BookAppointmentRequest>(
            r#"{
                "dni": "12345678",
                "medico_id": "7f2a1f9e-8a1e-4f9a-9d44-1df6f3f1a001",
                "fecha": "2025-11-10",
                "hora": "09:00",
                "monto": 1000,
                "tipo_pago": "Cheque"
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn slot_violations_carry_user_facing_messages() {
        assert_eq!(
            SlotRuleViolation::NotFuture.to_string(),
            "La fecha debe ser futura."
        );
        assert_eq!(
            SlotRuleViolation::OutsideBusinessHours.to_string(),
            "La hora debe estar entre las 09:00 y las 18:00."
        );
    }
}
