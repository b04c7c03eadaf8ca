// libs/payment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ==============================================================================
// PAYMENT METHOD
// ==============================================================================

/// Accepted payment methods. The wire (and storage) representation keeps the
/// Spanish labels the existing front end sends; English snake_case aliases are
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Efectivo", alias = "cash")]
    Cash,
    #[serde(rename = "Tarjeta Débito", alias = "debit_card")]
    DebitCard,
    #[serde(rename = "Transferencia", alias = "transfer")]
    Transfer,
    #[serde(rename = "Tarjeta Crédito", alias = "credit_card")]
    CreditCard,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::DebitCard => "Tarjeta Débito",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::CreditCard => "Tarjeta Crédito",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Tipo de pago inválido.")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Efectivo" => Ok(PaymentMethod::Cash),
            "Tarjeta Débito" => Ok(PaymentMethod::DebitCard),
            "Transferencia" => Ok(PaymentMethod::Transfer),
            "Tarjeta Crédito" => Ok(PaymentMethod::CreditCard),
            other => Err(UnknownPaymentMethod(other.to_string())),
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = UnknownPaymentMethod;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

// ==============================================================================
// CORE PAYMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub amount: Decimal,
    #[sqlx(try_from = "String")]
    pub method: PaymentMethod,
    pub appointment_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ledger listing row: payment enriched with its appointment and the people
/// involved. Joined fields are optional so a half-migrated row still lists.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentDetails {
    pub id: Uuid,
    #[serde(rename = "monto")]
    pub amount: Decimal,
    #[serde(rename = "tipo")]
    #[sqlx(try_from = "String")]
    pub method: PaymentMethod,
    #[serde(rename = "turno_id")]
    pub appointment_id: Uuid,
    #[serde(rename = "fecha")]
    pub appointment_date: Option<NaiveDate>,
    #[serde(rename = "hora")]
    pub appointment_time: Option<NaiveTime>,
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
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Standalone path: attach a payment to an existing, still unpaid appointment.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentRequest {
    #[serde(rename = "turno_id", alias = "appointment_id")]
    pub appointment_id: Uuid,
    #[serde(rename = "monto", alias = "amount")]
    pub amount: Decimal,
    #[serde(rename = "tipo", alias = "method")]
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentRequest {
    #[serde(rename = "monto", alias = "amount")]
    pub amount: Decimal,
    #[serde(rename = "tipo", alias = "method")]
    pub method: PaymentMethod,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("El pago no existe.")]
    NotFound,

    #[error("El turno indicado no existe.")]
    AppointmentNotFound,

    #[error("Ese turno ya tiene un pago asociado.")]
    DuplicatePayment,

    #[error("El monto debe ser mayor a cero.")]
    InvalidAmount,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PaymentError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // The payments.appointment_id unique index is the final arbiter
            // for the one-payment-per-appointment rule.
            sqlx::Error::Database(db) if db.is_unique_violation() => PaymentError::DuplicatePayment,
            _ => PaymentError::DatabaseError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_round_trips_wire_names() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::DebitCard,
            PaymentMethod::Transfer,
            PaymentMethod::CreditCard,
        ] {
            let encoded = serde_json::to_string(&method).unwrap();
            let decoded: PaymentMethod = serde_json::from_str(&encoded).unwrap();
            assert_eq!(method, decoded);
            assert_eq!(encoded, format!("\"{}\"", method.as_str()));
        }
    }

    #[test]
    fn payment_method_accepts_english_aliases() {
        let decoded: PaymentMethod = serde_json::from_str("\"debit_card\"").unwrap();
        assert_eq!(decoded, PaymentMethod::DebitCard);
    }

    #[test]
    fn payment_method_rejects_unknown_values() {
        assert!(serde_json::from_str::<PaymentMethod>("\"Cheque\"").is_err());
        assert!("Cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn record_request_accepts_spanish_field_names() {
        let request: RecordPaymentRequest = serde_json::from_str(
            r#"{"turno_id": "7f2a1f9e-8a1e-4f9a-9d44-1df6f3f1a001", "monto": 1500.50, "tipo": "Transferencia"}"#,
        )
        .unwrap();
        assert_eq!(request.method, PaymentMethod::Transfer);
        assert_eq!(request.amount.to_string(), "1500.50");
    }
}
