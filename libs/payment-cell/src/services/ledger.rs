// libs/payment-cell/src/services/ledger.rs
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::postgres::Database;
use shared_database::AppState;

use crate::models::{
    Payment, PaymentDetails, PaymentError, PaymentMethod, RecordPaymentRequest,
    UpdatePaymentRequest,
};

pub struct PaymentLedgerService {
    db: Database,
}

impl PaymentLedgerService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// List every payment, enriched with appointment date/time and the doctor
    /// and patient names, newest first.
    pub async fn list_payments(&self) -> Result<Vec<PaymentDetails>, PaymentError> {
        debug!("Listing payments");

        let payments: Vec<PaymentDetails> = sqlx::query_as(
            r#"
            SELECT pay.id,
                   pay.amount,
                   pay.method,
                   pay.appointment_id,
                   a.scheduled_date AS appointment_date,
                   a.scheduled_time AS appointment_time,
                   d.first_name     AS doctor_first_name,
                   d.last_name      AS doctor_last_name,
                   d.specialty      AS doctor_specialty,
                   p.first_name     AS patient_first_name,
                   p.last_name      AS patient_last_name
            FROM payments pay
            LEFT JOIN appointments a ON pay.appointment_id = a.id
            LEFT JOIN doctors d ON a.doctor_id = d.id
            LEFT JOIN patients p ON a.patient_id = p.id
            ORDER BY pay.created_at DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(payments)
    }

    pub async fn get_payment(&self, payment_id: Uuid) -> Result<Payment, PaymentError> {
        let payment: Option<Payment> = sqlx::query_as(
            "SELECT id, amount, method, appointment_id, created_at, updated_at \
             FROM payments WHERE id = $1",
        )
        .bind(payment_id)
        .fetch_optional(self.db.pool())
        .await?;

        payment.ok_or(PaymentError::NotFound)
    }

    /// Standalone payment path: attach a payment to an existing appointment
    /// that has none yet. Insert and back-link happen in one unit of work.
    pub async fn record_payment(&self, request: RecordPaymentRequest) -> Result<Uuid, PaymentError> {
        validate_amount(request.amount)?;

        let mut tx = self.db.begin().await?;

        let appointment: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM appointments WHERE id = $1")
                .bind(request.appointment_id)
                .fetch_optional(&mut *tx)
                .await?;
        if appointment.is_none() {
            return Err(PaymentError::AppointmentNotFound);
        }

        // Early exit; the unique index on payments.appointment_id settles
        // any race at insert time.
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM payments WHERE appointment_id = $1")
                .bind(request.appointment_id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            return Err(PaymentError::DuplicatePayment);
        }

        let payment_id =
            insert_linked_payment(&mut tx, request.appointment_id, request.amount, request.method)
                .await?;

        tx.commit().await?;

        info!(
            "Payment {} recorded for appointment {}",
            payment_id, request.appointment_id
        );
        Ok(payment_id)
    }

    /// Update amount/method in place. The appointment link never changes here.
    pub async fn update_payment(
        &self,
        payment_id: Uuid,
        request: UpdatePaymentRequest,
    ) -> Result<(), PaymentError> {
        validate_amount(request.amount)?;

        let result = sqlx::query(
            "UPDATE payments SET amount = $1, method = $2, updated_at = now() WHERE id = $3",
        )
        .bind(request.amount)
        .bind(request.method.as_str())
        .bind(payment_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(PaymentError::NotFound);
        }

        info!("Payment {} updated", payment_id);
        Ok(())
    }

    /// Delete a payment and clear the owning appointment's reference in the
    /// same unit of work, so no appointment ever points at a dead payment.
    pub async fn delete_payment(&self, payment_id: Uuid) -> Result<(), PaymentError> {
        let mut tx = self.db.begin().await?;

        let payment: Option<(Uuid,)> =
            sqlx::query_as("SELECT appointment_id FROM payments WHERE id = $1")
                .bind(payment_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (appointment_id,) = payment.ok_or(PaymentError::NotFound)?;

        sqlx::query("UPDATE appointments SET payment_id = NULL, updated_at = now() WHERE id = $1")
            .bind(appointment_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(payment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Payment {} deleted, appointment {} reference cleared",
            payment_id, appointment_id
        );
        Ok(())
    }
}

pub fn validate_amount(amount: Decimal) -> Result<(), PaymentError> {
    if amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidAmount);
    }
    Ok(())
}

// ==============================================================================
// IN-TRANSACTION HELPERS
//
// The booking transaction composes these into its own unit of work so an
// appointment and its payment commit or roll back together.
// ==============================================================================

/// Insert a payment for an appointment and set the appointment's back-link.
pub async fn insert_linked_payment(
    tx: &mut Transaction<'_, Postgres>,
    appointment_id: Uuid,
    amount: Decimal,
    method: PaymentMethod,
) -> Result<Uuid, sqlx::Error> {
    let payment_id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO payments (id, amount, method, appointment_id) VALUES ($1, $2, $3, $4)",
    )
    .bind(payment_id)
    .bind(amount)
    .bind(method.as_str())
    .bind(appointment_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query("UPDATE appointments SET payment_id = $1, updated_at = now() WHERE id = $2")
        .bind(payment_id)
        .bind(appointment_id)
        .execute(&mut **tx)
        .await?;

    Ok(payment_id)
}

/// Rewrite an existing payment's amount/method without touching its link.
pub async fn update_payment_in_place(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: Uuid,
    amount: Decimal,
    method: PaymentMethod,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE payments SET amount = $1, method = $2, updated_at = now() WHERE id = $3")
        .bind(amount)
        .bind(method.as_str())
        .bind(payment_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Remove the payment rows of an appointment that is about to be deleted.
/// Clears the forward reference first so the payments FK never trips.
pub async fn delete_payments_for_appointment(
    tx: &mut Transaction<'_, Postgres>,
    appointment_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE appointments SET payment_id = NULL WHERE id = $1")
        .bind(appointment_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM payments WHERE appointment_id = $1")
        .bind(appointment_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal::Decimal;

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert_matches!(
            validate_amount(Decimal::ZERO),
            Err(PaymentError::InvalidAmount)
        );
        assert_matches!(
            validate_amount(Decimal::new(-100, 2)),
            Err(PaymentError::InvalidAmount)
        );
        assert!(validate_amount(Decimal::new(100, 2)).is_ok());
    }
}
