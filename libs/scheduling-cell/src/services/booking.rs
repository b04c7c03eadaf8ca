// libs/scheduling-cell/src/services/booking.rs
//
// The booking transaction: validate the payload, normalize the slot, then
// resolve, conflict-check and write inside a single unit of work. Any failure
// after the transaction opens rolls the whole request back; an appointment is
// never observable without its payment, nor a payment without its appointment.

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use payment_cell::services::ledger;
use shared_database::postgres::Database;
use shared_database::AppState;

use crate::models::{
    Appointment, AppointmentDetails, BookAppointmentRequest, SchedulingError, SlotRuleViolation,
};
use crate::services::slot_rules;

pub struct BookingService {
    db: Database,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// Book a new appointment together with its payment.
    pub async fn book(&self, request: BookAppointmentRequest) -> Result<Uuid, SchedulingError> {
        info!(
            "Booking appointment with doctor {} for patient DNI {}",
            request.doctor_id, request.patient_national_id
        );

        // Steps 1-2: payload and slot policy, before any transaction opens.
        let (date, time) = validate_booking_request(&request)?;

        let mut tx = self.db.begin().await?;

        // Steps 3-5: resolve the parties and claim the slot.
        let patient_id = resolve_patient(&mut tx, &request.patient_national_id).await?;
        let (doctor_id, specialty) = resolve_doctor(&mut tx, request.doctor_id).await?;
        ensure_slot_free(&mut tx, doctor_id, date, time, None).await?;

        // Steps 6-7: appointment, then its payment, in the same unit of work.
        let appointment_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO appointments \
             (id, scheduled_date, scheduled_time, doctor_id, patient_id, specialty) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(appointment_id)
        .bind(date)
        .bind(time)
        .bind(doctor_id)
        .bind(patient_id)
        .bind(&specialty)
        .execute(&mut *tx)
        .await?;

        ledger::insert_linked_payment(&mut tx, appointment_id, request.amount, request.payment_method)
            .await?;

        tx.commit().await?;

        info!(
            "Appointment {} booked for doctor {} on {} at {}",
            appointment_id, doctor_id, date, time
        );
        Ok(appointment_id)
    }

    /// Reschedule/update an existing appointment. The appointment excludes
    /// itself from the conflict check; its payment is updated in place, or
    /// created now if the appointment was still unpaid.
    pub async fn reschedule(
        &self,
        appointment_id: Uuid,
        request: BookAppointmentRequest,
    ) -> Result<(), SchedulingError> {
        debug!("Rescheduling appointment {}", appointment_id);

        let (date, time) = validate_booking_request(&request)?;

        let mut tx = self.db.begin().await?;

        let current: Option<(Uuid, Option<Uuid>)> =
            sqlx::query_as("SELECT id, payment_id FROM appointments WHERE id = $1")
                .bind(appointment_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (_, payment_id) = current.ok_or(SchedulingError::NotFound)?;

        let patient_id = resolve_patient(&mut tx, &request.patient_national_id).await?;
        let (doctor_id, specialty) = resolve_doctor(&mut tx, request.doctor_id).await?;
        ensure_slot_free(&mut tx, doctor_id, date, time, Some(appointment_id)).await?;

        sqlx::query(
            "UPDATE appointments \
             SET scheduled_date = $1, scheduled_time = $2, doctor_id = $3, \
                 patient_id = $4, specialty = $5, updated_at = now() \
             WHERE id = $6",
        )
        .bind(date)
        .bind(time)
        .bind(doctor_id)
        .bind(patient_id)
        .bind(&specialty)
        .bind(appointment_id)
        .execute(&mut *tx)
        .await?;

        match payment_id {
            Some(payment_id) => {
                ledger::update_payment_in_place(
                    &mut tx,
                    payment_id,
                    request.amount,
                    request.payment_method,
                )
                .await?;
            }
            None => {
                ledger::insert_linked_payment(
                    &mut tx,
                    appointment_id,
                    request.amount,
                    request.payment_method,
                )
                .await?;
            }
        }

        tx.commit().await?;

        info!("Appointment {} rescheduled to {} {}", appointment_id, date, time);
        Ok(())
    }

    /// Delete an appointment and its payment atomically; the slot becomes
    /// immediately bookable again.
    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), SchedulingError> {
        debug!("Deleting appointment {}", appointment_id);

        let mut tx = self.db.begin().await?;

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM appointments WHERE id = $1")
                .bind(appointment_id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_none() {
            return Err(SchedulingError::NotFound);
        }

        ledger::delete_payments_for_appointment(&mut tx, appointment_id).await?;
        sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(appointment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Appointment {} deleted with its payment", appointment_id);
        Ok(())
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, SchedulingError> {
        let appointment: Option<Appointment> = sqlx::query_as(
            "SELECT id, scheduled_date, scheduled_time, doctor_id, patient_id, \
                    specialty, payment_id, created_at, updated_at \
             FROM appointments WHERE id = $1",
        )
        .bind(appointment_id)
        .fetch_optional(self.db.pool())
        .await?;

        appointment.ok_or(SchedulingError::NotFound)
    }

    /// Appointments enriched with doctor, patient and payment data, newest
    /// first. The internal payment id is not exposed.
    pub async fn list_appointments(&self) -> Result<Vec<AppointmentDetails>, SchedulingError> {
        let appointments: Vec<AppointmentDetails> = sqlx::query_as(
            r#"
            SELECT a.id,
                   a.scheduled_date,
                   a.scheduled_time,
                   a.doctor_id,
                   a.patient_id,
                   a.specialty,
                   d.first_name   AS doctor_first_name,
                   d.last_name    AS doctor_last_name,
                   d.specialty    AS doctor_specialty,
                   p.first_name   AS patient_first_name,
                   p.last_name    AS patient_last_name,
                   p.national_id  AS patient_national_id,
                   pay.amount     AS payment_amount,
                   pay.method     AS payment_method
            FROM appointments a
            LEFT JOIN doctors d ON a.doctor_id = d.id
            LEFT JOIN patients p ON a.patient_id = p.id
            LEFT JOIN payments pay ON a.payment_id = pay.id
            ORDER BY a.scheduled_date DESC, a.scheduled_time DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(appointments)
    }
}

/// Steps 1-2: payload shape and slot policy. Runs before any transaction
/// opens so a rejected request has no side effects at all.
fn validate_booking_request(
    request: &BookAppointmentRequest,
) -> Result<(NaiveDate, NaiveTime), SchedulingError> {
    let date =
        slot_rules::normalize_date(&request.date).ok_or(SlotRuleViolation::Unparsable)?;
    let time =
        slot_rules::normalize_time(&request.time).ok_or(SlotRuleViolation::Unparsable)?;

    // All civil dates; "today" is the UTC calendar day.
    let today = Utc::now().date_naive();
    slot_rules::validate_slot(date, time, today)?;

    if request.amount <= Decimal::ZERO {
        return Err(SchedulingError::InvalidAmount);
    }

    Ok((date, time))
}

/// Step 3: the patient must exist; looked up by national id.
async fn resolve_patient(
    tx: &mut Transaction<'_, Postgres>,
    national_id: &str,
) -> Result<Uuid, SchedulingError> {
    let patient: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM patients WHERE national_id = $1")
            .bind(national_id)
            .fetch_optional(&mut **tx)
            .await?;

    patient
        .map(|(id,)| id)
        .ok_or(SchedulingError::PatientNotFound)
}

/// Step 4: the doctor must exist; the specialty read here becomes the
/// appointment's snapshot.
async fn resolve_doctor(
    tx: &mut Transaction<'_, Postgres>,
    doctor_id: Uuid,
) -> Result<(Uuid, String), SchedulingError> {
    let doctor: Option<(Uuid, String)> =
        sqlx::query_as("SELECT id, specialty FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .fetch_optional(&mut **tx)
            .await?;

    doctor.ok_or(SchedulingError::DoctorNotFound)
}

/// Step 5: in-transaction conflict check on the exact (doctor, date, time)
/// tuple. This is the early exit; the unique index on the same columns is
/// the final arbiter if two requests race past it.
async fn ensure_slot_free(
    tx: &mut Transaction<'_, Postgres>,
    doctor_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    exclude_appointment_id: Option<Uuid>,
) -> Result<(), SchedulingError> {
    let busy: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM appointments \
         WHERE doctor_id = $1 AND scheduled_date = $2 AND scheduled_time = $3 \
           AND ($4::uuid IS NULL OR id <> $4)",
    )
    .bind(doctor_id)
    .bind(date)
    .bind(time)
    .bind(exclude_appointment_id)
    .fetch_optional(&mut **tx)
    .await?;

    if busy.is_some() {
        warn!(
            "Slot conflict for doctor {} on {} at {}",
            doctor_id, date, time
        );
        return Err(SchedulingError::SlotTaken);
    }

    Ok(())
}
