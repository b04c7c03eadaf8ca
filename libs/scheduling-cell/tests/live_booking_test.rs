// libs/scheduling-cell/tests/live_booking_test.rs
//
// Live integration tests for the booking transaction. They run against a
// real Postgres instance and are skipped unless LIVE_INTEGRATION_TESTS=true
// and DATABASE_URL point at a disposable database.

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use uuid::Uuid;

use payment_cell::models::{PaymentMethod, RecordPaymentRequest};
use payment_cell::services::ledger::PaymentLedgerService;
use scheduling_cell::models::{BookAppointmentRequest, SchedulingError};
use scheduling_cell::services::availability::AvailabilityService;
use scheduling_cell::services::booking::BookingService;
use shared_config::AppConfig;
use shared_database::postgres::Database;
use shared_database::AppState;

fn should_run_live_tests() -> bool {
    std::env::var("LIVE_INTEGRATION_TESTS").unwrap_or_default() == "true"
}

async fn test_state() -> AppState {
    let config = AppConfig::from_env();
    let db = Database::connect(&config)
        .await
        .expect("DATABASE_URL must point at a reachable test database");
    db.run_migrations().await.expect("migrations must apply");
    AppState::new(config, db)
}

fn next_monday() -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != Weekday::Mon {
        date += Duration::days(1);
    }
    date
}

/// Seed a doctor and a patient with unique national ids and return
/// (doctor_id, patient_national_id).
async fn seed_directory(state: &AppState) -> (Uuid, String) {
    let doctor_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();
    let doctor_dni = format!("D{}", &doctor_id.simple().to_string()[..8]);
    let patient_dni = format!("P{}", &patient_id.simple().to_string()[..8]);

    sqlx::query(
        "INSERT INTO doctors (id, national_id, first_name, last_name, specialty) \
         VALUES ($1, $2, 'Laura', 'Fernández', 'Clínica Médica')",
    )
    .bind(doctor_id)
    .bind(&doctor_dni)
    .execute(state.db.pool())
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO patients (id, national_id, first_name, last_name) \
         VALUES ($1, $2, 'Marcos', 'Iglesias')",
    )
    .bind(patient_id)
    .bind(&patient_dni)
    .execute(state.db.pool())
    .await
    .unwrap();

    (doctor_id, patient_dni)
}

fn booking_request(
    patient_dni: &str,
    doctor_id: Uuid,
    date: NaiveDate,
    time: &str,
) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_national_id: patient_dni.to_string(),
        doctor_id,
        date: date.format("%Y-%m-%d").to_string(),
        time: time.to_string(),
        amount: Decimal::new(1000, 0),
        payment_method: PaymentMethod::Cash,
    }
}

#[tokio::test]
async fn booking_lifecycle_creates_conflicts_and_frees_slots() {
    if !should_run_live_tests() {
        return;
    }

    let state = test_state().await;
    let booking = BookingService::new(&state);
    let availability = AvailabilityService::new(&state);
    let (doctor_id, patient_dni) = seed_directory(&state).await;
    let monday = next_monday();

    // Book next Monday 09:00, cash, 1000.
    let appointment_id = booking
        .book(booking_request(&patient_dni, doctor_id, monday, "09:00"))
        .await
        .expect("first booking must succeed");

    // The payment was created and linked both ways.
    let (payment_id, linked_appointment): (Uuid, Uuid) = sqlx::query_as(
        "SELECT p.id, p.appointment_id FROM payments p \
         JOIN appointments a ON a.payment_id = p.id WHERE a.id = $1",
    )
    .bind(appointment_id)
    .fetch_one(state.db.pool())
    .await
    .expect("appointment must have a linked payment");
    assert_eq!(linked_appointment, appointment_id);
    assert_ne!(payment_id, appointment_id);

    // The same slot again is a conflict, and no second row appears.
    let conflict = booking
        .book(booking_request(&patient_dni, doctor_id, monday, "09:00"))
        .await;
    assert!(matches!(conflict, Err(SchedulingError::SlotTaken)));

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM appointments \
         WHERE doctor_id = $1 AND scheduled_date = $2",
    )
    .bind(doctor_id)
    .bind(monday)
    .fetch_one(state.db.pool())
    .await
    .unwrap();
    assert_eq!(count, 1);

    // Occupied slots reflect the booking and are stable across reads.
    let first_read = availability
        .occupied_slots(doctor_id, monday, None)
        .await
        .unwrap();
    let second_read = availability
        .occupied_slots(doctor_id, monday, None)
        .await
        .unwrap();
    assert_eq!(first_read, second_read);
    assert_eq!(first_read.len(), 1);
    assert_eq!(first_read[0].format("%H:%M").to_string(), "09:00");

    // Excluding the appointment itself removes it from its own conflict set.
    let excluded = availability
        .occupied_slots(doctor_id, monday, Some(appointment_id))
        .await
        .unwrap();
    assert!(excluded.is_empty());

    // Deleting removes the appointment and its payment together...
    booking.delete_appointment(appointment_id).await.unwrap();

    let (orphans,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM payments WHERE appointment_id = $1")
            .bind(appointment_id)
            .fetch_one(state.db.pool())
            .await
            .unwrap();
    assert_eq!(orphans, 0);

    // ...and the slot becomes bookable again.
    booking
        .book(booking_request(&patient_dni, doctor_id, monday, "09:00"))
        .await
        .expect("slot must be free after deletion");
}

#[tokio::test]
async fn rejected_candidates_leave_no_rows() {
    if !should_run_live_tests() {
        return;
    }

    let state = test_state().await;
    let booking = BookingService::new(&state);
    let (doctor_id, patient_dni) = seed_directory(&state).await;

    // Today is never bookable, whatever today is.
    let today = Utc::now().date_naive();
    let result = booking
        .book(booking_request(&patient_dni, doctor_id, today, "10:00"))
        .await;
    assert!(matches!(result, Err(SchedulingError::InvalidSlot(_))));

    // 08:30 falls outside business hours.
    let result = booking
        .book(booking_request(&patient_dni, doctor_id, next_monday(), "08:30"))
        .await;
    assert!(matches!(result, Err(SchedulingError::InvalidSlot(_))));

    // Unknown patient fails after validation but before any write.
    let result = booking
        .book(booking_request("00000000", doctor_id, next_monday(), "11:00"))
        .await;
    assert!(matches!(result, Err(SchedulingError::PatientNotFound)));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM appointments WHERE doctor_id = $1")
        .bind(doctor_id)
        .fetch_one(state.db.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn racing_bookings_produce_exactly_one_winner() {
    if !should_run_live_tests() {
        return;
    }

    let state = test_state().await;
    let (doctor_id, patient_dni) = seed_directory(&state).await;
    let monday = next_monday();

    let first = BookingService::new(&state);
    let second = BookingService::new(&state);

    let (left, right) = tokio::join!(
        first.book(booking_request(&patient_dni, doctor_id, monday, "12:00")),
        second.book(booking_request(&patient_dni, doctor_id, monday, "12:00")),
    );

    let successes = [&left, &right].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of two racing bookings may win");

    let loser = if left.is_ok() { right } else { left };
    assert!(matches!(loser, Err(SchedulingError::SlotTaken)));

    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM appointments \
         WHERE doctor_id = $1 AND scheduled_date = $2 AND scheduled_time = '12:00'",
    )
    .bind(doctor_id)
    .bind(monday)
    .fetch_one(state.db.pool())
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn reschedule_excludes_itself_and_keeps_its_payment() {
    if !should_run_live_tests() {
        return;
    }

    let state = test_state().await;
    let booking = BookingService::new(&state);
    let (doctor_id, patient_dni) = seed_directory(&state).await;
    let monday = next_monday();

    let appointment_id = booking
        .book(booking_request(&patient_dni, doctor_id, monday, "14:00"))
        .await
        .unwrap();

    // Moving to the same slot it already holds is not a conflict.
    let mut same_slot = booking_request(&patient_dni, doctor_id, monday, "14:00");
    same_slot.amount = Decimal::new(1500, 0);
    same_slot.payment_method = PaymentMethod::Transfer;
    booking.reschedule(appointment_id, same_slot).await.unwrap();

    // The payment was updated in place, not replaced.
    let (payment_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM payments WHERE appointment_id = $1")
            .bind(appointment_id)
            .fetch_one(state.db.pool())
            .await
            .unwrap();
    assert_eq!(payment_count, 1);

    let (amount, method): (Decimal, String) =
        sqlx::query_as("SELECT amount, method FROM payments WHERE appointment_id = $1")
            .bind(appointment_id)
            .fetch_one(state.db.pool())
            .await
            .unwrap();
    assert_eq!(amount, Decimal::new(1500, 0));
    assert_eq!(method, "Transferencia");

    // Moving onto a slot held by another appointment is a conflict.
    booking
        .book(booking_request(&patient_dni, doctor_id, monday, "15:00"))
        .await
        .unwrap();
    let result = booking
        .reschedule(
            appointment_id,
            booking_request(&patient_dni, doctor_id, monday, "15:00"),
        )
        .await;
    assert!(matches!(result, Err(SchedulingError::SlotTaken)));
}

#[tokio::test]
async fn standalone_payment_path_enforces_single_payment() {
    if !should_run_live_tests() {
        return;
    }

    let state = test_state().await;
    let booking = BookingService::new(&state);
    let ledger = PaymentLedgerService::new(&state);
    let (doctor_id, patient_dni) = seed_directory(&state).await;

    let appointment_id = booking
        .book(booking_request(&patient_dni, doctor_id, next_monday(), "16:00"))
        .await
        .unwrap();

    // The booking already created a payment; a second one is a conflict.
    let duplicate = ledger
        .record_payment(RecordPaymentRequest {
            appointment_id,
            amount: Decimal::new(500, 0),
            method: PaymentMethod::DebitCard,
        })
        .await;
    assert!(duplicate.is_err());

    // Deleting the payment clears the appointment's reference...
    let (payment_id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM payments WHERE appointment_id = $1")
            .bind(appointment_id)
            .fetch_one(state.db.pool())
            .await
            .unwrap();
    ledger.delete_payment(payment_id).await.unwrap();

    let (linked,): (Option<Uuid>,) =
        sqlx::query_as("SELECT payment_id FROM appointments WHERE id = $1")
            .bind(appointment_id)
            .fetch_one(state.db.pool())
            .await
            .unwrap();
    assert_eq!(linked, None);

    // ...after which the standalone path succeeds and relinks both sides.
    let new_payment_id = ledger
        .record_payment(RecordPaymentRequest {
            appointment_id,
            amount: Decimal::new(500, 0),
            method: PaymentMethod::DebitCard,
        })
        .await
        .unwrap();

    let (relinked,): (Option<Uuid>,) =
        sqlx::query_as("SELECT payment_id FROM appointments WHERE id = $1")
            .bind(appointment_id)
            .fetch_one(state.db.pool())
            .await
            .unwrap();
    assert_eq!(relinked, Some(new_payment_id));
}
