// libs/scheduling-cell/src/services/availability.rs
use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use shared_database::postgres::Database;
use shared_database::AppState;

use crate::models::SchedulingError;

/// Read-only index of taken slots. The client uses it to gray out hours;
/// the booking transaction re-checks the same tuple authoritatively before
/// writing, so a stale read here can never produce a double booking.
pub struct AvailabilityService {
    db: Database,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// Every time already booked for the doctor on the given date, ascending.
    /// `exclude_appointment_id` removes the appointment being rescheduled
    /// from its own conflict set.
    pub async fn occupied_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<NaiveTime>, SchedulingError> {
        debug!(
            "Fetching occupied slots for doctor {} on {} (excluding {:?})",
            doctor_id, date, exclude_appointment_id
        );

        let rows: Vec<(NaiveTime,)> = sqlx::query_as(
            "SELECT scheduled_time FROM appointments \
             WHERE doctor_id = $1 AND scheduled_date = $2 \
               AND ($3::uuid IS NULL OR id <> $3) \
             ORDER BY scheduled_time ASC",
        )
        .bind(doctor_id)
        .bind(date)
        .bind(exclude_appointment_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|(time,)| time).collect())
    }
}
