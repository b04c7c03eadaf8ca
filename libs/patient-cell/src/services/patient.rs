// libs/patient-cell/src/services/patient.rs
use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::postgres::Database;
use shared_database::AppState;

use crate::models::{Patient, PatientError, PatientPayload};

pub struct PatientService {
    db: Database,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        let patients: Vec<Patient> = sqlx::query_as(
            "SELECT id, national_id, first_name, last_name, phone, birth_date, \
                    address, email, insurer, created_at, updated_at \
             FROM patients ORDER BY last_name ASC, first_name ASC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(patients)
    }

    pub async fn find_by_national_id(&self, national_id: &str) -> Result<Patient, PatientError> {
        debug!("Looking up patient by DNI {}", national_id);

        let patient: Option<Patient> = sqlx::query_as(
            "SELECT id, national_id, first_name, last_name, phone, birth_date, \
                    address, email, insurer, created_at, updated_at \
             FROM patients WHERE national_id = $1",
        )
        .bind(national_id)
        .fetch_optional(self.db.pool())
        .await?;

        patient.ok_or(PatientError::NotFound)
    }

    pub async fn create_patient(&self, payload: PatientPayload) -> Result<Uuid, PatientError> {
        let patient_id = Uuid::new_v4();
        let birth_date = parse_birth_date(payload.birth_date.as_deref());

        sqlx::query(
            "INSERT INTO patients \
             (id, national_id, first_name, last_name, phone, birth_date, address, email, insurer) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(patient_id)
        .bind(&payload.national_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.phone)
        .bind(birth_date)
        .bind(&payload.address)
        .bind(&payload.email)
        .bind(&payload.insurer)
        .execute(self.db.pool())
        .await?;

        info!("Patient {} created (DNI {})", patient_id, payload.national_id);
        Ok(patient_id)
    }

    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        payload: PatientPayload,
    ) -> Result<(), PatientError> {
        let birth_date = parse_birth_date(payload.birth_date.as_deref());

        let result = sqlx::query(
            "UPDATE patients \
             SET national_id = $1, first_name = $2, last_name = $3, phone = $4, \
                 birth_date = $5, address = $6, email = $7, insurer = $8, updated_at = now() \
             WHERE id = $9",
        )
        .bind(&payload.national_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.phone)
        .bind(birth_date)
        .bind(&payload.address)
        .bind(&payload.email)
        .bind(&payload.insurer)
        .bind(patient_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(PatientError::NotFound);
        }

        info!("Patient {} updated", patient_id);
        Ok(())
    }

    pub async fn delete_patient(&self, patient_id: Uuid) -> Result<(), PatientError> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(patient_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(PatientError::NotFound);
        }

        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}

/// Lenient birth-date parsing: the form sends either a plain date or a full
/// ISO timestamp; anything unparsable stores as NULL rather than failing the
/// whole request.
fn parse_birth_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some((date_part, _)) = raw.split_once('T') {
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamped_birth_dates() {
        let expected = NaiveDate::from_ymd_opt(1990, 5, 20).unwrap();
        assert_eq!(parse_birth_date(Some("1990-05-20")), Some(expected));
        assert_eq!(
            parse_birth_date(Some("1990-05-20T00:00:00.000Z")),
            Some(expected)
        );
    }

    #[test]
    fn unparsable_birth_dates_become_null() {
        assert_eq!(parse_birth_date(None), None);
        assert_eq!(parse_birth_date(Some("")), None);
        assert_eq!(parse_birth_date(Some("hace mucho")), None);
    }
}
