// libs/doctor-cell/src/services/doctor.rs
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::postgres::Database;
use shared_database::AppState;

use crate::models::{Doctor, DoctorError, DoctorPayload};

pub struct DoctorService {
    db: Database,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let doctors: Vec<Doctor> = sqlx::query_as(
            "SELECT id, national_id, first_name, last_name, specialty, phone, \
                    birth_date, address, email, created_at, updated_at \
             FROM doctors ORDER BY last_name ASC, first_name ASC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(doctors)
    }

    pub async fn find_by_national_id(&self, national_id: &str) -> Result<Doctor, DoctorError> {
        debug!("Looking up doctor by DNI {}", national_id);

        let doctor: Option<Doctor> = sqlx::query_as(
            "SELECT id, national_id, first_name, last_name, specialty, phone, \
                    birth_date, address, email, created_at, updated_at \
             FROM doctors WHERE national_id = $1",
        )
        .bind(national_id)
        .fetch_optional(self.db.pool())
        .await?;

        doctor.ok_or(DoctorError::NotFound)
    }

    pub async fn create_doctor(&self, payload: DoctorPayload) -> Result<Uuid, DoctorError> {
        let doctor_id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO doctors \
             (id, national_id, first_name, last_name, specialty, phone, birth_date, address, email) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(doctor_id)
        .bind(&payload.national_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.specialty)
        .bind(&payload.phone)
        .bind(payload.birth_date)
        .bind(&payload.address)
        .bind(&payload.email)
        .execute(self.db.pool())
        .await?;

        info!(
            "Doctor {} created (DNI {}, specialty {})",
            doctor_id, payload.national_id, payload.specialty
        );
        Ok(doctor_id)
    }

    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        payload: DoctorPayload,
    ) -> Result<(), DoctorError> {
        let result = sqlx::query(
            "UPDATE doctors \
             SET national_id = $1, first_name = $2, last_name = $3, specialty = $4, \
                 phone = $5, birth_date = $6, address = $7, email = $8, updated_at = now() \
             WHERE id = $9",
        )
        .bind(&payload.national_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.specialty)
        .bind(&payload.phone)
        .bind(payload.birth_date)
        .bind(&payload.address)
        .bind(&payload.email)
        .bind(doctor_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DoctorError::NotFound);
        }

        info!("Doctor {} updated", doctor_id);
        Ok(())
    }

    pub async fn delete_doctor(&self, doctor_id: Uuid) -> Result<(), DoctorError> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DoctorError::NotFound);
        }

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }
}
