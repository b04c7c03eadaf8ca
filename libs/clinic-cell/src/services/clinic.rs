// libs/clinic-cell/src/services/clinic.rs
use tracing::info;
use uuid::Uuid;

use shared_database::postgres::Database;
use shared_database::AppState;

use crate::models::{Clinic, ClinicError, ClinicPayload};

pub struct ClinicService {
    db: Database,
}

impl ClinicService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    pub async fn list_clinics(&self) -> Result<Vec<Clinic>, ClinicError> {
        let clinics: Vec<Clinic> = sqlx::query_as(
            "SELECT id, name, room_number, active, created_at, updated_at \
             FROM clinics ORDER BY room_number ASC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(clinics)
    }

    pub async fn create_clinic(&self, payload: ClinicPayload) -> Result<Uuid, ClinicError> {
        let clinic_id = Uuid::new_v4();

        sqlx::query("INSERT INTO clinics (id, name, room_number, active) VALUES ($1, $2, $3, $4)")
            .bind(clinic_id)
            .bind(&payload.name)
            .bind(payload.room_number)
            .bind(payload.active)
            .execute(self.db.pool())
            .await?;

        info!("Clinic room {} ({}) created", payload.room_number, clinic_id);
        Ok(clinic_id)
    }

    pub async fn update_clinic(
        &self,
        clinic_id: Uuid,
        payload: ClinicPayload,
    ) -> Result<(), ClinicError> {
        let result = sqlx::query(
            "UPDATE clinics SET name = $1, room_number = $2, active = $3, updated_at = now() \
             WHERE id = $4",
        )
        .bind(&payload.name)
        .bind(payload.room_number)
        .bind(payload.active)
        .bind(clinic_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(ClinicError::NotFound);
        }

        info!("Clinic {} updated", clinic_id);
        Ok(())
    }

    pub async fn delete_clinic(&self, clinic_id: Uuid) -> Result<(), ClinicError> {
        let result = sqlx::query("DELETE FROM clinics WHERE id = $1")
            .bind(clinic_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ClinicError::NotFound);
        }

        info!("Clinic {} deleted", clinic_id);
        Ok(())
    }
}
