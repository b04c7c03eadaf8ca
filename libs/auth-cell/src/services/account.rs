// libs/auth-cell/src/services/account.rs
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::postgres::Database;
use shared_database::AppState;

use crate::models::{
    AuthError, CreateUserRequest, CredentialRow, LoginRequest, LoginRole, UpdateUserRequest,
    UserAccount,
};

pub struct AccountService {
    db: Database,
}

impl AccountService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// Credential check. The requested role must match the account's flag;
    /// an unknown username and a wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, request: LoginRequest) -> Result<UserAccount, AuthError> {
        debug!("Login attempt for {}", request.username);

        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT id, username, password_hash, is_doctor, created_at \
             FROM users WHERE username = $1",
        )
        .bind(&request.username)
        .fetch_optional(self.db.pool())
        .await?;

        let row = row.ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &row.password_hash)? {
            warn!("Failed login for {}", request.username);
            return Err(AuthError::InvalidCredentials);
        }

        let role_matches = match request.role {
            LoginRole::Medico => row.is_doctor,
            LoginRole::Admin => !row.is_doctor,
        };
        if !role_matches {
            return Err(AuthError::RoleNotAllowed);
        }

        info!("User {} logged in", row.username);
        Ok(UserAccount {
            id: row.id,
            username: row.username,
            is_doctor: row.is_doctor,
            created_at: row.created_at,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<UserAccount>, AuthError> {
        let users: Vec<UserAccount> = sqlx::query_as(
            "SELECT id, username, is_doctor, created_at FROM users ORDER BY created_at DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(users)
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<Uuid, AuthError> {
        let user_id = Uuid::new_v4();
        let password_hash = hash_password(&request.password)?;

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, is_doctor) VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(&request.username)
        .bind(&password_hash)
        .bind(request.is_doctor)
        .execute(self.db.pool())
        .await?;

        info!("User {} created", request.username);
        Ok(user_id)
    }

    /// Update username/role; the password is rehashed only when a new one is
    /// supplied.
    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<(), AuthError> {
        let result = match &request.password {
            Some(password) if !password.is_empty() => {
                let password_hash = hash_password(password)?;
                sqlx::query(
                    "UPDATE users SET username = $1, is_doctor = $2, password_hash = $3 \
                     WHERE id = $4",
                )
                .bind(&request.username)
                .bind(request.is_doctor)
                .bind(&password_hash)
                .bind(user_id)
                .execute(self.db.pool())
                .await?
            }
            _ => {
                sqlx::query("UPDATE users SET username = $1, is_doctor = $2 WHERE id = $3")
                    .bind(&request.username)
                    .bind(request.is_doctor)
                    .bind(user_id)
                    .execute(self.db.pool())
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }

        info!("User {} updated", user_id);
        Ok(())
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }

        info!("User {} deleted", user_id);
        Ok(())
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::HashingError)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::HashingError)?;
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(AuthError::HashingError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("recepcion2025").unwrap();
        assert!(verify_password("recepcion2025", &hash).unwrap());
        assert!(!verify_password("otra-clave", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("recepcion2025").unwrap();
        let second = hash_password("recepcion2025").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }
}
