//! User account repository.
//!
//! Passwords are stored as argon2id PHC strings. Hashing runs on the blocking
//! thread pool so request workers are not stalled.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use planner_core::{defaults, Error, Result, User};

/// Hash a password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a password against a stored PHC string.
///
/// An unparseable hash never verifies.
pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Reject passwords shorter than the configured minimum.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < defaults::PASSWORD_MIN_LEN {
        return Err(Error::InvalidInput(format!(
            "password must be at least {} characters",
            defaults::PASSWORD_MIN_LEN
        )));
    }
    Ok(())
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("Blocking task failed: {}", e)))
}

/// PostgreSQL repository for user accounts.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Register a new account.
    ///
    /// Fails with `InvalidInput` for a bad username or short password and
    /// `Conflict` if the username is taken (case-insensitively).
    #[instrument(skip(self, password), fields(subsystem = "db", component = "users", op = "create"))]
    pub async fn create(&self, username: &str, password: &str) -> Result<User> {
        User::validate_username(username).map_err(Error::InvalidInput)?;
        validate_password(password)?;

        let owned = password.to_string();
        let password_hash = blocking(move || hash_password(&owned)).await??;

        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO app_user (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::Conflict(format!("Username '{}' is already taken", username))
            }
            other => Error::Database(other),
        })?;

        info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    /// Look up an account by id.
    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, username, created_at FROM app_user WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    /// Return the account if `username` exists and `password` matches.
    #[instrument(skip(self, password), fields(subsystem = "db", component = "users", op = "verify_credentials"))]
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM app_user WHERE lower(username) = lower($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let Some(row) = row else {
            debug!("Unknown username");
            return Ok(None);
        };

        let phc: String = row.get("password_hash");
        let owned = password.to_string();
        if !blocking(move || verify_password(&owned, &phc)).await? {
            debug!("Password mismatch");
            return Ok(None);
        }

        Ok(Some(User {
            id: row.get("id"),
            username: row.get("username"),
            created_at: row.get("created_at"),
        }))
    }
}
