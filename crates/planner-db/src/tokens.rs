//! Opaque bearer token repository.
//!
//! Tokens are `sp_at_` followed by a random alphanumeric secret. Only the
//! SHA-256 hash is persisted; the plaintext is returned once at issue time.

use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use planner_core::{defaults, AccessToken, AuthPrincipal, Error, Result};

/// PostgreSQL repository for access tokens.
#[derive(Clone)]
pub struct PgTokenRepository {
    pool: Pool<Postgres>,
}

impl PgTokenRepository {
    /// Create a new PgTokenRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn generate_secret(length: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }

    /// Hash a token using SHA256.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Generate a fresh plaintext token.
    pub fn generate_token() -> String {
        format!(
            "{}{}",
            defaults::ACCESS_TOKEN_PREFIX,
            Self::generate_secret(defaults::ACCESS_TOKEN_SECRET_LEN)
        )
    }

    /// Issue a token for `user_id` valid for `lifetime`.
    ///
    /// Returns the plaintext token alongside its stored metadata.
    #[instrument(skip(self), fields(subsystem = "db", component = "tokens", op = "issue"))]
    pub async fn issue(&self, user_id: Uuid, lifetime: Duration) -> Result<(String, AccessToken)> {
        if lifetime <= Duration::zero() {
            return Err(Error::InvalidInput(
                "token lifetime must be positive".to_string(),
            ));
        }

        let token = Self::generate_token();
        let now = Utc::now();
        let record = AccessToken {
            id: Uuid::now_v7(),
            user_id,
            expires_at: now + lifetime,
            revoked: false,
            created_at: now,
            last_used_at: None,
        };

        sqlx::query(
            r#"INSERT INTO access_token (id, user_id, token_hash, expires_at, revoked, created_at)
               VALUES ($1, $2, $3, $4, false, $5)"#,
        )
        .bind(record.id)
        .bind(user_id)
        .bind(Self::hash_token(&token))
        .bind(record.expires_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(token_id = %record.id, expires_at = %record.expires_at, "Issued access token");
        Ok((token, record))
    }

    /// Resolve a bearer token to its owner.
    ///
    /// Unknown, revoked and expired tokens all yield `None`.
    pub async fn validate(&self, token: &str) -> Result<Option<AuthPrincipal>> {
        if !token.starts_with(defaults::ACCESS_TOKEN_PREFIX) {
            return Ok(None);
        }

        let hash = Self::hash_token(token);
        let now = Utc::now();

        let row = sqlx::query(
            r#"SELECT t.user_id, u.username
            FROM access_token t
            JOIN app_user u ON u.id = t.user_id
            WHERE t.token_hash = $1
              AND t.revoked = false
              AND t.expires_at > $2"#,
        )
        .bind(&hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        // Update last_used_at
        if row.is_some() {
            sqlx::query("UPDATE access_token SET last_used_at = $1 WHERE token_hash = $2")
                .bind(now)
                .bind(&hash)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;
        } else {
            debug!(subsystem = "db", component = "tokens", "Rejected access token");
        }

        Ok(row.map(|r| AuthPrincipal::User {
            user_id: r.get("user_id"),
            username: r.get("username"),
        }))
    }

    /// Revoke a token. Returns false if it was unknown or already revoked.
    #[instrument(skip(self, token), fields(subsystem = "db", component = "tokens", op = "revoke"))]
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE access_token SET revoked = true, revoked_at = $1 WHERE token_hash = $2 AND revoked = false",
        )
        .bind(Utc::now())
        .bind(Self::hash_token(token))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke every live token belonging to `user_id`.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE access_token SET revoked = true, revoked_at = $1 WHERE user_id = $2 AND revoked = false",
        )
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }
}
