// Credential store and refresh token ledger

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::auth::{
    error::AuthError,
    models::{RefreshTokenRecord, User, UserId},
};

/// Hash a raw refresh token using SHA-256. The ledger is keyed by this digest.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Persists user identities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user. A taken email fails with `EmailAlreadyExists`.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AuthError>;

    /// Find a user by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError>;
}

/// Tracks outstanding refresh tokens by digest
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn store(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    /// The unexpired record for this user and digest, if any
    async fn find_active(
        &self,
        user_id: UserId,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Atomically delete the unexpired record for this user and digest.
    /// Returns true only for the single caller that removed it.
    async fn consume(&self, user_id: UserId, token_hash: &str) -> Result<bool, AuthError>;

    /// Delete expired records, returning how many were removed
    async fn delete_expired(&self) -> Result<u64, AuthError>;
}

/// Postgres-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(UserId::new())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::from(e)
        })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Postgres-backed refresh token ledger
#[derive(Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn store(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active(
        &self,
        user_id: UserId,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT user_id, token_hash, expires_at, created_at \
             FROM refresh_tokens \
             WHERE user_id = $1 AND token_hash = $2 AND expires_at > NOW()",
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn consume(&self, user_id: UserId, token_hash: &str) -> Result<bool, AuthError> {
        // One statement: concurrent callers serialize on the row lock and
        // only the first sees a deleted row.
        let result = sqlx::query(
            "DELETE FROM refresh_tokens \
             WHERE user_id = $1 AND token_hash = $2 AND expires_at > NOW()",
        )
        .bind(user_id)
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
