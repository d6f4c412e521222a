//! PostgreSQL Store

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::credential::Credential;
use crate::domain::repository::{StoreError, StoreResult, UserStore};
use crate::domain::value_object::user_name::UserName;

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `credentials` table if it does not exist yet
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS credentials (
                username TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        tracing::info!("Credential schema ready");

        Ok(())
    }
}

impl UserStore for PgUserStore {
    async fn exists(&self, username: &UserName) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM credentials WHERE username = $1)",
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)
    }

    async fn insert(&self, credential: &Credential) -> StoreResult<()> {
        // The primary key arbitrates concurrent registrations
        let inserted = sqlx::query(
            r#"
            INSERT INTO credentials (
                username,
                password_hash,
                created_at
            ) VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(credential.username.as_str())
        .bind(credential.password_hash.as_phc_string())
        .bind(credential.created_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?
        .rows_affected();

        if inserted == 0 {
            return Err(StoreError::AlreadyExists);
        }

        Ok(())
    }

    async fn get(&self, username: &UserName) -> StoreResult<Credential> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                username,
                password_hash,
                created_at
            FROM credentials
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        row.ok_or(StoreError::NotFound)?.into_credential()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CredentialRow {
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> StoreResult<Credential> {
        let username = UserName::new(self.username).map_err(StoreError::backend)?;

        Ok(Credential::restore(
            username,
            HashedPassword::from_phc_string(self.password_hash),
            self.created_at,
        ))
    }
}
