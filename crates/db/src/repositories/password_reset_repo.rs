//! Repository for the `password_resets` table.

use sqlx::PgPool;

use crate::models::password_reset::{CreatePasswordReset, PasswordReset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, token_hash, expires_at, used, created_at, updated_at";

/// Issues and redeems password reset tokens.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Record a newly issued token, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePasswordReset,
    ) -> Result<PasswordReset, sqlx::Error> {
        let query = format!(
            "INSERT INTO password_resets (email, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(&input.email)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an unused, unexpired request by token hash.
    pub async fn find_redeemable(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM password_resets
             WHERE token_hash = $1
               AND used = false
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Find a request by token hash regardless of state.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM password_resets WHERE token_hash = $1");
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Consume a token and set the owning user's password in one transaction.
    ///
    /// The reset row is locked with `FOR UPDATE`, so of two concurrent
    /// redemptions exactly one sees `used = false`. Returns `false` (and
    /// changes nothing) when the token is unknown, used, expired, or its email
    /// no longer belongs to any user.
    pub async fn redeem(
        pool: &PgPool,
        token_hash: &str,
        new_password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM password_resets
             WHERE token_hash = $1
               AND used = false
               AND expires_at > NOW()
             FOR UPDATE"
        );
        let Some(request) = sqlx::query_as::<_, PasswordReset>(&query)
            .bind(token_hash)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(false);
        };

        let updated = sqlx::query("UPDATE users SET password_hash = $2 WHERE email = $1")
            .bind(&request.email)
            .bind(new_password_hash)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            tracing::warn!(reset_id = request.id, "Reset token has no matching account");
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE password_resets SET used = true WHERE id = $1")
            .bind(request.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
