//! Password reset ledger model.

use archive_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `password_resets` table.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: DbId,
    pub email: String,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub used: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PasswordReset {
    /// A token can be redeemed while unused and unexpired.
    pub fn is_redeemable(&self, now: Timestamp) -> bool {
        !self.used && now < self.expires_at
    }
}

/// DTO for recording an issued reset token.
#[derive(Debug)]
pub struct CreatePasswordReset {
    pub email: String,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
