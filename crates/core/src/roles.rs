//! Well-known role name constants.
//!
//! Must match the column default in `20250101000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
