//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- Session token generation and validation.
//! - [`reset`] -- Single-use password reset tokens and links.

pub mod jwt;
pub mod password;
pub mod reset;
