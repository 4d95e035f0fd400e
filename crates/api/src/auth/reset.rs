//! Password reset tokens.
//!
//! A reset token is 32 random bytes, hex-encoded, handed to the user once in
//! a link. Only its SHA-256 digest is persisted, so a database leak does not
//! expose redeemable tokens.

use rand::Rng;
use sha2::{Digest, Sha256};

/// How long an issued reset token stays redeemable.
pub const RESET_TOKEN_TTL_MINS: i64 = 60;

/// Number of random bytes in a reset token (256 bits).
const RESET_TOKEN_BYTES: usize = 32;

/// Generate a fresh reset token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext goes into the
/// reset link; only the hash is stored.
pub fn generate_reset_token() -> (String, String) {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    let plaintext = to_hex(&bytes);
    let hash = hash_reset_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a reset token, used for lookup.
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build the link the user follows to choose a new password.
pub fn build_reset_url(frontend_url: &str, token: &str) -> String {
    format!(
        "{}/reset-password?token={token}",
        frontend_url.trim_end_matches('/')
    )
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_64_hex_chars_and_hash_matches() {
        let (token, hash) = generate_reset_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_reset_token(&token));
        assert_eq!(hash.len(), 64);
        assert_ne!(token, hash);
    }

    #[test]
    fn tokens_are_unique() {
        let (a, _) = generate_reset_token();
        let (b, _) = generate_reset_token();
        assert_ne!(a, b);
    }

    #[test]
    fn reset_url_joins_cleanly() {
        assert_eq!(
            build_reset_url("http://localhost:3000/", "abc"),
            "http://localhost:3000/reset-password?token=abc"
        );
        assert_eq!(
            build_reset_url("https://archive.example.edu", "abc"),
            "https://archive.example.edu/reset-password?token=abc"
        );
    }
}
