//! Credential helpers: JWT issue/verify and password digests
//!
//! # Architecture
//!
//! This module contains only pure functions. No HTTP framework dependencies
//! (Axum, etc.) - request-level auth handling lives in the service crates.
//!
//! Tokens are HS256 JWTs carrying the farmer id as subject, valid for 24
//! hours from issue. Passwords are stored as lowercase hex SHA-256 digests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{Error, Result};

/// Token lifetime: 24 hours
const TOKEN_LIFETIME_HOURS: i64 = 24;

/// JWT claims carried by a Kisan bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Farmer id (owner identity)
    pub sub: Uuid,
    /// Expiry (Unix epoch seconds)
    pub exp: i64,
    /// Issued-at (Unix epoch seconds)
    pub iat: i64,
}

/// Issue a bearer token for the given farmer id
pub fn issue_token(farmer_id: Uuid, secret: &[u8]) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: farmer_id,
        exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
        iat: now.timestamp(),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| Error::Credential(format!("Failed to encode token: {}", e)))
}

/// Verify a bearer token and extract the farmer id
///
/// Rejects expired tokens (jsonwebtoken validates `exp` by default) and any
/// token not signed with the configured secret.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<Uuid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map_err(|e| Error::Credential(format!("Invalid token: {}", e)))?;

    Ok(data.claims.sub)
}

/// Digest a password to lowercase hex SHA-256
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a password against a stored digest
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-signing-secret";

    #[test]
    fn token_round_trip() {
        let farmer_id = Uuid::new_v4();
        let token = issue_token(farmer_id, SECRET).unwrap();
        let recovered = verify_token(&token, SECRET).unwrap();
        assert_eq!(recovered, farmer_id);
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let token = issue_token(Uuid::new_v4(), SECRET).unwrap();
        assert!(verify_token(&token, b"other-secret").is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(verify_token("not-a-jwt", SECRET).is_err());
    }

    #[test]
    fn password_digest_is_stable_hex() {
        let digest = hash_password("hunter2");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(verify_password("hunter2", &digest));
        assert!(!verify_password("hunter3", &digest));
    }
}
