//! Bearer-token issuance/verification and password hashing.
//!
//! Tokens carry the subject account id, email, and expiry, signed with a
//! symmetric secret (HMAC-SHA256) and carried as
//! `base64url(claims).base64url(signature)`. Verification failures are a
//! distinct unauthenticated condition, never conflated with data errors.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::errors::{CoreError, Result};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Signed token payload: subject account id, email, expiry (unix seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
}

/// Issues and verifies bearer tokens for one symmetric secret.
pub struct TokenAuthority {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: impl Into<Vec<u8>>, ttl_days: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issues a token for the subject, expiring after the configured TTL.
    pub fn issue(&self, subject: Uuid, email: &str) -> Result<String> {
        self.issue_at(subject, email, Utc::now())
    }

    pub fn issue_at(&self, subject: Uuid, email: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: subject,
            email: email.to_string(),
            exp: (now + self.ttl).timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(hmac_sha256(&self.secret, payload.as_bytes()));
        Ok(format!("{payload}.{signature}"))
    }

    /// Verifies signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| CoreError::Unauthenticated("malformed token".into()))?;
        let presented = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| CoreError::Unauthenticated("malformed token".into()))?;
        let expected = hmac_sha256(&self.secret, payload.as_bytes());
        if !constant_time_eq(&presented, &expected) {
            return Err(CoreError::Unauthenticated("invalid signature".into()));
        }

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| CoreError::Unauthenticated("malformed token".into()))?;
        let claims: Claims = serde_json::from_slice(&claims_bytes)
            .map_err(|_| CoreError::Unauthenticated("malformed claims".into()))?;
        if claims.exp < now.timestamp() {
            return Err(CoreError::Unauthenticated("token expired".into()));
        }
        Ok(claims)
    }
}

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CoreError::Internal(format!("password hashing failed: {err}")))
}

/// Verifies a password against a stored Argon2id hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| CoreError::MalformedRecord(format!("stored password hash: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    const BLOCK_LEN: usize = 64;
    let mut key_block = [0u8; BLOCK_LEN];
    if key.len() > BLOCK_LEN {
        key_block[..32].copy_from_slice(&Sha256::digest(key));
    } else {
        key_block[..key.len()].copy_from_slice(key);
    }

    let mut inner = Sha256::new();
    inner.update(key_block.map(|byte| byte ^ 0x36));
    inner.update(message);
    let inner_digest = inner.finalize();

    let mut outer = Sha256::new();
    outer.update(key_block.map(|byte| byte ^ 0x5c));
    outer.update(inner_digest);
    outer.finalize().into()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
