use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token is bound to
    pub sub: i64,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, username: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            username,
            exp,
            iat: now.timestamp(),
        }
    }
}

pub fn generate_token(claims: &Claims) -> Result<String, ApiError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(ApiError::internal_server_error("JWT secret not configured"));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| ApiError::internal_server_error(format!("Token generation failed: {}", e)))
}

/// Decode and verify a bearer token, distinguishing expiry (401) from
/// malformed tokens (422).
pub fn validate_token(token: &str) -> Result<Claims, ApiError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(ApiError::internal_server_error("JWT secret not configured"));
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(ApiError::TokenExpired),
            _ => Err(ApiError::TokenMalformed),
        },
    }
}

/// Hash a password for storage. Passwords are never persisted in plaintext.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal_server_error(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let claims = Claims::new(42, "alice".to_string());
        let token = generate_token(&claims).expect("token");
        let decoded = validate_token(&token).expect("claims");
        assert_eq!(decoded.sub, 42);
        assert_eq!(decoded.username, "alice");
    }

    #[test]
    fn test_expired_token_is_distinguished_from_garbage() {
        let mut claims = Claims::new(7, "bob".to_string());
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        claims.iat = (Utc::now() - Duration::hours(3)).timestamp();
        let token = generate_token(&claims).expect("token");

        match validate_token(&token) {
            Err(ApiError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {:?}", other),
        }

        match validate_token("not-a-jwt") {
            Err(ApiError::TokenMalformed) => {}
            other => panic!("expected TokenMalformed, got {:?}", other),
        }
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("hunter2!").expect("hash");
        assert_ne!(hash, "hunter2!");
        assert!(verify_password("hunter2!", &hash));
        assert!(!verify_password("hunter3!", &hash));
        assert!(!verify_password("hunter2!", "garbage-hash"));
    }
}
