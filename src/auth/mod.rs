use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::error::AuthError;

pub mod password;
pub mod role;

pub use role::Role;

/// JWT claims embedded in every session token. Stateless: the token itself is
/// the session, invalidated only by expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: Uuid, username: String, role: Role) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub,
            username,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate a token's signature and expiry and return its claims. Every
/// failure mode collapses to `invalid_token`; expiry is not distinguished
/// from a bad signature.
pub fn validate_jwt(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        tracing::error!("JWT secret not configured");
        return Err(AuthError::InvalidToken);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|_| AuthError::InvalidToken)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_embeds_the_given_role() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, "admin".to_string(), Role::Admin);
        let token = generate_jwt(&claims).unwrap();

        let decoded = validate_jwt(&token).unwrap();
        assert_eq!(decoded.sub, id);
        assert_eq!(decoded.username, "admin");
        assert_eq!(decoded.role, Role::Admin);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn expired_token_is_rejected_as_invalid() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "student".to_string(),
            role: Role::Student,
            // Past the default 60s validation leeway
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = generate_jwt(&claims).unwrap();

        assert_eq!(validate_jwt(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "x".to_string(), Role::Student);
        let mut token = generate_jwt(&claims).unwrap();
        token.push('x');

        assert_eq!(validate_jwt(&token).unwrap_err(), AuthError::InvalidToken);
    }
}
