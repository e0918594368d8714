//! JWT Token Service
//!
//! Handles JWT creation, validation, revocation, and claims management for user authentication.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::models::User;

const ISSUER: &str = "crypto-predictor";

/// JWT Claims structure containing user information and token metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User unique identifier
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// Display name
    pub name: String,
    /// Admin flag
    #[serde(default)]
    pub adm: bool,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issuer
    pub iss: String,
    /// Token id, used for revocation
    pub jti: Uuid,
}

impl Claims {
    pub fn user(&self) -> User {
        User {
            id: self.sub,
            name: self.name.clone(),
            email: self.email.clone(),
            is_admin: self.adm,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// JWT Service for token operations
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    /// Revoked token ids mapped to their expiry timestamp
    revoked: Arc<DashMap<Uuid, i64>>,
}

impl JwtService {
    /// Create a new JWT service with the provided secret and token lifetime
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            validation,
            ttl,
            revoked: Arc::new(DashMap::new()),
        }
    }

    /// Generate a JWT token for a user, returning the token and its expiry
    pub fn create_token(&self, user: &User) -> Result<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expiration = now + self.ttl;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            adm: user.is_admin,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: ISSUER.to_string(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode JWT token")?;
        Ok((token, claims.expires_at()))
    }

    /// Validate and decode a JWT token, rejecting revoked tokens
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .context("Failed to validate JWT token")?;
        if self.revoked.contains_key(&data.claims.jti) {
            bail!("Token has been revoked");
        }
        Ok(data)
    }

    /// Decode and validate, returning only the claims
    pub fn decode_claims(&self, token: &str) -> Result<Claims> {
        let token_data = self.validate_token(token)?;
        Ok(token_data.claims)
    }

    /// Revoke a token until its natural expiry
    pub fn revoke(&self, claims: &Claims) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp > now);
        self.revoked.insert(claims.jti, claims.exp);
        tracing::debug!("Revoked token {} for {}", claims.jti, claims.sub);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: "test@example.com".into(),
            is_admin: false,
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let jwt_service = JwtService::new("test_secret", Duration::hours(24));
        let user = user();

        let (token, expires_at) = jwt_service.create_token(&user).unwrap();
        let claims = jwt_service.decode_claims(&token).unwrap();

        assert_eq!(claims.user(), user);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.expires_at(), expires_at);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt_service = JwtService::new("test_secret", Duration::seconds(-5));
        let (token, _) = jwt_service.create_token(&user()).unwrap();
        assert!(jwt_service.validate_token(&token).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let issuer = JwtService::new("secret_a", Duration::hours(1));
        let verifier = JwtService::new("secret_b", Duration::hours(1));
        let (token, _) = issuer.create_token(&user()).unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn revoked_token_is_rejected_but_others_survive() {
        let jwt_service = JwtService::new("test_secret", Duration::hours(1));
        let (first, _) = jwt_service.create_token(&user()).unwrap();
        let (second, _) = jwt_service.create_token(&user()).unwrap();

        let claims = jwt_service.decode_claims(&first).unwrap();
        jwt_service.revoke(&claims);

        assert!(jwt_service.validate_token(&first).is_err());
        assert!(jwt_service.validate_token(&second).is_ok());
        assert_eq!(jwt_service.revoked.len(), 1);
    }
}
