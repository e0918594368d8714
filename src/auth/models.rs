//! Authentication Models
//!
//! Data structures shared by the auth routes and the client session manager:
//! the user identity, the request payloads, and the token responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::auth::password;
use crate::error::ValidationError;

/// Authenticated user identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Login request payload
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Shape check: non-empty identifier and secret.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingIdentifier);
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingSecret);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration request payload
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    /// Shape check plus the password policy. The server runs the same check
    /// authoritatively; in the client it only gives early feedback.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingIdentifier);
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingSecret);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        password::check_strength(&self.password)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Token response after successful login or registration
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Identity resolved from an existing token (`/api/auth/me`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, confirm: &str) -> Registration {
        Registration {
            name: "Satoshi".into(),
            email: "satoshi@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn credentials_require_both_fields() {
        assert_eq!(
            Credentials::new("  ", "secret").validate(),
            Err(ValidationError::MissingIdentifier)
        );
        assert_eq!(
            Credentials::new("a@b.c", "").validate(),
            Err(ValidationError::MissingSecret)
        );
        assert!(Credentials::new("a@b.c", "secret").validate().is_ok());
    }

    #[test]
    fn registration_checks_confirmation_before_strength() {
        assert_eq!(
            registration("abc", "abd").validate(),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(matches!(
            registration("abc", "abc").validate(),
            Err(ValidationError::WeakPassword { .. })
        ));
        assert!(registration("hodl2024", "hodl2024").validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_passwords() {
        let rendered = format!("{:?}", Credentials::new("a@b.c", "hunter22"));
        assert!(!rendered.contains("hunter22"));
        let rendered = format!("{:?}", registration("hunter22", "hunter22"));
        assert!(!rendered.contains("hunter22"));
    }

    #[test]
    fn user_uses_camel_case_on_the_wire() {
        let user = User {
            id: Uuid::nil(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            is_admin: true,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["isAdmin"], true);
    }
}
