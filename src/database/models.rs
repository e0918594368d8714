// Database Models
//
// Tokio-postgres compatible models for persisted entities.

use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

use crate::auth::models::User;

/// Trait for converting from tokio-postgres Row
pub trait FromRow {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>
    where
        Self: Sized;
}

/// Stored user account, including the password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(name: &str, email: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password_hash,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    /// Public identity without credentials
    pub fn user(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
        }
    }
}

impl FromRow for UserRecord {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_admin: row.try_get("is_admin")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Emails are stored and looked up trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
