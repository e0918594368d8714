//! User Repository
//!
//! Storage of user accounts behind a trait, with a PostgreSQL implementation
//! and an in-memory one used when no database is configured.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use deadpool_postgres::Pool;
use thiserror::Error;
use tokio_postgres::error::SqlState;

use crate::database::models::{FromRow, UserRecord, normalize_email};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("a user with this email already exists")]
    EmailTaken,
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<tokio_postgres::Error> for RepositoryError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
            RepositoryError::EmailTaken
        } else {
            RepositoryError::Storage(err.to_string())
        }
    }
}

impl From<deadpool_postgres::PoolError> for RepositoryError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;
    async fn insert(&self, user: &UserRecord) -> Result<(), RepositoryError>;
}

/// PostgreSQL-backed repository
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, name, email, password_hash, is_admin, created_at FROM users WHERE email = $1",
                &[&normalize_email(email)],
            )
            .await?;
        row.map(|r| UserRecord::from_row(&r))
            .transpose()
            .map_err(RepositoryError::from)
    }

    async fn insert(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO users (id, name, email, password_hash, is_admin, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &user.id,
                    &user.name,
                    &user.email,
                    &user.password_hash,
                    &user.is_admin,
                    &user.created_at,
                ],
            )
            .await?;
        Ok(())
    }
}

/// Process-local repository, keyed by normalized email. Not persistent.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, UserRecord>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self
            .users
            .get(&normalize_email(email))
            .map(|entry| entry.value().clone()))
    }

    async fn insert(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        match self.users.entry(normalize_email(&user.email)) {
            Entry::Occupied(_) => Err(RepositoryError::EmailTaken),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }
}
