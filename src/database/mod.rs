//! # Database Module
//!
//! PostgreSQL integration using tokio-postgres and deadpool: connection
//! management, models, migrations, and the user repository.

pub mod connection;
pub mod migrations;
pub mod models;
pub mod repository;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use models::UserRecord;
pub use repository::{InMemoryUserRepository, PgUserRepository, RepositoryError, UserRepository};
