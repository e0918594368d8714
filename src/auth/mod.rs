//! # Authentication Module
//!
//! JWT issuance and validation, password hashing, the bearer-token middleware
//! securing API endpoints, and the identity types shared with the client.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use models::{Credentials, Registration, SessionInfo, TokenResponse, User};
