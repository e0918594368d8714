// # Routes Module
//
// - This module contains all HTTP route handlers for the prediction backend.
// - Routes are organized by functionality into separate submodules.
//
//  ## Available Route Modules
// - `health`: Health check and monitoring endpoints
// - `auth`: Registration, login, logout and the current session
// - `catalog`: Cryptocurrency and model listings
// - `predictions`: Price prediction requests
//
// Every module exposes a `create_*_routes` builder; `server.rs` decides which
// of them sit behind the auth middleware.

/// Handler error type rendered as `{"error": ...}`
pub mod error;

/// Health check and monitoring endpoints
pub mod health;

/// Account and session endpoints
pub mod auth;

/// Catalog listings
pub mod catalog;

/// Prediction endpoint
pub mod predictions;
