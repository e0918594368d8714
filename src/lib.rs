//! Cryptocurrency price prediction: the backend API, the client core that
//! consumes it, and the command line that drives both.

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod server;
pub mod services;
