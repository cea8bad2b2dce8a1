//! Shared types, errors, and configuration for Larder.
//!
//! This crate provides common types used across all other crates:
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - JWT claims and the token service
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
