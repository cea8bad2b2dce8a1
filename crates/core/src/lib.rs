//! Core domain logic for Larder.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//! All domain types, validation rules, and in-process services live here.
//!
//! # Modules
//!
//! - `auth` - Roles and password hashing
//! - `homepage` - Homepage version lifecycle (draft -> published)
//! - `leads` - Lead statuses, filters, CSV rendering, and summaries
//! - `ratelimit` - Sliding-window request limiter
//! - `audit` - Audit action vocabulary

pub mod audit;
pub mod auth;
pub mod homepage;
pub mod leads;
pub mod ratelimit;
