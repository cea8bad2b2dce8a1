//! Homepage content versioning.
//!
//! Each homepage version is created as a draft, may be edited while it is a
//! draft, and becomes immutable once published. A singleton site-state pointer
//! names the published version the public site renders.
//!
//! # Modules
//!
//! - `types` - Version status and publish action
//! - `error` - Homepage-specific error types
//! - `service` - Lifecycle rules

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::HomepageError;
pub use service::HomepageService;
pub use types::{PublishAction, VersionStatus};
