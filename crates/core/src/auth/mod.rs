//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with bcrypt
//! - Password verification
//! - User role definitions

mod error;
mod password;

pub use error::{AuthError, INVALID_CREDENTIALS};

pub use password::{
    BCRYPT_COST, MIN_PASSWORD_LEN, PasswordError, dummy_verify, hash_password,
    validate_new_password, verify_password,
};

use serde::{Deserialize, Serialize};

/// Back-office user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Site owner. Only one exists; may publish the homepage.
    Master,
    /// Staff member. May edit drafts and work leads.
    Staff,
}

impl UserRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "MASTER",
            Self::Staff => "STAFF",
        }
    }

    /// Parses a role from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "MASTER" => Some(Self::Master),
            "STAFF" => Some(Self::Staff),
            _ => None,
        }
    }

    /// Returns true if this role can publish homepage versions.
    #[must_use]
    pub const fn can_publish(&self) -> bool {
        matches!(self, Self::Master)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Resolves the role asked for at registration; absent means `STAFF`.
///
/// # Errors
///
/// Returns `AuthError::InvalidRole` for anything but MASTER or STAFF.
pub fn requested_role(role: Option<&str>) -> Result<UserRole, AuthError> {
    match role.map(str::trim) {
        None | Some("") => Ok(UserRole::Staff),
        Some(r) => UserRole::parse(r).ok_or_else(|| AuthError::InvalidRole(r.to_string())),
    }
}

/// Normalizes and checks registration input. Returns the normalized email.
///
/// # Errors
///
/// * `EmailRequired` if the email is blank
/// * `WeakPassword` if the password is too short
pub fn validate_registration(email: &str, password: &str) -> Result<String, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AuthError::EmailRequired);
    }
    validate_new_password(password)?;
    Ok(email)
}
