//! Password hashing with bcrypt.

use thiserror::Error;

/// bcrypt work factor for new hashes.
pub const BCRYPT_COST: u32 = 12;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password does not meet the minimum requirements.
    #[error("password must be at least 6 characters")]
    TooShort,
}

/// Hashes a password using bcrypt at [`BCRYPT_COST`].
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use larder_core::auth::hash_password;
///
/// let hash = hash_password("my_secure_password").unwrap();
/// assert!(hash.starts_with("$2b$12$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash).map_err(|_| PasswordError::InvalidHash)
}

/// Precomputed cost-12 hash of a throwaway password.
const DUMMY_HASH: &str = "$2b$12$0H7CaHfAPE5zzvm.ccxlKuQKtVkkQYuE.KhawgQJdW7OnXU/ZvxwO";

/// Runs a full-cost verification against a throwaway hash.
///
/// Used on login for unknown emails so that both failure paths take the same time.
pub fn dummy_verify(password: &str) {
    let _ = verify_password(password, DUMMY_HASH);
}

/// Checks a password chosen at registration.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` below [`MIN_PASSWORD_LEN`] characters.
pub fn validate_new_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}
