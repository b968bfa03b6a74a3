//! Port for one-way password hashing.

use crate::domain::ports::macros::define_port_error;

define_port_error! {
    /// Errors raised by [`PasswordHasher`] implementations.
    pub enum PasswordHasherError {
        /// Hashing or hash parsing failed; never a mere mismatch.
        Hash { message: String } => "password hashing failure: {message}",
    }
}

/// Salted one-way hashing with a fixed work factor.
///
/// Implementations are CPU-bound and synchronous; callers on async paths
/// run them on the blocking pool.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Compare a plaintext candidate against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; `Err` means the stored hash could not be
    /// parsed or the comparison itself failed.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHasherError>;
}
