//! Driven port for the credential store.
//!
//! The auth workflow talks to user rows exclusively through this trait.
//! Production backs it with the Diesel SQLite repository; service tests use
//! an in-memory stub.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::macros::define_port_error;
use crate::domain::user::{NewUser, ProfileFields, UserId, UserRecord};

define_port_error! {
    /// Errors surfaced by [`UserRepository`] implementations.
    pub enum UserRepositoryError {
        /// The email unique constraint rejected the insert. This is the
        /// authoritative duplicate check; any pre-insert lookup is only an
        /// early exit.
        DuplicateEmail => "email is already registered",
        /// A connection could not be checked out of the pool.
        Connection { message: String } => "connection failure: {message}",
        /// The underlying statement failed.
        Query { message: String } => "query failure: {message}",
    }
}

/// Persistence port for user identity records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user row and return it with its assigned id.
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, UserRepositoryError>;

    /// Exact-match lookup by the stored email string.
    async fn find_by_email(&self, email: &str)
    -> Result<Option<UserRecord>, UserRepositoryError>;

    /// Lookup by the storage-assigned id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, UserRepositoryError>;

    /// Store a password-reset token and its expiry instant.
    ///
    /// A missing user row makes this a no-op rather than an error; the
    /// forgot-password flow never reveals whether a row exists.
    async fn set_reset_token(
        &self,
        id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError>;

    /// Find the user holding exactly this token with `expiry > now`.
    async fn find_by_valid_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserRecord>, UserRepositoryError>;

    /// Replace the password hash and clear the reset token fields in one
    /// statement, making the token single-use.
    async fn consume_reset_token(
        &self,
        id: UserId,
        new_password_hash: &str,
    ) -> Result<(), UserRepositoryError>;

    /// Replace all four optional profile fields and bump the update
    /// timestamp. Absent fields overwrite stored values with NULL.
    async fn update_profile(
        &self,
        id: UserId,
        fields: ProfileFields,
    ) -> Result<(), UserRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_build_the_matching_variants() {
        assert_eq!(
            UserRepositoryError::duplicate_email(),
            UserRepositoryError::DuplicateEmail
        );
        assert_eq!(
            UserRepositoryError::connection("pool exhausted"),
            UserRepositoryError::Connection {
                message: "pool exhausted".into()
            }
        );
        assert_eq!(
            UserRepositoryError::query("syntax error").to_string(),
            "query failure: syntax error"
        );
    }
}
