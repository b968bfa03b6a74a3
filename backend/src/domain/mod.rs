//! Domain types, ports, and workflow services.
//!
//! Purpose: Hold the personalization rules in plain Rust, away from HTTP
//! and SQL. Validated newtypes guard every boundary value, ports describe
//! what the outside world must provide, and services compose the two into
//! the operations the API exposes.
//!
//! Public surface:
//! - DomainError / ErrorCode — taxonomy shared by every operation.
//! - UserId, EmailAddress, ProfileFields, UserRecord, PublicUser — identity.
//! - Registration, LoginCredentials, PasswordReset — validated payloads.
//! - VendorName, SearchTerm, Rating, HistoryLimit — annotation values.
//! - AuthService, AnnotationService, SyncService — workflows over ports.

pub mod annotation_service;
pub mod annotations;
pub mod auth_service;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod sync_service;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::annotation_service::AnnotationService;
pub use self::annotations::{
    HistoryLimit, NoteRecord, Rating, RatingError, ReviewRecord, SearchHistoryEntry, SearchTerm,
    SearchTermError, SyncSnapshot, VendorName, VendorNameError,
};
pub use self::auth_service::{AuthService, AuthenticatedSession};
pub use self::credentials::{
    LoginCredentials, LoginValidationError, PasswordReset, PasswordResetValidationError,
    Registration, RegistrationValidationError,
};
pub use self::error::{DomainError, ErrorCode};
pub use self::sync_service::SyncService;
pub use self::user::{
    EmailAddress, EmailAddressError, NewUser, ProfileFields, PublicUser, UserId, UserRecord,
};

/// Result alias for operations that fail with a taxonomy error.
///
/// # Examples
/// ```
/// use backend::domain::{DomainError, DomainResult};
///
/// fn fetch_nothing() -> DomainResult<u32> {
///     Err(DomainError::user_not_found("User not found"))
/// }
///
/// assert!(fetch_nothing().is_err());
/// ```
pub type DomainResult<T> = Result<T, DomainError>;
