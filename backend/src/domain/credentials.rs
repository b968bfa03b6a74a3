//! Credential payloads for registration, login, and password reset.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Validation short-circuits: the first failing rule decides the message.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{EmailAddress, EmailAddressError, ProfileFields};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LEN: usize = 6;

/// The punctuation characters that satisfy the symbol rule at registration.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

fn meets_complexity_rules(password: &str) -> bool {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    has_upper && has_lower && has_digit && has_symbol
}

/// Domain error returned when a registration payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Email or password absent or empty.
    MissingCredentials,
    /// Email does not match the `local@domain.tld` shape.
    InvalidEmail,
    /// Password shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort,
    /// Password missing one of the four required character classes.
    PasswordTooWeak,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "Email and password are required"),
            Self::InvalidEmail => write!(f, "Invalid email format"),
            Self::PasswordTooShort => {
                write!(f, "Password must be at least {PASSWORD_MIN_LEN} characters")
            }
            Self::PasswordTooWeak => write!(
                f,
                "Password must contain uppercase, lowercase, number, and special character"
            ),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<EmailAddressError> for RegistrationValidationError {
    fn from(_: EmailAddressError) -> Self {
        Self::InvalidEmail
    }
}

/// A validated registration payload.
///
/// ## Invariants
/// - `email` matches the accepted address shape.
/// - `password` is at least [`PASSWORD_MIN_LEN`] characters and contains an
///   uppercase letter, a lowercase letter, a digit, and a symbol from
///   [`PASSWORD_SYMBOLS`].
///
/// # Examples
/// ```
/// use backend::domain::Registration;
///
/// let reg = Registration::try_from_parts(
///     Some("alice@example.com".into()),
///     Some("Abcdef1!".into()),
///     Default::default(),
/// )
/// .unwrap();
/// assert_eq!(reg.email().as_str(), "alice@example.com");
/// ```
#[derive(Debug, Clone)]
pub struct Registration {
    email: EmailAddress,
    password: Zeroizing<String>,
    profile: ProfileFields,
}

impl Registration {
    /// Validate raw inputs in the order the rules are documented.
    pub fn try_from_parts(
        email: Option<String>,
        password: Option<String>,
        profile: ProfileFields,
    ) -> Result<Self, RegistrationValidationError> {
        if is_blank(email.as_deref()) || is_blank(password.as_deref()) {
            return Err(RegistrationValidationError::MissingCredentials);
        }
        let email = email.unwrap_or_default();
        let password = password.unwrap_or_default();

        let email = EmailAddress::new(email)?;
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(RegistrationValidationError::PasswordTooShort);
        }
        if !meets_complexity_rules(&password) {
            return Err(RegistrationValidationError::PasswordTooWeak);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password),
            profile,
        })
    }

    /// Validated address for duplicate checks and row creation.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Optional profile attributes supplied alongside the credentials.
    pub fn profile(&self) -> &ProfileFields {
        &self.profile
    }

    /// Take ownership of the profile attributes.
    pub fn into_profile(self) -> ProfileFields {
        self.profile
    }
}

/// Domain error returned when a login payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email or password absent or empty.
    MissingCredentials,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "Email and password are required"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// The email is kept as the raw string: lookups match exactly what the user
/// typed, and an address that never registered simply finds no row.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Require both fields to be present and non-empty.
    pub fn try_from_parts(
        email: Option<String>,
        password: Option<String>,
    ) -> Result<Self, LoginValidationError> {
        if is_blank(email.as_deref()) || is_blank(password.as_deref()) {
            return Err(LoginValidationError::MissingCredentials);
        }
        Ok(Self {
            email: email.unwrap_or_default(),
            password: Zeroizing::new(password.unwrap_or_default()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when a password-reset payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordResetValidationError {
    /// Token or replacement password absent or empty.
    MissingFields,
    /// Replacement password shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort,
}

impl fmt::Display for PasswordResetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Token and new password are required"),
            Self::PasswordTooShort => {
                write!(f, "Password must be at least {PASSWORD_MIN_LEN} characters")
            }
        }
    }
}

impl std::error::Error for PasswordResetValidationError {}

/// A validated password-reset payload.
///
/// Only the minimum-length rule applies here; the registration complexity
/// rules are intentionally not repeated on this path.
#[derive(Debug, Clone)]
pub struct PasswordReset {
    token: String,
    new_password: Zeroizing<String>,
}

impl PasswordReset {
    /// Require both fields, then check the length rule.
    pub fn try_from_parts(
        token: Option<String>,
        new_password: Option<String>,
    ) -> Result<Self, PasswordResetValidationError> {
        if is_blank(token.as_deref()) || is_blank(new_password.as_deref()) {
            return Err(PasswordResetValidationError::MissingFields);
        }
        let new_password = new_password.unwrap_or_default();
        if new_password.chars().count() < PASSWORD_MIN_LEN {
            return Err(PasswordResetValidationError::PasswordTooShort);
        }
        Ok(Self {
            token: token.unwrap_or_default(),
            new_password: Zeroizing::new(new_password),
        })
    }

    /// The opaque reset token presented by the caller.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Replacement password awaiting hashing.
    pub fn new_password(&self) -> &str {
        self.new_password.as_str()
    }
}
