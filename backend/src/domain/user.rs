//! User identity types shared across the auth workflow and annotation store.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};

/// Storage-assigned numeric identifier of a user row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw storage identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw 64-bit value as stored.
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailAddressError {
    InvalidFormat,
}

impl std::fmt::Display for EmailAddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "Invalid email format"),
        }
    }
}

impl std::error::Error for EmailAddressError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One local part, one domain, at least one dot in the domain, no whitespace.
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// An e-mail address in the `local@domain.tld` shape.
///
/// Stored and compared exactly as supplied; no case folding happens anywhere,
/// so `A@b.com` and `a@b.com` are distinct identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and wrap an address.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmailAddressError> {
        let raw = raw.into();
        if email_regex().is_match(&raw) {
            Ok(Self(raw))
        } else {
            Err(EmailAddressError::InvalidFormat)
        }
    }

    /// The address as stored.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// The four optional profile attributes a user may carry.
///
/// Updates replace the whole set; an absent field clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub practice_name: Option<String>,
    pub phone: Option<String>,
}

/// Input for creating a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: EmailAddress,
    pub password_hash: String,
    pub profile: ProfileFields,
    pub verification_token: String,
}

/// A full user row as persisted.
///
/// Deliberately has no `Serialize` implementation: the password hash must
/// never travel to a client. Read paths expose [`PublicUser`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub profile: ProfileFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expires: Option<DateTime<Utc>>,
}

/// Hash-free projection of a user handed back after authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: UserId,
    pub email: EmailAddress,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub practice_name: Option<String>,
    pub phone: Option<String>,
}

impl From<&UserRecord> for PublicUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            first_name: record.profile.first_name.clone(),
            last_name: record.profile.last_name.clone(),
            practice_name: record.profile.practice_name.clone(),
            phone: record.profile.phone.clone(),
        }
    }
}

impl From<UserRecord> for PublicUser {
    fn from(record: UserRecord) -> Self {
        Self::from(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice@example.com")]
    #[case("a@b.co")]
    #[case("first.last+tag@sub.domain.org")]
    fn accepts_well_formed_addresses(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("address should validate");
        assert_eq!(email.as_str(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("plainaddress")]
    #[case("missing@tld")]
    #[case("two@@example.com")]
    #[case("spaces in@example.com")]
    #[case("trailing@example.com ")]
    fn rejects_malformed_addresses(#[case] raw: &str) {
        assert_eq!(
            EmailAddress::new(raw),
            Err(EmailAddressError::InvalidFormat)
        );
    }

    #[test]
    fn addresses_are_case_sensitive_values() {
        let upper = EmailAddress::new("Alice@Example.com").expect("validates");
        let lower = EmailAddress::new("alice@example.com").expect("validates");
        assert_ne!(upper, lower);
    }

    #[test]
    fn public_projection_drops_the_hash() {
        let record = UserRecord {
            id: UserId::new(7),
            email: EmailAddress::new("alice@example.com").expect("validates"),
            password_hash: "$argon2id$stub".into(),
            profile: ProfileFields {
                first_name: Some("Alice".into()),
                ..ProfileFields::default()
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
            email_verified: false,
            verification_token: None,
            reset_token: None,
            reset_token_expires: None,
        };

        let public = PublicUser::from(&record);
        assert_eq!(public.id, UserId::new(7));
        assert_eq!(public.first_name.as_deref(), Some("Alice"));
    }
}
