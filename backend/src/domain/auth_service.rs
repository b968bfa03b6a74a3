//! Auth workflow: registration, login, token verification, password reset,
//! and profile access over the credential-store port.
//!
//! Every operation is one stateless transition. Lookup and validation
//! failures map to specific taxonomy codes; storage and hashing failures
//! become internal errors whose detail stays server-side.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::info;

use crate::domain::credentials::{LoginCredentials, PasswordReset, Registration};
use crate::domain::error::DomainError;
use crate::domain::ports::{
    AccessTokenClaims, PasswordHasher, PasswordHasherError, TokenIssueError, TokenService,
    UserRepository, UserRepositoryError,
};
use crate::domain::user::{NewUser, ProfileFields, PublicUser, UserId, UserRecord};

/// Bytes of entropy behind verification and reset tokens.
const OPAQUE_TOKEN_BYTES: usize = 32;

/// A hex-encoded random token for e-mail verification or password reset.
pub(crate) fn generate_opaque_token() -> String {
    let mut bytes = [0_u8; OPAQUE_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// A freshly issued token together with the identity it authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub token: String,
    pub user: PublicUser,
}

/// Orchestrates the authentication state machine over injected ports.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    reset_token_ttl: Duration,
}

impl AuthService {
    /// Assemble the workflow with the default one-hour reset-token window.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            reset_token_ttl: Duration::hours(1),
        }
    }

    /// Override the reset-token validity window.
    pub fn with_reset_token_ttl(mut self, ttl: Duration) -> Self {
        self.reset_token_ttl = ttl;
        self
    }

    fn map_user_repository_error(error: UserRepositoryError) -> DomainError {
        match error {
            UserRepositoryError::DuplicateEmail => {
                DomainError::duplicate_email("Email already registered")
            }
            UserRepositoryError::Connection { message } => {
                DomainError::internal(format!("credential store unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                DomainError::internal(format!("credential store error: {message}"))
            }
        }
    }

    fn map_hasher_error(error: PasswordHasherError) -> DomainError {
        match error {
            PasswordHasherError::Hash { message } => {
                DomainError::internal(format!("password hashing failed: {message}"))
            }
        }
    }

    fn map_token_issue_error(error: TokenIssueError) -> DomainError {
        match error {
            TokenIssueError::Signing { message } => {
                DomainError::internal(format!("token signing failed: {message}"))
            }
        }
    }

    fn invalid_credentials() -> DomainError {
        DomainError::invalid_credentials("Invalid credentials")
    }

    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| DomainError::internal(format!("hashing task failed: {err}")))?
            .map_err(Self::map_hasher_error)
    }

    async fn password_matches(
        &self,
        password: String,
        stored_hash: String,
    ) -> Result<bool, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|err| DomainError::internal(format!("hashing task failed: {err}")))?
            .map_err(Self::map_hasher_error)
    }

    fn issue_session(&self, record: &UserRecord) -> Result<AuthenticatedSession, DomainError> {
        let token = self
            .tokens
            .issue(record.id, record.email.as_str())
            .map_err(Self::map_token_issue_error)?;
        Ok(AuthenticatedSession {
            token,
            user: PublicUser::from(record),
        })
    }

    /// Create an account from an already validated registration payload.
    ///
    /// The existence lookup is only an early exit; the unique constraint in
    /// the store remains the authority, so a concurrent duplicate still
    /// surfaces as `duplicate_email` rather than an internal error.
    pub async fn register(
        &self,
        registration: Registration,
    ) -> Result<AuthenticatedSession, DomainError> {
        let existing = self
            .users
            .find_by_email(registration.email().as_str())
            .await
            .map_err(Self::map_user_repository_error)?;
        if existing.is_some() {
            return Err(DomainError::duplicate_email("Email already registered"));
        }

        let password_hash = self
            .hash_password(registration.password().to_owned())
            .await?;
        let new_user = NewUser {
            email: registration.email().clone(),
            password_hash,
            profile: registration.profile().clone(),
            verification_token: generate_opaque_token(),
        };
        let record = self
            .users
            .create_user(new_user)
            .await
            .map_err(Self::map_user_repository_error)?;
        info!(user_id = %record.id, "user registered");
        self.issue_session(&record)
    }

    /// Exchange credentials for a fresh session token.
    pub async fn login(
        &self,
        credentials: LoginCredentials,
    ) -> Result<AuthenticatedSession, DomainError> {
        let Some(record) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_user_repository_error)?
        else {
            return Err(Self::invalid_credentials());
        };

        let matches = self
            .password_matches(credentials.password().to_owned(), record.password_hash.clone())
            .await?;
        if !matches {
            return Err(Self::invalid_credentials());
        }
        self.issue_session(&record)
    }

    /// Resolve a bearer `Authorization` header into token claims.
    ///
    /// This is the gating step in front of every annotation operation; it
    /// does not touch the store.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<AccessTokenClaims, DomainError> {
        let Some(token) = extract_bearer_token(authorization) else {
            return Err(DomainError::no_token("No token provided"));
        };
        self.tokens
            .verify(token)
            .map_err(|_| DomainError::invalid_token("Invalid or expired token"))
    }

    /// Full verification: claims plus a live user row behind them.
    ///
    /// A structurally valid token whose user has vanished yields
    /// `user_not_found`, never a silent success.
    pub async fn verify(&self, authorization: Option<&str>) -> Result<PublicUser, DomainError> {
        let claims = self.authenticate(authorization)?;
        let record = self
            .users
            .find_by_id(claims.user_id)
            .await
            .map_err(Self::map_user_repository_error)?
            .ok_or_else(|| DomainError::user_not_found("User not found"))?;
        Ok(PublicUser::from(&record))
    }

    /// Start a password reset without revealing whether the address exists.
    ///
    /// Missing and unknown addresses both succeed silently; only storage
    /// trouble surfaces as an error. Token delivery is out of scope, so the
    /// token value itself is never logged.
    pub async fn forgot_password(&self, email: Option<&str>) -> Result<(), DomainError> {
        let Some(email) = email.filter(|value| !value.is_empty()) else {
            return Ok(());
        };

        let Some(record) = self
            .users
            .find_by_email(email)
            .await
            .map_err(Self::map_user_repository_error)?
        else {
            return Ok(());
        };

        let token = generate_opaque_token();
        let expires_at = Utc::now() + self.reset_token_ttl;
        self.users
            .set_reset_token(record.id, &token, expires_at)
            .await
            .map_err(Self::map_user_repository_error)?;
        info!(user_id = %record.id, "password reset token issued");
        Ok(())
    }

    /// Consume a reset token: store the new hash and clear the token fields.
    pub async fn reset_password(&self, reset: PasswordReset) -> Result<(), DomainError> {
        let record = self
            .users
            .find_by_valid_reset_token(reset.token(), Utc::now())
            .await
            .map_err(Self::map_user_repository_error)?
            .ok_or_else(|| DomainError::invalid_reset_token("Invalid or expired reset token"))?;

        let new_hash = self.hash_password(reset.new_password().to_owned()).await?;
        self.users
            .consume_reset_token(record.id, &new_hash)
            .await
            .map_err(Self::map_user_repository_error)?;
        info!(user_id = %record.id, "password reset completed");
        Ok(())
    }

    /// Fetch the full record backing the profile view.
    pub async fn get_profile(&self, user_id: UserId) -> Result<UserRecord, DomainError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_repository_error)?
            .ok_or_else(|| DomainError::user_not_found("User not found"))
    }

    /// Replace the optional profile fields wholesale.
    ///
    /// Mirrors the storage semantics: updating a vanished user affects zero
    /// rows and still reports success.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        fields: ProfileFields,
    ) -> Result<(), DomainError> {
        self.users
            .update_profile(user_id, fields)
            .await
            .map_err(Self::map_user_repository_error)
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme word is ignored, matching the permissive upstream behavior:
/// anything after the first space counts as the token.
fn extract_bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization?
        .split(' ')
        .nth(1)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
