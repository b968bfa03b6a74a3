//! Port for issuing and verifying session tokens.
//!
//! Tokens are bearer credentials: whoever holds one acts as the embedded
//! identity until expiry. There is no revocation list; rotating the signing
//! secret is the only way to invalidate outstanding tokens early.

use crate::domain::ports::macros::define_port_error;
use crate::domain::user::UserId;

/// Identity claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenClaims {
    pub user_id: UserId,
    pub email: String,
}

define_port_error! {
    /// Errors raised while producing a token.
    pub enum TokenIssueError {
        /// Signing failed; configuration or entropy trouble.
        Signing { message: String } => "token signing failure: {message}",
    }
}

define_port_error! {
    /// Errors raised while checking a presented token.
    pub enum TokenVerifyError {
        /// Signature mismatch or malformed structure.
        Invalid => "token is invalid",
        /// Structurally sound but past its validity window.
        Expired => "token has expired",
    }
}

/// Signing-side port of the session token mechanism.
pub trait TokenService: Send + Sync {
    /// Produce a signed token embedding the identity, valid for the
    /// configured window from now.
    fn issue(&self, user_id: UserId, email: &str) -> Result<String, TokenIssueError>;

    /// Check signature and expiry, returning the embedded identity.
    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenVerifyError>;
}
