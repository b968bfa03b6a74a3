//! Stateless session tokens signed with HS256.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AccessTokenClaims, TokenIssueError, TokenService, TokenVerifyError};
use crate::domain::user::UserId;

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user id, rendered as a decimal string.
    sub: String,
    /// E-mail at issue time, so handlers can log an identity without a
    /// database round trip.
    email: String,
    /// Issued at (unix timestamp).
    iat: i64,
    /// Expiration (unix timestamp).
    exp: i64,
}

/// Issues and validates session tokens from a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl JwtTokenService {
    /// Seven days, matching the session lifetime clients expect.
    pub const DEFAULT_TTL_SECS: i64 = 7 * 24 * 60 * 60;

    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: UserId, email: &str) -> Result<String, TokenIssueError> {
        let now = now_secs();
        let claims = Claims {
            sub: user_id.as_i64().to_string(),
            email: email.to_owned(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| TokenIssueError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenVerifyError> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
                .map_err(|err| match err.kind() {
                    ErrorKind::ExpiredSignature => TokenVerifyError::expired(),
                    _ => TokenVerifyError::invalid(),
                })?;
        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenVerifyError::invalid())?;
        Ok(AccessTokenClaims {
            user_id: UserId::new(user_id),
            email: data.claims.email,
        })
    }
}

fn now_secs() -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    secs
}
