//! Bearer-token gate for the protected routes.
//!
//! Extracting [`Authenticated`] verifies the `Authorization` header against
//! the token service before the handler body runs. Verification is purely
//! cryptographic; no store lookup happens here, so a token can outlive its
//! user row until a handler resolves the id.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::{Ready, ready};

use crate::domain::DomainError;
use crate::domain::ports::AccessTokenClaims;
use crate::domain::user::UserId;
use crate::inbound::http::state::HttpState;

/// Verified token claims of the requesting user.
#[derive(Debug, Clone)]
pub struct Authenticated(AccessTokenClaims);

impl Authenticated {
    /// Identity the token was issued for.
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    /// Email embedded in the token at issue time.
    pub fn email(&self) -> &str {
        self.0.email.as_str()
    }
}

fn authenticate_request(req: &HttpRequest) -> Result<Authenticated, DomainError> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        return Err(DomainError::internal(
            "authentication state is not configured",
        ));
    };
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    state.auth.authenticate(authorization).map(Authenticated)
}

impl FromRequest for Authenticated {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_request(req))
    }
}
