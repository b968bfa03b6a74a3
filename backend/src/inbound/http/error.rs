//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep [`DomainError`] transport-agnostic while letting Actix
//! handlers turn taxonomy failures into the JSON error envelope and the
//! right status codes. Internal errors are redacted on the wire; the
//! detailed cause only reaches the server log.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{DomainError, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, DomainError>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError
        | ErrorCode::DuplicateEmail
        | ErrorCode::InvalidResetToken
        | ErrorCode::MissingField
        | ErrorCode::InvalidRating => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidCredentials | ErrorCode::NoToken | ErrorCode::InvalidToken => {
            StatusCode::UNAUTHORIZED
        }
        ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &DomainError) -> DomainError {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = DomainError::internal("Internal server error");
        if let Some(id) = error.request_id() {
            redacted = redacted.with_request_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(
                request_id = self.request_id(),
                detail = %self,
                "internal error returned to client"
            );
        }
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for DomainError {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        DomainError::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests;
