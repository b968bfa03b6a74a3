//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps them to status
//! codes and the JSON error envelope; domain services construct them from
//! port failures and validation outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::middleware::request_id::RequestId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails a field validation rule.
    ValidationError,
    /// The e-mail address is already registered.
    DuplicateEmail,
    /// Unknown e-mail or wrong password, deliberately undifferentiated.
    InvalidCredentials,
    /// No bearer token was supplied on a protected route.
    NoToken,
    /// The session token failed verification or has expired.
    InvalidToken,
    /// The password-reset token is unknown, already used, or expired.
    InvalidResetToken,
    /// The referenced user record does not exist.
    UserNotFound,
    /// A required field is absent or empty.
    MissingField,
    /// The review rating lies outside the accepted range.
    InvalidRating,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use backend::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::new(ErrorCode::UserNotFound, "User not found");
/// assert_eq!(err.code(), ErrorCode::UserNotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "DomainErrorDto", into = "DomainErrorDto")]
pub struct DomainError {
    #[schema(example = "missing_field")]
    code: ErrorCode,
    #[schema(example = "Vendor name is required")]
    message: String,
    /// Correlation identifier of the request this error belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainErrorValidationError {
    EmptyMessage,
}

impl std::fmt::Display for DomainErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for DomainErrorValidationError {}

impl DomainError {
    /// Create a new error, panicking if validation fails.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    ///
    /// Captures the current request identifier if one is in scope so the
    /// payload is correlated automatically.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, DomainErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DomainErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            request_id: RequestId::current().map(|id| id.to_string()),
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Correlation identifier captured at construction, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Override the correlation identifier.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::DomainError;
    /// use serde_json::json;
    ///
    /// let err = DomainError::missing_field("Search term is required")
    ///     .with_details(json!({ "field": "searchTerm" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::ValidationError`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateEmail`].
    pub fn duplicate_email(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateEmail, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidCredentials`].
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCredentials, message)
    }

    /// Convenience constructor for [`ErrorCode::NoToken`].
    pub fn no_token(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoToken, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidToken`].
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidToken, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidResetToken`].
    pub fn invalid_reset_token(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidResetToken, message)
    }

    /// Convenience constructor for [`ErrorCode::UserNotFound`].
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::MissingField`].
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingField, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidRating`].
    pub fn invalid_rating(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRating, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomainError {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct DomainErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<DomainError> for DomainErrorDto {
    fn from(value: DomainError) -> Self {
        Self {
            code: value.code,
            message: value.message,
            request_id: value.request_id,
            details: value.details,
        }
    }
}

impl TryFrom<DomainErrorDto> for DomainError {
    type Error = DomainErrorValidationError;

    fn try_from(value: DomainErrorDto) -> Result<Self, Self::Error> {
        let DomainErrorDto {
            code,
            message,
            request_id,
            details,
        } = value;

        let mut error = DomainError::try_new(code, message)?;
        error.request_id = request_id;
        error.details = details;
        Ok(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(ErrorCode::ValidationError, "validation_error")]
    #[case(ErrorCode::DuplicateEmail, "duplicate_email")]
    #[case(ErrorCode::InvalidCredentials, "invalid_credentials")]
    #[case(ErrorCode::NoToken, "no_token")]
    #[case(ErrorCode::InvalidToken, "invalid_token")]
    #[case(ErrorCode::InvalidResetToken, "invalid_reset_token")]
    #[case(ErrorCode::UserNotFound, "user_not_found")]
    #[case(ErrorCode::MissingField, "missing_field")]
    #[case(ErrorCode::InvalidRating, "invalid_rating")]
    #[case(ErrorCode::InternalError, "internal_error")]
    fn error_codes_serialize_to_snake_case(#[case] code: ErrorCode, #[case] expected: &str) {
        let serialized = serde_json::to_value(code).expect("serializes");
        assert_eq!(serialized, json!(expected));
    }

    #[test]
    fn rejects_blank_messages() {
        let result = DomainError::try_new(ErrorCode::InternalError, "   ");
        assert_eq!(result, Err(DomainErrorValidationError::EmptyMessage));
    }

    #[tokio::test]
    async fn captures_the_scoped_request_id() {
        let id: RequestId = "00000000-0000-0000-0000-000000000000"
            .parse()
            .expect("valid UUID");
        let error = RequestId::scope(id, async {
            DomainError::no_token("No token provided")
        })
        .await;
        assert_eq!(error.request_id(), Some(id.to_string().as_str()));

        let outside = DomainError::no_token("No token provided");
        assert_eq!(outside.request_id(), None);
    }

    #[test]
    fn round_trips_through_serde_with_details() {
        let error = DomainError::missing_field("Vendor name is required")
            .with_details(json!({ "field": "vendorName" }));
        let serialized = serde_json::to_value(&error).expect("serializes");
        assert_eq!(
            serialized,
            json!({
                "code": "missing_field",
                "message": "Vendor name is required",
                "details": { "field": "vendorName" },
            })
        );

        let deserialized: DomainError = serde_json::from_value(serialized).expect("deserializes");
        assert_eq!(deserialized, error);
    }
}
