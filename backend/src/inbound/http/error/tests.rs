//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

const REQUEST_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(DomainError::validation("Invalid email format"), StatusCode::BAD_REQUEST)]
#[case(DomainError::duplicate_email("Email already registered"), StatusCode::BAD_REQUEST)]
#[case(DomainError::invalid_reset_token("Invalid or expired reset token"), StatusCode::BAD_REQUEST)]
#[case(DomainError::missing_field("Vendor name is required"), StatusCode::BAD_REQUEST)]
#[case(DomainError::invalid_rating("Rating must be between 1 and 5"), StatusCode::BAD_REQUEST)]
#[case(DomainError::invalid_credentials("Invalid credentials"), StatusCode::UNAUTHORIZED)]
#[case(DomainError::no_token("No token provided"), StatusCode::UNAUTHORIZED)]
#[case(DomainError::invalid_token("Invalid or expired token"), StatusCode::UNAUTHORIZED)]
#[case(DomainError::user_not_found("User not found"), StatusCode::NOT_FOUND)]
#[case(DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: DomainError, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn body_json(error: DomainError) -> (StatusCode, Value) {
    let response = ResponseError::error_response(&error);
    let status = response.status();
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let value = serde_json::from_slice(&bytes).expect("error payload is JSON");
    (status, value)
}

#[tokio::test]
async fn internal_errors_are_redacted_on_the_wire() {
    let error = DomainError::internal("connection pool exhausted")
        .with_request_id(REQUEST_ID)
        .with_details(json!({ "secret": "x" }));

    let (status, value) = body_json(error).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("Internal server error")
    );
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("internal_error")
    );
    assert_eq!(
        value.get("requestId").and_then(Value::as_str),
        Some(REQUEST_ID)
    );
    assert!(value.get("details").is_none());
}

#[tokio::test]
async fn client_errors_travel_unredacted() {
    let error = DomainError::missing_field("Vendor name is required")
        .with_details(json!({ "field": "vendorName" }));

    let (status, value) = body_json(error).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("Vendor name is required")
    );
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("missing_field")
    );
    assert_eq!(
        value
            .get("details")
            .and_then(|details| details.get("field"))
            .and_then(Value::as_str),
        Some("vendorName")
    );
}

#[tokio::test]
async fn envelope_omits_the_request_id_when_out_of_scope() {
    let (_, value) = body_json(DomainError::no_token("No token provided")).await;
    assert!(value.get("requestId").is_none());
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    use actix_web::error;

    let actix_err = error::ErrorBadRequest("boom");
    let err: DomainError = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
