//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/auth/register
//! POST /api/auth/login
//! GET  /api/auth/verify
//! POST /api/auth/forgot-password
//! POST /api/auth/reset-password
//! ```
//!
//! Request fields are optional at the wire level; the domain constructors
//! decide which absences are errors, so a missing field and an empty one
//! produce the same message.

use actix_web::{HttpRequest, HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DomainError, LoginCredentials, PasswordReset, ProfileFields, Registration,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{MessageResponse, UserResponse};
use crate::inbound::http::state::HttpState;

/// Request payload for account creation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub practice_name: Option<String>,
    pub phone: Option<String>,
}

/// Request payload for credential login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request payload for starting a password reset.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// Request payload for completing a password reset.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub new_password: Option<String>,
}

/// Response payload carrying a fresh session token.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

/// Response payload for token verification.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: UserResponse,
}

fn validation_error(err: impl std::fmt::Display) -> DomainError {
    DomainError::validation(err.to_string())
}

/// Create an account and log the new user straight in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid payload or duplicate email", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let profile = ProfileFields {
        first_name: payload.first_name,
        last_name: payload.last_name,
        practice_name: payload.practice_name,
        phone: payload.phone,
    };
    let registration = Registration::try_from_parts(payload.email, payload.password, profile)
        .map_err(validation_error)?;

    let session = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(SessionResponse {
        message: "User registered successfully".to_owned(),
        token: session.token,
        user: session.user.into(),
    }))
}

/// Exchange email and password for a session token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = SessionResponse),
        (status = 400, description = "Missing credentials", body = DomainError),
        (status = 401, description = "Unknown email or wrong password", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let payload = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(payload.email, payload.password)
        .map_err(validation_error)?;

    let session = state.auth.login(credentials).await?;
    Ok(web::Json(SessionResponse {
        message: "Login successful".to_owned(),
        token: session.token,
        user: session.user.into(),
    }))
}

/// Check a bearer token and return the user it belongs to.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing, invalid, or expired token", body = DomainError),
        (status = 404, description = "Token user no longer exists", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["auth"],
    operation_id = "verifyToken"
)]
#[get("/verify")]
pub async fn verify(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<VerifyResponse>> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let user = state.auth.verify(authorization).await?;
    Ok(web::Json(VerifyResponse {
        valid: true,
        user: user.into(),
    }))
}

/// Issue a password-reset token without revealing whether the email exists.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Accepted regardless of account existence", body = MessageResponse),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword"
)]
#[post("/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    state.auth.forgot_password(payload.email.as_deref()).await?;
    Ok(web::Json(MessageResponse::new(
        "If the email exists, a reset link has been sent",
    )))
}

/// Trade a valid reset token for a new password.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Invalid payload or unusable reset token", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    tags = ["auth"],
    operation_id = "resetPassword"
)]
#[post("/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let payload = payload.into_inner();
    let reset = PasswordReset::try_from_parts(payload.token, payload.new_password)
        .map_err(validation_error)?;

    state.auth.reset_password(reset).await?;
    Ok(web::Json(MessageResponse::new("Password reset successful")))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
