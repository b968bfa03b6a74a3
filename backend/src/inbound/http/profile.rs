//! Profile HTTP handlers.
//!
//! ```text
//! GET /api/user/profile
//! PUT /api/user/profile
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DomainError, ProfileFields, UserRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::session::Authenticated;
use crate::inbound::http::state::HttpState;

/// Request payload replacing the optional profile fields.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub practice_name: Option<String>,
    pub phone: Option<String>,
}

/// Response payload for the profile view.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub practice_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}

impl From<UserRecord> for ProfileResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id.as_i64(),
            email: record.email.into(),
            first_name: record.profile.first_name,
            last_name: record.profile.last_name,
            practice_name: record.profile.practice_name,
            phone: record.profile.phone,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Fetch the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "User vanished", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<ProfileResponse>> {
    let record = state.auth.get_profile(auth.user_id()).await?;
    Ok(web::Json(ProfileResponse::from(record)))
}

/// Replace the optional profile fields wholesale.
#[utoipa::path(
    put,
    path = "/api/user/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let fields = ProfileFields {
        first_name: payload.first_name,
        last_name: payload.last_name,
        practice_name: payload.practice_name,
        phone: payload.phone,
    };
    state.auth.update_profile(auth.user_id(), fields).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Profile updated successfully")))
}
