//! Response payloads shared across handler modules.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::PublicUser;

/// Plain confirmation payload for write operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Favorite added successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Hash-free user projection as returned by the auth and sync routes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub practice_name: Option<String>,
    pub phone: Option<String>,
}

impl From<PublicUser> for UserResponse {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id.as_i64(),
            email: user.email.into(),
            first_name: user.first_name,
            last_name: user.last_name,
            practice_name: user.practice_name,
            phone: user.phone,
        }
    }
}
