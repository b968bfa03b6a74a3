//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP endpoint and the wire schemas into one
//! document. Swagger UI serves it in debug builds at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{DomainError, ErrorCode};
use crate::inbound::http::annotations::{
    FavoriteRequest, FavoritesResponse, NoteRequest, NotesResponse, ReviewBody, ReviewRequest,
    ReviewsResponse, SearchHistoryItem, SearchRequest,
};
use crate::inbound::http::auth::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, SessionResponse,
    VerifyResponse,
};
use crate::inbound::http::profile::{ProfileResponse, UpdateProfileRequest};
use crate::inbound::http::schemas::{MessageResponse, UserResponse};
use crate::inbound::http::sync::SyncResponse;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Session token issued by register and login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the personalization API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Eye Bridges personalization API",
        description = "JWT-authenticated profile and vendor annotation storage."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::verify,
        crate::inbound::http::auth::forgot_password,
        crate::inbound::http::auth::reset_password,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::annotations::list_favorites,
        crate::inbound::http::annotations::add_favorite,
        crate::inbound::http::annotations::remove_favorite,
        crate::inbound::http::annotations::list_search_history,
        crate::inbound::http::annotations::record_search,
        crate::inbound::http::annotations::list_notes,
        crate::inbound::http::annotations::save_note,
        crate::inbound::http::annotations::delete_note,
        crate::inbound::http::annotations::list_reviews,
        crate::inbound::http::annotations::save_review,
        crate::inbound::http::sync::sync_user_data,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        DomainError,
        ErrorCode,
        MessageResponse,
        UserResponse,
        RegisterRequest,
        LoginRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        SessionResponse,
        VerifyResponse,
        ProfileResponse,
        UpdateProfileRequest,
        FavoriteRequest,
        FavoritesResponse,
        SearchRequest,
        SearchHistoryItem,
        NoteRequest,
        NotesResponse,
        ReviewRequest,
        ReviewBody,
        ReviewsResponse,
        SyncResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login, and password reset"),
        (name = "user", description = "Profile and vendor annotations"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
