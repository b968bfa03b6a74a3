//! Full-state sync HTTP handler.
//!
//! ```text
//! GET /api/user/sync
//! ```

use std::collections::BTreeMap;

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::domain::annotations::SyncSnapshot;
use crate::inbound::http::ApiResult;
use crate::inbound::http::annotations::{
    ReviewBody, SearchHistoryItem, notes_map, reviews_map,
};
use crate::inbound::http::schemas::UserResponse;
use crate::inbound::http::session::Authenticated;
use crate::inbound::http::state::HttpState;

/// Response payload aggregating everything a client needs at bootstrap.
///
/// Each collection uses the same shape as its standalone endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub profile: UserResponse,
    pub favorites: Vec<String>,
    pub search_history: Vec<SearchHistoryItem>,
    pub notes: BTreeMap<String, Option<String>>,
    pub reviews: BTreeMap<String, ReviewBody>,
}

impl From<SyncSnapshot> for SyncResponse {
    fn from(snapshot: SyncSnapshot) -> Self {
        Self {
            profile: snapshot.profile.into(),
            favorites: snapshot.favorites,
            search_history: snapshot
                .search_history
                .into_iter()
                .map(SearchHistoryItem::from)
                .collect(),
            notes: notes_map(snapshot.notes),
            reviews: reviews_map(snapshot.reviews),
        }
    }
}

/// Fetch the profile plus all annotation collections in one call.
#[utoipa::path(
    get,
    path = "/api/user/sync",
    responses(
        (status = 200, description = "Aggregated user state", body = SyncResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "User vanished", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "syncUserData"
)]
#[get("/sync")]
pub async fn sync_user_data(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<SyncResponse>> {
    let snapshot = state.sync.snapshot(auth.user_id()).await?;
    Ok(web::Json(SyncResponse::from(snapshot)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};

    use crate::domain::test_support::{
        StubAnnotationRepository, StubPasswordHasher, StubTokenService, StubUserRepository,
        sample_record,
    };
    use crate::domain::{AnnotationService, AuthService, SyncService, UserId};
    use crate::inbound::http::annotations::{add_favorite, record_search, save_note, save_review};

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .app_data(crate::inbound::http::json_config())
            .service(
                web::scope("/api/user")
                    .service(sync_user_data)
                    .service(add_favorite)
                    .service(record_search)
                    .service(save_note)
                    .service(save_review),
            )
    }

    fn state_with_user(id: i64, email: &str) -> (HttpState, String) {
        let users = Arc::new(StubUserRepository::new());
        let annotations = Arc::new(StubAnnotationRepository::new());
        users.insert_record(sample_record(
            id,
            email,
            &StubPasswordHasher::hash_of("Passw0rd!"),
        ));
        let state = HttpState::new(
            Arc::new(AuthService::new(
                users.clone(),
                Arc::new(StubPasswordHasher::new()),
                Arc::new(StubTokenService::new()),
            )),
            Arc::new(AnnotationService::new(annotations.clone())),
            Arc::new(SyncService::new(users, annotations)),
        );
        let token = StubTokenService::token_for(UserId::new(id), email);
        (state, token)
    }

    async fn seed_and_sync() -> Value {
        let (state, token) = state_with_user(5, "iris@example.com");
        let app = actix_test::init_service(test_app(state)).await;

        for (uri, body) in [
            ("/api/user/favorites", json!({ "vendorName": "Acme" })),
            (
                "/api/user/search-history",
                json!({ "searchTerm": "frames", "searchType": "product" }),
            ),
            (
                "/api/user/notes",
                json!({ "vendorName": "Acme", "note": "ask for Pat" }),
            ),
            (
                "/api/user/reviews",
                json!({ "vendorName": "Acme", "rating": 4, "comment": "solid" }),
            ),
        ] {
            let request = actix_test::TestRequest::post()
                .uri(uri)
                .insert_header(("authorization", format!("Bearer {token}")))
                .set_json(body)
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), actix_web::http::StatusCode::OK);
        }

        let request = actix_test::TestRequest::get()
            .uri("/api/user/sync")
            .insert_header(("authorization", format!("Bearer {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
        actix_test::read_body_json(response).await
    }

    #[actix_web::test]
    async fn snapshot_collections_match_their_standalone_shapes() {
        let value = seed_and_sync().await;

        assert_eq!(value.get("favorites"), Some(&json!(["Acme"])));
        assert_eq!(value.get("notes"), Some(&json!({ "Acme": "ask for Pat" })));
        assert_eq!(
            value.get("reviews"),
            Some(&json!({ "Acme": { "rating": 4, "comment": "solid" } }))
        );
        let history = value
            .get("searchHistory")
            .and_then(Value::as_array)
            .expect("history array");
        assert_eq!(history.len(), 1);
        assert_eq!(
            history[0].get("searchTerm").and_then(Value::as_str),
            Some("frames")
        );
    }

    #[actix_web::test]
    async fn snapshot_profile_has_no_timestamp() {
        let value = seed_and_sync().await;

        let profile = value.get("profile").expect("profile object");
        assert_eq!(profile.get("id").and_then(Value::as_i64), Some(5));
        assert_eq!(
            profile.get("email").and_then(Value::as_str),
            Some("iris@example.com")
        );
        assert!(profile.get("createdAt").is_none());
    }

    #[actix_web::test]
    async fn snapshot_for_a_vanished_user_is_404() {
        let (state, _) = state_with_user(5, "iris@example.com");
        let app = actix_test::init_service(test_app(state)).await;

        // Valid claims whose user row never existed.
        let stray = StubTokenService::token_for(UserId::new(99), "ghost@example.com");
        let request = actix_test::TestRequest::get()
            .uri("/api/user/sync")
            .insert_header(("authorization", format!("Bearer {stray}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("user_not_found")
        );
    }
}
