//! Vendor annotation HTTP handlers.
//!
//! ```text
//! GET    /api/user/favorites
//! POST   /api/user/favorites
//! DELETE /api/user/favorites/{vendor_name}
//! GET    /api/user/search-history
//! POST   /api/user/search-history
//! GET    /api/user/notes
//! POST   /api/user/notes
//! DELETE /api/user/notes/{vendor_name}
//! GET    /api/user/reviews
//! POST   /api/user/reviews
//! ```
//!
//! Vendor names live in path segments URL-encoded; actix hands them over
//! already decoded.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::annotations::{HistoryLimit, NoteRecord, ReviewRecord, SearchHistoryEntry};
use crate::domain::DomainError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::session::Authenticated;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize)]
struct VendorPath {
    vendor_name: String,
}

/// Request payload naming a vendor to favorite.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub vendor_name: Option<String>,
}

/// Response payload listing favorite vendor names, newest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct FavoritesResponse {
    pub favorites: Vec<String>,
}

/// Query parameters for the search-history listing.
///
/// The limit stays a raw string so that unparseable values fall back to the
/// default instead of failing the request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchHistoryQuery {
    pub limit: Option<String>,
}

impl SearchHistoryQuery {
    fn history_limit(&self) -> HistoryLimit {
        HistoryLimit::from_query(self.limit.as_deref().and_then(|raw| raw.parse().ok()))
    }
}

/// One search-history item on the wire.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryItem {
    pub search_term: String,
    pub search_type: Option<String>,
    pub created_at: String,
}

impl From<SearchHistoryEntry> for SearchHistoryItem {
    fn from(entry: SearchHistoryEntry) -> Self {
        Self {
            search_term: entry.term,
            search_type: entry.search_type,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// Request payload recording one search.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub search_term: Option<String>,
    pub search_type: Option<String>,
}

/// Request payload creating or replacing a note.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub vendor_name: Option<String>,
    pub note: Option<String>,
}

/// Response payload mapping vendor names to note bodies.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotesResponse {
    pub notes: BTreeMap<String, Option<String>>,
}

pub(crate) fn notes_map(records: Vec<NoteRecord>) -> BTreeMap<String, Option<String>> {
    records
        .into_iter()
        .map(|record| (record.vendor_name, record.note))
        .collect()
}

/// Request payload creating or replacing a review.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub vendor_name: Option<String>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// One stored review on the wire, keyed by vendor name in the parent map.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewBody {
    pub rating: i32,
    pub comment: Option<String>,
}

/// Response payload mapping vendor names to reviews.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewsResponse {
    pub reviews: BTreeMap<String, ReviewBody>,
}

pub(crate) fn reviews_map(records: Vec<ReviewRecord>) -> BTreeMap<String, ReviewBody> {
    records
        .into_iter()
        .map(|record| {
            (
                record.vendor_name,
                ReviewBody {
                    rating: record.rating,
                    comment: record.comment,
                },
            )
        })
        .collect()
}

/// List the authenticated user's favorites.
#[utoipa::path(
    get,
    path = "/api/user/favorites",
    responses(
        (status = 200, description = "Favorite vendor names", body = FavoritesResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "listFavorites"
)]
#[get("/favorites")]
pub async fn list_favorites(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<FavoritesResponse>> {
    let favorites = state.annotations.favorites(auth.user_id()).await?;
    Ok(web::Json(FavoritesResponse { favorites }))
}

/// Mark a vendor as favorite.
#[utoipa::path(
    post,
    path = "/api/user/favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 200, description = "Favorite added", body = MessageResponse),
        (status = 400, description = "Missing vendor name", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "addFavorite"
)]
#[post("/favorites")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<FavoriteRequest>,
) -> ApiResult<HttpResponse> {
    state
        .annotations
        .add_favorite(auth.user_id(), payload.vendor_name.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Favorite added successfully")))
}

/// Unmark a favorite.
#[utoipa::path(
    delete,
    path = "/api/user/favorites/{vendor_name}",
    params(
        ("vendor_name" = String, Path, description = "Vendor name, URL-encoded")
    ),
    responses(
        (status = 200, description = "Favorite removed", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "removeFavorite"
)]
#[delete("/favorites/{vendor_name}")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<VendorPath>,
) -> ApiResult<HttpResponse> {
    state
        .annotations
        .remove_favorite(auth.user_id(), &path.vendor_name)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Favorite removed successfully")))
}

/// List recent searches, newest first.
#[utoipa::path(
    get,
    path = "/api/user/search-history",
    params(
        ("limit" = Option<String>, Query, description = "Row cap, default 50")
    ),
    responses(
        (status = 200, description = "Search history", body = [SearchHistoryItem]),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "listSearchHistory"
)]
#[get("/search-history")]
pub async fn list_search_history(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<SearchHistoryQuery>,
) -> ApiResult<web::Json<Vec<SearchHistoryItem>>> {
    let entries = state
        .annotations
        .search_history(auth.user_id(), query.history_limit())
        .await?;
    Ok(web::Json(
        entries.into_iter().map(SearchHistoryItem::from).collect(),
    ))
}

/// Record one search.
#[utoipa::path(
    post,
    path = "/api/user/search-history",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Search recorded", body = MessageResponse),
        (status = 400, description = "Missing search term", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "recordSearch"
)]
#[post("/search-history")]
pub async fn record_search(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<SearchRequest>,
) -> ApiResult<HttpResponse> {
    state
        .annotations
        .record_search(
            auth.user_id(),
            payload.search_term.as_deref(),
            payload.search_type.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Search history added successfully")))
}

/// List the authenticated user's notes keyed by vendor.
#[utoipa::path(
    get,
    path = "/api/user/notes",
    responses(
        (status = 200, description = "Notes by vendor", body = NotesResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "listNotes"
)]
#[get("/notes")]
pub async fn list_notes(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<NotesResponse>> {
    let records = state.annotations.notes(auth.user_id()).await?;
    Ok(web::Json(NotesResponse {
        notes: notes_map(records),
    }))
}

/// Create or replace the note for one vendor.
#[utoipa::path(
    post,
    path = "/api/user/notes",
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note saved", body = MessageResponse),
        (status = 400, description = "Missing vendor name", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "saveNote"
)]
#[post("/notes")]
pub async fn save_note(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<NoteRequest>,
) -> ApiResult<HttpResponse> {
    state
        .annotations
        .put_note(
            auth.user_id(),
            payload.vendor_name.as_deref(),
            payload.note.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Note saved successfully")))
}

/// Delete the note for one vendor.
#[utoipa::path(
    delete,
    path = "/api/user/notes/{vendor_name}",
    params(
        ("vendor_name" = String, Path, description = "Vendor name, URL-encoded")
    ),
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "deleteNote"
)]
#[delete("/notes/{vendor_name}")]
pub async fn delete_note(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<VendorPath>,
) -> ApiResult<HttpResponse> {
    state
        .annotations
        .remove_note(auth.user_id(), &path.vendor_name)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Note deleted successfully")))
}

/// List the authenticated user's reviews keyed by vendor.
#[utoipa::path(
    get,
    path = "/api/user/reviews",
    responses(
        (status = 200, description = "Reviews by vendor", body = ReviewsResponse),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "listReviews"
)]
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<ReviewsResponse>> {
    let records = state.annotations.reviews(auth.user_id()).await?;
    Ok(web::Json(ReviewsResponse {
        reviews: reviews_map(records),
    }))
}

/// Create or replace the review for one vendor.
#[utoipa::path(
    post,
    path = "/api/user/reviews",
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review saved", body = MessageResponse),
        (status = 400, description = "Missing fields or rating out of range", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error", body = DomainError)
    ),
    security(("bearer_token" = [])),
    tags = ["user"],
    operation_id = "saveReview"
)]
#[post("/reviews")]
pub async fn save_review(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    state
        .annotations
        .put_review(
            auth.user_id(),
            payload.vendor_name.as_deref(),
            payload.rating,
            payload.comment.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Review saved successfully")))
}

#[cfg(test)]
#[path = "annotations_tests.rs"]
mod tests;
