//! Driven port for the per-user annotation store.
//!
//! Every method is scoped to one owning user id; implementations must never
//! return or touch rows belonging to anyone else. Mutations ride on native
//! upserts keyed by the (user, vendor) unique constraints.

use async_trait::async_trait;

use crate::domain::annotations::{
    HistoryLimit, NoteRecord, Rating, ReviewRecord, SearchHistoryEntry, SearchTerm, VendorName,
};
use crate::domain::ports::macros::define_port_error;
use crate::domain::user::UserId;

define_port_error! {
    /// Errors surfaced by [`AnnotationRepository`] implementations.
    pub enum AnnotationRepositoryError {
        /// A connection could not be checked out of the pool.
        Connection { message: String } => "connection failure: {message}",
        /// The underlying statement failed.
        Query { message: String } => "query failure: {message}",
    }
}

/// Persistence port for favorites, search history, notes, and reviews.
#[async_trait]
pub trait AnnotationRepository: Send + Sync {
    /// Vendor names favorited by the user, most recently added first.
    async fn list_favorites(
        &self,
        user_id: UserId,
    ) -> Result<Vec<String>, AnnotationRepositoryError>;

    /// Idempotent insert: re-adding an existing pair changes nothing.
    async fn upsert_favorite(
        &self,
        user_id: UserId,
        vendor_name: &VendorName,
    ) -> Result<(), AnnotationRepositoryError>;

    /// Idempotent delete: removing an absent pair changes nothing.
    async fn delete_favorite(
        &self,
        user_id: UserId,
        vendor_name: &str,
    ) -> Result<(), AnnotationRepositoryError>;

    /// Search entries, most recent first, truncated to `limit`.
    async fn list_search_history(
        &self,
        user_id: UserId,
        limit: HistoryLimit,
    ) -> Result<Vec<SearchHistoryEntry>, AnnotationRepositoryError>;

    /// Pure append; history rows are never updated.
    async fn append_search(
        &self,
        user_id: UserId,
        term: &SearchTerm,
        search_type: Option<&str>,
    ) -> Result<(), AnnotationRepositoryError>;

    /// All notes for the user; ordering carries no meaning.
    async fn list_notes(
        &self,
        user_id: UserId,
    ) -> Result<Vec<NoteRecord>, AnnotationRepositoryError>;

    /// Insert or replace the note text for a (user, vendor) pair, bumping
    /// the update timestamp on replacement.
    async fn upsert_note(
        &self,
        user_id: UserId,
        vendor_name: &VendorName,
        note: Option<&str>,
    ) -> Result<(), AnnotationRepositoryError>;

    /// Idempotent delete by vendor name.
    async fn delete_note(
        &self,
        user_id: UserId,
        vendor_name: &str,
    ) -> Result<(), AnnotationRepositoryError>;

    /// All reviews for the user; ordering carries no meaning.
    async fn list_reviews(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ReviewRecord>, AnnotationRepositoryError>;

    /// Insert or replace the rating and comment for a (user, vendor) pair.
    async fn upsert_review(
        &self,
        user_id: UserId,
        vendor_name: &VendorName,
        rating: Rating,
        comment: Option<&str>,
    ) -> Result<(), AnnotationRepositoryError>;
}
