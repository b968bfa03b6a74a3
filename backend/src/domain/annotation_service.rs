//! Per-user annotation workflows: favorites, search history, notes, and
//! reviews.
//!
//! Callers arrive pre-authenticated; every operation is scoped to the
//! `UserId` taken from verified token claims. Payload validation happens
//! here, so the storage port only ever sees well-formed values.

use std::sync::Arc;

use crate::domain::annotations::{
    HistoryLimit, NoteRecord, Rating, ReviewRecord, SearchHistoryEntry, SearchTerm, VendorName,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{AnnotationRepository, AnnotationRepositoryError};
use crate::domain::user::UserId;

/// Orchestrates annotation reads and writes over the storage port.
pub struct AnnotationService {
    annotations: Arc<dyn AnnotationRepository>,
}

impl AnnotationService {
    pub fn new(annotations: Arc<dyn AnnotationRepository>) -> Self {
        Self { annotations }
    }

    fn map_repository_error(error: AnnotationRepositoryError) -> DomainError {
        DomainError::internal(format!("annotation storage failed: {error}"))
    }

    /// A vendor name is required wherever a body carries one; blank counts
    /// as missing.
    fn require_vendor_name(raw: Option<&str>) -> Result<VendorName, DomainError> {
        raw.and_then(|value| VendorName::new(value).ok())
            .ok_or_else(|| DomainError::missing_field("Vendor name is required"))
    }

    /// Favorites for one user, most recently added first.
    pub async fn favorites(&self, user_id: UserId) -> Result<Vec<String>, DomainError> {
        self.annotations
            .list_favorites(user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Mark a vendor as favorite. Re-adding an existing favorite is a
    /// success and leaves a single row behind.
    pub async fn add_favorite(
        &self,
        user_id: UserId,
        vendor_name: Option<&str>,
    ) -> Result<(), DomainError> {
        let vendor = Self::require_vendor_name(vendor_name)?;
        self.annotations
            .upsert_favorite(user_id, &vendor)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Unmark a favorite. Removing a vendor that was never marked is a
    /// success.
    pub async fn remove_favorite(
        &self,
        user_id: UserId,
        vendor_name: &str,
    ) -> Result<(), DomainError> {
        self.annotations
            .delete_favorite(user_id, vendor_name)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Recent searches, newest first, capped by the caller's limit.
    pub async fn search_history(
        &self,
        user_id: UserId,
        limit: HistoryLimit,
    ) -> Result<Vec<SearchHistoryEntry>, DomainError> {
        self.annotations
            .list_search_history(user_id, limit)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Append one search to the history. Every call adds a row; repeats are
    /// not collapsed.
    pub async fn record_search(
        &self,
        user_id: UserId,
        term: Option<&str>,
        search_type: Option<&str>,
    ) -> Result<(), DomainError> {
        let term = term
            .and_then(|value| SearchTerm::new(value).ok())
            .ok_or_else(|| DomainError::missing_field("Search term is required"))?;
        self.annotations
            .append_search(user_id, &term, search_type)
            .await
            .map_err(Self::map_repository_error)
    }

    pub async fn notes(&self, user_id: UserId) -> Result<Vec<NoteRecord>, DomainError> {
        self.annotations
            .list_notes(user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Create or replace the note for one vendor.
    pub async fn put_note(
        &self,
        user_id: UserId,
        vendor_name: Option<&str>,
        note: Option<&str>,
    ) -> Result<(), DomainError> {
        let vendor = Self::require_vendor_name(vendor_name)?;
        self.annotations
            .upsert_note(user_id, &vendor, note)
            .await
            .map_err(Self::map_repository_error)
    }

    pub async fn remove_note(
        &self,
        user_id: UserId,
        vendor_name: &str,
    ) -> Result<(), DomainError> {
        self.annotations
            .delete_note(user_id, vendor_name)
            .await
            .map_err(Self::map_repository_error)
    }

    pub async fn reviews(&self, user_id: UserId) -> Result<Vec<ReviewRecord>, DomainError> {
        self.annotations
            .list_reviews(user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    /// Create or replace the review for one vendor.
    ///
    /// An absent rating is a missing field; a present rating outside 1..=5,
    /// zero included, is an invalid rating.
    pub async fn put_review(
        &self,
        user_id: UserId,
        vendor_name: Option<&str>,
        rating: Option<i32>,
        comment: Option<&str>,
    ) -> Result<(), DomainError> {
        if vendor_name.is_none_or(str::is_empty) || rating.is_none() {
            return Err(DomainError::missing_field(
                "Vendor name and rating are required",
            ));
        }
        let vendor = Self::require_vendor_name(vendor_name)?;
        let rating = rating
            .and_then(|value| Rating::try_new(value).ok())
            .ok_or_else(|| DomainError::invalid_rating("Rating must be between 1 and 5"))?;
        self.annotations
            .upsert_review(user_id, &vendor, rating, comment)
            .await
            .map_err(Self::map_repository_error)
    }
}

#[cfg(test)]
#[path = "annotation_service_tests.rs"]
mod tests;
