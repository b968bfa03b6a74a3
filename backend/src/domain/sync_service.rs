//! One-call state sync: everything a freshly signed-in client needs.

use std::sync::Arc;

use crate::domain::annotations::{HistoryLimit, SyncSnapshot};
use crate::domain::error::DomainError;
use crate::domain::ports::{
    AnnotationRepository, AnnotationRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::user::{PublicUser, UserId};

/// Aggregates the profile and every annotation collection concurrently.
pub struct SyncService {
    users: Arc<dyn UserRepository>,
    annotations: Arc<dyn AnnotationRepository>,
}

impl SyncService {
    pub fn new(users: Arc<dyn UserRepository>, annotations: Arc<dyn AnnotationRepository>) -> Self {
        Self { users, annotations }
    }

    fn map_user_error(error: UserRepositoryError) -> DomainError {
        DomainError::internal(format!("credential storage failed: {error}"))
    }

    fn map_annotation_error(error: AnnotationRepositoryError) -> DomainError {
        DomainError::internal(format!("annotation storage failed: {error}"))
    }

    async fn load_profile(&self, user_id: UserId) -> Result<PublicUser, DomainError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .map(|record| PublicUser::from(&record))
            .ok_or_else(|| DomainError::user_not_found("User not found"))
    }

    /// Fetch the five collections in parallel; any failure cancels the rest.
    ///
    /// A token whose user row has vanished yields `user_not_found` rather
    /// than a snapshot with a hole in it.
    pub async fn snapshot(&self, user_id: UserId) -> Result<SyncSnapshot, DomainError> {
        let (profile, favorites, search_history, notes, reviews) = tokio::try_join!(
            self.load_profile(user_id),
            async {
                self.annotations
                    .list_favorites(user_id)
                    .await
                    .map_err(Self::map_annotation_error)
            },
            async {
                self.annotations
                    .list_search_history(user_id, HistoryLimit::default())
                    .await
                    .map_err(Self::map_annotation_error)
            },
            async {
                self.annotations
                    .list_notes(user_id)
                    .await
                    .map_err(Self::map_annotation_error)
            },
            async {
                self.annotations
                    .list_reviews(user_id)
                    .await
                    .map_err(Self::map_annotation_error)
            },
        )?;

        Ok(SyncSnapshot {
            profile,
            favorites,
            search_history,
            notes,
            reviews,
        })
    }
}

#[cfg(test)]
#[path = "sync_service_tests.rs"]
mod tests;
