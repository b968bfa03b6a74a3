//! SQLite-backed `AnnotationRepository` implementation using Diesel ORM.
//!
//! Favorites, notes, and reviews rely on the UNIQUE (user_id, vendor_name)
//! constraints: writes go through `ON CONFLICT` so concurrent repeats can
//! never produce duplicate rows. Listings order by insertion time with the
//! rowid as tie-break, which keeps same-timestamp rows stable.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::annotations::{
    HistoryLimit, NoteRecord, Rating, ReviewRecord, SearchHistoryEntry, SearchTerm, VendorName,
};
use crate::domain::ports::{AnnotationRepository, AnnotationRepositoryError};
use crate::domain::user::UserId;

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewFavoriteRow, NewNoteRow, NewReviewRow, NewSearchRow, SearchEntryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, search_history, vendor_notes, vendor_reviews};

/// Diesel-backed implementation of the `AnnotationRepository` port.
#[derive(Clone)]
pub struct DieselAnnotationRepository {
    pool: DbPool,
}

impl DieselAnnotationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run one synchronous Diesel closure on a pooled connection.
    async fn run<T, F>(&self, op: F) -> Result<T, AnnotationRepositoryError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, AnnotationRepositoryError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            op(&mut conn)
        })
        .await
        .map_err(|err| {
            AnnotationRepositoryError::connection(format!("blocking task failed: {err}"))
        })?
    }
}

fn map_pool_error(error: PoolError) -> AnnotationRepositoryError {
    map_basic_pool_error(error, AnnotationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AnnotationRepositoryError {
    map_basic_diesel_error(
        error,
        AnnotationRepositoryError::query,
        AnnotationRepositoryError::connection,
    )
}

#[async_trait]
impl AnnotationRepository for DieselAnnotationRepository {
    async fn list_favorites(
        &self,
        user_id: UserId,
    ) -> Result<Vec<String>, AnnotationRepositoryError> {
        self.run(move |conn| {
            favorites::table
                .filter(favorites::user_id.eq(user_id.as_i64()))
                .order((favorites::created_at.desc(), favorites::id.desc()))
                .select(favorites::vendor_name)
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn upsert_favorite(
        &self,
        user_id: UserId,
        vendor_name: &VendorName,
    ) -> Result<(), AnnotationRepositoryError> {
        let vendor_name = vendor_name.as_str().to_owned();
        self.run(move |conn| {
            let row = NewFavoriteRow {
                user_id: user_id.as_i64(),
                vendor_name: &vendor_name,
                created_at: Utc::now().naive_utc(),
            };
            diesel::insert_into(favorites::table)
                .values(&row)
                .on_conflict((favorites::user_id, favorites::vendor_name))
                .do_nothing()
                .execute(conn)
                .map(|_| ())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_favorite(
        &self,
        user_id: UserId,
        vendor_name: &str,
    ) -> Result<(), AnnotationRepositoryError> {
        let vendor_name = vendor_name.to_owned();
        self.run(move |conn| {
            diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(user_id.as_i64()))
                    .filter(favorites::vendor_name.eq(vendor_name)),
            )
            .execute(conn)
            .map(|_| ())
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_search_history(
        &self,
        user_id: UserId,
        limit: HistoryLimit,
    ) -> Result<Vec<SearchHistoryEntry>, AnnotationRepositoryError> {
        self.run(move |conn| {
            let rows: Vec<SearchEntryRow> = search_history::table
                .filter(search_history::user_id.eq(user_id.as_i64()))
                .order((search_history::created_at.desc(), search_history::id.desc()))
                .limit(limit.rows())
                .select(SearchEntryRow::as_select())
                .load(conn)
                .map_err(map_diesel_error)?;
            Ok(rows
                .into_iter()
                .map(|row| SearchHistoryEntry {
                    term: row.search_term,
                    search_type: row.search_type,
                    created_at: row.created_at.and_utc(),
                })
                .collect())
        })
        .await
    }

    async fn append_search(
        &self,
        user_id: UserId,
        term: &SearchTerm,
        search_type: Option<&str>,
    ) -> Result<(), AnnotationRepositoryError> {
        let term = term.as_str().to_owned();
        let search_type = search_type.map(str::to_owned);
        self.run(move |conn| {
            let row = NewSearchRow {
                user_id: user_id.as_i64(),
                search_term: &term,
                search_type: search_type.as_deref(),
                created_at: Utc::now().naive_utc(),
            };
            diesel::insert_into(search_history::table)
                .values(&row)
                .execute(conn)
                .map(|_| ())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_notes(
        &self,
        user_id: UserId,
    ) -> Result<Vec<NoteRecord>, AnnotationRepositoryError> {
        self.run(move |conn| {
            let rows: Vec<(String, Option<String>)> = vendor_notes::table
                .filter(vendor_notes::user_id.eq(user_id.as_i64()))
                .select((vendor_notes::vendor_name, vendor_notes::note))
                .load(conn)
                .map_err(map_diesel_error)?;
            Ok(rows
                .into_iter()
                .map(|(vendor_name, note)| NoteRecord { vendor_name, note })
                .collect())
        })
        .await
    }

    async fn upsert_note(
        &self,
        user_id: UserId,
        vendor_name: &VendorName,
        note: Option<&str>,
    ) -> Result<(), AnnotationRepositoryError> {
        let vendor_name = vendor_name.as_str().to_owned();
        let note = note.map(str::to_owned);
        self.run(move |conn| {
            let now = Utc::now().naive_utc();
            let row = NewNoteRow {
                user_id: user_id.as_i64(),
                vendor_name: &vendor_name,
                note: note.as_deref(),
                created_at: now,
                updated_at: now,
            };
            diesel::insert_into(vendor_notes::table)
                .values(&row)
                .on_conflict((vendor_notes::user_id, vendor_notes::vendor_name))
                .do_update()
                .set((
                    vendor_notes::note.eq(note.as_deref()),
                    vendor_notes::updated_at.eq(now),
                ))
                .execute(conn)
                .map(|_| ())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete_note(
        &self,
        user_id: UserId,
        vendor_name: &str,
    ) -> Result<(), AnnotationRepositoryError> {
        let vendor_name = vendor_name.to_owned();
        self.run(move |conn| {
            diesel::delete(
                vendor_notes::table
                    .filter(vendor_notes::user_id.eq(user_id.as_i64()))
                    .filter(vendor_notes::vendor_name.eq(vendor_name)),
            )
            .execute(conn)
            .map(|_| ())
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_reviews(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ReviewRecord>, AnnotationRepositoryError> {
        self.run(move |conn| {
            let rows: Vec<(String, i32, Option<String>)> = vendor_reviews::table
                .filter(vendor_reviews::user_id.eq(user_id.as_i64()))
                .select((
                    vendor_reviews::vendor_name,
                    vendor_reviews::rating,
                    vendor_reviews::comment,
                ))
                .load(conn)
                .map_err(map_diesel_error)?;
            Ok(rows
                .into_iter()
                .map(|(vendor_name, rating, comment)| ReviewRecord {
                    vendor_name,
                    rating,
                    comment,
                })
                .collect())
        })
        .await
    }

    async fn upsert_review(
        &self,
        user_id: UserId,
        vendor_name: &VendorName,
        rating: Rating,
        comment: Option<&str>,
    ) -> Result<(), AnnotationRepositoryError> {
        let vendor_name = vendor_name.as_str().to_owned();
        let comment = comment.map(str::to_owned);
        self.run(move |conn| {
            let now = Utc::now().naive_utc();
            let row = NewReviewRow {
                user_id: user_id.as_i64(),
                vendor_name: &vendor_name,
                rating: rating.value(),
                comment: comment.as_deref(),
                created_at: now,
                updated_at: now,
            };
            diesel::insert_into(vendor_reviews::table)
                .values(&row)
                .on_conflict((vendor_reviews::user_id, vendor_reviews::vendor_name))
                .do_update()
                .set((
                    vendor_reviews::rating.eq(rating.value()),
                    vendor_reviews::comment.eq(comment.as_deref()),
                    vendor_reviews::updated_at.eq(now),
                ))
                .execute(conn)
                .map(|_| ())
                .map_err(map_diesel_error)
        })
        .await
    }
}
