//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{favorites, search_history, users, vendor_notes, vendor_reviews};

/// Row struct for reading a full account from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub practice_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expires: Option<NaiveDateTime>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub practice_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub email_verified: bool,
    pub verification_token: Option<&'a str>,
}

/// Changeset struct for replacing the optional profile columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileUpdate<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub practice_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Annotation models
// ---------------------------------------------------------------------------

/// Insertable struct for marking a favorite.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorites)]
pub(crate) struct NewFavoriteRow<'a> {
    pub user_id: i64,
    pub vendor_name: &'a str,
    pub created_at: NaiveDateTime,
}

/// Row struct for reading one search from the history.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = search_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct SearchEntryRow {
    pub search_term: String,
    pub search_type: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable struct for appending to the search history.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = search_history)]
pub(crate) struct NewSearchRow<'a> {
    pub user_id: i64,
    pub search_term: &'a str,
    pub search_type: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

/// Row struct for reading one vendor note.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vendor_notes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct NoteRow {
    pub vendor_name: String,
    pub note: Option<String>,
}

/// Insertable struct for creating or replacing a vendor note.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vendor_notes)]
pub(crate) struct NewNoteRow<'a> {
    pub user_id: i64,
    pub vendor_name: &'a str,
    pub note: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Row struct for reading one vendor review.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vendor_reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ReviewRow {
    pub vendor_name: String,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Insertable struct for creating or replacing a vendor review.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vendor_reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub user_id: i64,
    pub vendor_name: &'a str,
    pub rating: i32,
    pub comment: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
