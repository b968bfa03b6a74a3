//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered accounts.
    ///
    /// Besides the credential columns this carries the optional practice
    /// profile and the token columns for e-mail verification and password
    /// reset. `reset_token` is only honoured while `reset_token_expires`
    /// lies in the future.
    users (id) {
        /// Primary key: SQLite rowid.
        id -> BigInt,
        /// Login identifier, unique across the table.
        email -> Text,
        /// Argon2id hash in PHC string format.
        password_hash -> Text,
        first_name -> Nullable<Text>,
        last_name -> Nullable<Text>,
        practice_name -> Nullable<Text>,
        phone -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        email_verified -> Bool,
        verification_token -> Nullable<Text>,
        reset_token -> Nullable<Text>,
        reset_token_expires -> Nullable<Timestamp>,
    }
}

diesel::table! {
    /// Vendors a user has marked, one row per (user, vendor) pair.
    favorites (id) {
        id -> BigInt,
        user_id -> BigInt,
        vendor_name -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Append-only log of directory searches.
    search_history (id) {
        id -> BigInt,
        user_id -> BigInt,
        search_term -> Text,
        search_type -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Private per-vendor notes, one row per (user, vendor) pair.
    vendor_notes (id) {
        id -> BigInt,
        user_id -> BigInt,
        vendor_name -> Text,
        note -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    /// Per-vendor star ratings, one row per (user, vendor) pair.
    vendor_reviews (id) {
        id -> BigInt,
        user_id -> BigInt,
        vendor_name -> Text,
        /// Constrained to 1..=5 by a table check.
        rating -> Integer,
        comment -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    /// Log of outreach to vendors.
    contact_history (id) {
        id -> BigInt,
        user_id -> BigInt,
        vendor_name -> Text,
        contact_method -> Nullable<Text>,
        contact_date -> Timestamp,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// Named vendor short-lists kept for side-by-side comparison.
    saved_comparisons (id) {
        id -> BigInt,
        user_id -> BigInt,
        comparison_name -> Nullable<Text>,
        /// JSON array of vendor names.
        vendor_names -> Text,
        created_at -> Timestamp,
    }
}

diesel::joinable!(favorites -> users (user_id));
diesel::joinable!(search_history -> users (user_id));
diesel::joinable!(vendor_notes -> users (user_id));
diesel::joinable!(vendor_reviews -> users (user_id));
diesel::joinable!(contact_history -> users (user_id));
diesel::joinable!(saved_comparisons -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    favorites,
    search_history,
    vendor_notes,
    vendor_reviews,
    contact_history,
    saved_comparisons,
);
