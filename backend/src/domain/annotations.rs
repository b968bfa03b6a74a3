//! Per-user annotation types: favorites, search history, notes, and reviews.
//!
//! Vendor names are opaque external strings. This layer never checks them
//! against the catalog; the only rule is that keys and search terms must not
//! be empty.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::user::PublicUser;

/// Error for an empty vendor-name key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorNameError {
    Empty,
}

impl fmt::Display for VendorNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "vendor name must not be empty"),
        }
    }
}

impl std::error::Error for VendorNameError {}

/// A non-empty vendor-name key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VendorName(String);

impl VendorName {
    /// Wrap a raw name, rejecting the empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, VendorNameError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(VendorNameError::Empty);
        }
        Ok(Self(raw))
    }

    /// The name as supplied.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for VendorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<VendorName> for String {
    fn from(value: VendorName) -> Self {
        value.0
    }
}

/// Error for an empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTermError {
    Empty,
}

impl fmt::Display for SearchTermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "search term must not be empty"),
        }
    }
}

impl std::error::Error for SearchTermError {}

/// A non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Wrap a raw term, rejecting the empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, SearchTermError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SearchTermError::Empty);
        }
        Ok(Self(raw))
    }

    /// The term as supplied.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<SearchTerm> for String {
    fn from(value: SearchTerm) -> Self {
        value.0
    }
}

/// Lower bound of the accepted rating range.
pub const RATING_MIN: i32 = 1;
/// Upper bound of the accepted rating range.
pub const RATING_MAX: i32 = 5;

/// Error for a rating outside [`RATING_MIN`]..=[`RATING_MAX`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    OutOfRange(i32),
}

impl fmt::Display for RatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(value) => write!(
                f,
                "rating {value} must be between {RATING_MIN} and {RATING_MAX}"
            ),
        }
    }
}

impl std::error::Error for RatingError {}

/// A star rating constrained to the closed range 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(i32);

impl Rating {
    /// Accept a raw value only inside the range.
    pub fn try_new(value: i32) -> Result<Self, RatingError> {
        if (RATING_MIN..=RATING_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    /// The validated value.
    pub fn value(self) -> i32 {
        self.0
    }
}

/// One search-history row, most recent reads first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistoryEntry {
    pub term: String,
    pub search_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// How many history rows a listing returns.
///
/// Callers may pass any positive value; absent, zero, or negative inputs
/// fall back to the default of 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimit(i64);

impl HistoryLimit {
    /// Default number of rows returned by history listings.
    pub const DEFAULT: i64 = 50;

    /// Interpret an optional caller-supplied limit.
    pub fn from_query(raw: Option<i64>) -> Self {
        match raw {
            Some(value) if value > 0 => Self(value),
            _ => Self(Self::DEFAULT),
        }
    }

    /// The effective row cap.
    pub fn rows(self) -> i64 {
        self.0
    }
}

impl Default for HistoryLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// One stored note keyed by vendor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub vendor_name: String,
    pub note: Option<String>,
}

/// One stored review keyed by vendor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub vendor_name: String,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Best-effort aggregate of everything a client needs at bootstrap.
///
/// Each collection is consistent as of its own read instant; the snapshot as
/// a whole is not transactional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub profile: PublicUser,
    pub favorites: Vec<String>,
    pub search_history: Vec<SearchHistoryEntry>,
    pub notes: Vec<NoteRecord>,
    pub reviews: Vec<ReviewRecord>,
}
