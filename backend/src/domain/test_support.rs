//! In-memory port stubs shared by service and handler tests.
//!
//! Each stub keeps its state behind a `Mutex` and lets tests inject one
//! failure per operation name to drive the error-mapping paths.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::annotations::{
    HistoryLimit, NoteRecord, Rating, ReviewRecord, SearchHistoryEntry, SearchTerm, VendorName,
};
use crate::domain::ports::{
    AccessTokenClaims, AnnotationRepository, AnnotationRepositoryError, PasswordHasher,
    PasswordHasherError, TokenIssueError, TokenService, TokenVerifyError, UserRepository,
    UserRepositoryError,
};
use crate::domain::user::{NewUser, ProfileFields, UserId, UserRecord};

#[derive(Default)]
struct UserStubState {
    records: HashMap<i64, UserRecord>,
    find_failure: Option<UserRepositoryError>,
    write_failure: Option<UserRepositoryError>,
}

/// In-memory credential store mirroring the unique-email constraint.
#[derive(Default)]
pub struct StubUserRepository {
    state: Mutex<UserStubState>,
    next_id: AtomicI64,
}

impl StubUserRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(UserStubState::default()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn set_find_failure(&self, failure: UserRepositoryError) {
        self.state.lock().expect("state lock").find_failure = Some(failure);
    }

    pub fn set_write_failure(&self, failure: UserRepositoryError) {
        self.state.lock().expect("state lock").write_failure = Some(failure);
    }

    /// Seed a prebuilt record, claiming its id.
    pub fn insert_record(&self, record: UserRecord) {
        let id = record.id.as_i64();
        self.next_id.fetch_max(id + 1, Ordering::Relaxed);
        self.state
            .lock()
            .expect("state lock")
            .records
            .insert(id, record);
    }

    pub fn record(&self, id: UserId) -> Option<UserRecord> {
        self.state
            .lock()
            .expect("state lock")
            .records
            .get(&id.as_i64())
            .cloned()
    }

    pub fn remove(&self, id: UserId) {
        self.state
            .lock()
            .expect("state lock")
            .records
            .remove(&id.as_i64());
    }

    /// The reset token currently stored for a user, if any.
    pub fn reset_token(&self, id: UserId) -> Option<String> {
        self.record(id).and_then(|record| record.reset_token)
    }

    fn take_find_failure(&self) -> Option<UserRepositoryError> {
        self.state.lock().expect("state lock").find_failure.take()
    }

    fn take_write_failure(&self) -> Option<UserRepositoryError> {
        self.state.lock().expect("state lock").write_failure.take()
    }
}

/// A record with sensible defaults for seeding stubs.
pub fn sample_record(id: i64, email: &str, password_hash: &str) -> UserRecord {
    let now = Utc::now();
    UserRecord {
        id: UserId::new(id),
        email: crate::domain::user::EmailAddress::new(email).expect("test email validates"),
        password_hash: password_hash.to_owned(),
        profile: ProfileFields::default(),
        created_at: now,
        updated_at: now,
        email_verified: false,
        verification_token: None,
        reset_token: None,
        reset_token_expires: None,
    }
}

#[async_trait]
impl UserRepository for StubUserRepository {
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, UserRepositoryError> {
        if let Some(failure) = self.take_write_failure() {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        if state
            .records
            .values()
            .any(|record| record.email == new_user.email)
        {
            return Err(UserRepositoryError::duplicate_email());
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        let record = UserRecord {
            id: UserId::new(id),
            email: new_user.email,
            password_hash: new_user.password_hash,
            profile: new_user.profile,
            created_at: now,
            updated_at: now,
            email_verified: false,
            verification_token: Some(new_user.verification_token),
            reset_token: None,
            reset_token_expires: None,
        };
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        if let Some(failure) = self.take_find_failure() {
            return Err(failure);
        }
        let state = self.state.lock().expect("state lock");
        Ok(state
            .records
            .values()
            .find(|record| record.email.as_str() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, UserRepositoryError> {
        if let Some(failure) = self.take_find_failure() {
            return Err(failure);
        }
        let state = self.state.lock().expect("state lock");
        Ok(state.records.get(&id.as_i64()).cloned())
    }

    async fn set_reset_token(
        &self,
        id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        if let Some(failure) = self.take_write_failure() {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        if let Some(record) = state.records.get_mut(&id.as_i64()) {
            record.reset_token = Some(token.to_owned());
            record.reset_token_expires = Some(expires_at);
        }
        Ok(())
    }

    async fn find_by_valid_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        if let Some(failure) = self.take_find_failure() {
            return Err(failure);
        }
        let state = self.state.lock().expect("state lock");
        Ok(state
            .records
            .values()
            .find(|record| {
                record.reset_token.as_deref() == Some(token)
                    && record.reset_token_expires.is_some_and(|expiry| expiry > now)
            })
            .cloned())
    }

    async fn consume_reset_token(
        &self,
        id: UserId,
        new_password_hash: &str,
    ) -> Result<(), UserRepositoryError> {
        if let Some(failure) = self.take_write_failure() {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        if let Some(record) = state.records.get_mut(&id.as_i64()) {
            record.password_hash = new_password_hash.to_owned();
            record.reset_token = None;
            record.reset_token_expires = None;
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        id: UserId,
        fields: ProfileFields,
    ) -> Result<(), UserRepositoryError> {
        if let Some(failure) = self.take_write_failure() {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        if let Some(record) = state.records.get_mut(&id.as_i64()) {
            record.profile = fields;
            record.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[derive(Default)]
struct AnnotationStubState {
    favorites: Vec<(i64, String)>,
    history: Vec<(i64, SearchHistoryEntry)>,
    notes: HashMap<(i64, String), Option<String>>,
    reviews: HashMap<(i64, String), (i32, Option<String>)>,
    failures: HashMap<&'static str, AnnotationRepositoryError>,
}

/// In-memory annotation store with per-operation failure injection.
#[derive(Default)]
pub struct StubAnnotationRepository {
    state: Mutex<AnnotationStubState>,
}

impl StubAnnotationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrange for the named operation's next call to fail.
    pub fn fail_on(&self, operation: &'static str, failure: AnnotationRepositoryError) {
        self.state
            .lock()
            .expect("state lock")
            .failures
            .insert(operation, failure);
    }

    pub fn favorites_of(&self, user_id: UserId) -> Vec<String> {
        let state = self.state.lock().expect("state lock");
        state
            .favorites
            .iter()
            .filter(|(owner, _)| *owner == user_id.as_i64())
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn take_failure(&self, operation: &'static str) -> Option<AnnotationRepositoryError> {
        self.state
            .lock()
            .expect("state lock")
            .failures
            .remove(operation)
    }
}

#[async_trait]
impl AnnotationRepository for StubAnnotationRepository {
    async fn list_favorites(
        &self,
        user_id: UserId,
    ) -> Result<Vec<String>, AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("list_favorites") {
            return Err(failure);
        }
        let state = self.state.lock().expect("state lock");
        Ok(state
            .favorites
            .iter()
            .rev()
            .filter(|(owner, _)| *owner == user_id.as_i64())
            .map(|(_, name)| name.clone())
            .collect())
    }

    async fn upsert_favorite(
        &self,
        user_id: UserId,
        vendor_name: &VendorName,
    ) -> Result<(), AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("upsert_favorite") {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        let key = (user_id.as_i64(), vendor_name.as_str().to_owned());
        if !state.favorites.contains(&key) {
            state.favorites.push(key);
        }
        Ok(())
    }

    async fn delete_favorite(
        &self,
        user_id: UserId,
        vendor_name: &str,
    ) -> Result<(), AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("delete_favorite") {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        state
            .favorites
            .retain(|(owner, name)| !(*owner == user_id.as_i64() && name == vendor_name));
        Ok(())
    }

    async fn list_search_history(
        &self,
        user_id: UserId,
        limit: HistoryLimit,
    ) -> Result<Vec<SearchHistoryEntry>, AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("list_search_history") {
            return Err(failure);
        }
        let state = self.state.lock().expect("state lock");
        let rows = state
            .history
            .iter()
            .rev()
            .filter(|(owner, _)| *owner == user_id.as_i64())
            .map(|(_, entry)| entry.clone())
            .take(usize::try_from(limit.rows()).unwrap_or(usize::MAX))
            .collect();
        Ok(rows)
    }

    async fn append_search(
        &self,
        user_id: UserId,
        term: &SearchTerm,
        search_type: Option<&str>,
    ) -> Result<(), AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("append_search") {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        state.history.push((
            user_id.as_i64(),
            SearchHistoryEntry {
                term: term.as_str().to_owned(),
                search_type: search_type.map(str::to_owned),
                created_at: Utc::now(),
            },
        ));
        Ok(())
    }

    async fn list_notes(
        &self,
        user_id: UserId,
    ) -> Result<Vec<NoteRecord>, AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("list_notes") {
            return Err(failure);
        }
        let state = self.state.lock().expect("state lock");
        Ok(state
            .notes
            .iter()
            .filter(|((owner, _), _)| *owner == user_id.as_i64())
            .map(|((_, vendor), note)| NoteRecord {
                vendor_name: vendor.clone(),
                note: note.clone(),
            })
            .collect())
    }

    async fn upsert_note(
        &self,
        user_id: UserId,
        vendor_name: &VendorName,
        note: Option<&str>,
    ) -> Result<(), AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("upsert_note") {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        state.notes.insert(
            (user_id.as_i64(), vendor_name.as_str().to_owned()),
            note.map(str::to_owned),
        );
        Ok(())
    }

    async fn delete_note(
        &self,
        user_id: UserId,
        vendor_name: &str,
    ) -> Result<(), AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("delete_note") {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        state
            .notes
            .remove(&(user_id.as_i64(), vendor_name.to_owned()));
        Ok(())
    }

    async fn list_reviews(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ReviewRecord>, AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("list_reviews") {
            return Err(failure);
        }
        let state = self.state.lock().expect("state lock");
        Ok(state
            .reviews
            .iter()
            .filter(|((owner, _), _)| *owner == user_id.as_i64())
            .map(|((_, vendor), (rating, comment))| ReviewRecord {
                vendor_name: vendor.clone(),
                rating: *rating,
                comment: comment.clone(),
            })
            .collect())
    }

    async fn upsert_review(
        &self,
        user_id: UserId,
        vendor_name: &VendorName,
        rating: Rating,
        comment: Option<&str>,
    ) -> Result<(), AnnotationRepositoryError> {
        if let Some(failure) = self.take_failure("upsert_review") {
            return Err(failure);
        }
        let mut state = self.state.lock().expect("state lock");
        state.reviews.insert(
            (user_id.as_i64(), vendor_name.as_str().to_owned()),
            (rating.value(), comment.map(str::to_owned)),
        );
        Ok(())
    }
}

/// Reversible stand-in hash, cheap enough for unit tests.
#[derive(Default)]
pub struct StubPasswordHasher {
    fail_next: Mutex<bool>,
}

impl StubPasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self) {
        *self.fail_next.lock().expect("flag lock") = true;
    }

    /// The hash this stub produces for a plaintext.
    pub fn hash_of(password: &str) -> String {
        format!("hashed:{password}")
    }
}

impl PasswordHasher for StubPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        if std::mem::take(&mut *self.fail_next.lock().expect("flag lock")) {
            return Err(PasswordHasherError::hash("stub hash failure"));
        }
        Ok(Self::hash_of(password))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHasherError> {
        if std::mem::take(&mut *self.fail_next.lock().expect("flag lock")) {
            return Err(PasswordHasherError::hash("stub verify failure"));
        }
        Ok(stored_hash == Self::hash_of(password))
    }
}

/// Token service whose tokens embed the identity in plain text.
#[derive(Default)]
pub struct StubTokenService {
    fail_issue: Mutex<bool>,
}

impl StubTokenService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_issue(&self) {
        *self.fail_issue.lock().expect("flag lock") = true;
    }

    /// The token this stub issues for an identity.
    pub fn token_for(user_id: UserId, email: &str) -> String {
        format!("stub-token:{}:{email}", user_id.as_i64())
    }
}

impl TokenService for StubTokenService {
    fn issue(&self, user_id: UserId, email: &str) -> Result<String, TokenIssueError> {
        if std::mem::take(&mut *self.fail_issue.lock().expect("flag lock")) {
            return Err(TokenIssueError::signing("stub signing failure"));
        }
        Ok(Self::token_for(user_id, email))
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenVerifyError> {
        let mut parts = token.splitn(3, ':');
        if parts.next() != Some("stub-token") {
            return Err(TokenVerifyError::invalid());
        }
        let id = parts
            .next()
            .and_then(|raw| raw.parse::<i64>().ok())
            .ok_or_else(TokenVerifyError::invalid)?;
        let email = parts.next().ok_or_else(TokenVerifyError::invalid)?;
        Ok(AccessTokenClaims {
            user_id: UserId::new(id),
            email: email.to_owned(),
        })
    }
}
