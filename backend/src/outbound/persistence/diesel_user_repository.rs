//! SQLite-backed `UserRepository` implementation using Diesel ORM.
//!
//! This adapter owns every query against the `users` table. SQLite has no
//! async driver, so each operation checks a connection out inside
//! `spawn_blocking` and runs synchronous Diesel there.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{EmailAddress, NewUser, ProfileFields, UserId, UserRecord};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, ProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

diesel::define_sql_function! {
    /// Rowid assigned by the most recent insert on this connection.
    fn last_insert_rowid() -> BigInt;
}

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run one synchronous Diesel closure on a pooled connection.
    async fn run<T, F>(&self, op: F) -> Result<T, UserRepositoryError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, UserRepositoryError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(map_pool_error)?;
            op(&mut conn)
        })
        .await
        .map_err(|err| UserRepositoryError::connection(format!("blocking task failed: {err}")))?
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

/// Map Diesel errors, surfacing the unique-email constraint as its own
/// variant so services can answer with the right taxonomy code.
fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return UserRepositoryError::duplicate_email();
    }
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Convert a database row to a domain record.
fn row_to_record(row: UserRow) -> Result<UserRecord, UserRepositoryError> {
    let email = EmailAddress::new(row.email)
        .map_err(|_| UserRepositoryError::query("stored email fails validation"))?;
    Ok(UserRecord {
        id: UserId::new(row.id),
        email,
        password_hash: row.password_hash,
        profile: ProfileFields {
            first_name: row.first_name,
            last_name: row.last_name,
            practice_name: row.practice_name,
            phone: row.phone,
        },
        created_at: row.created_at.and_utc(),
        updated_at: row.updated_at.and_utc(),
        email_verified: row.email_verified,
        verification_token: row.verification_token,
        reset_token: row.reset_token,
        reset_token_expires: row.reset_token_expires.map(|stamp| stamp.and_utc()),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, UserRepositoryError> {
        self.run(move |conn| {
            let now = Utc::now().naive_utc();
            let row = NewUserRow {
                email: new_user.email.as_str(),
                password_hash: &new_user.password_hash,
                first_name: new_user.profile.first_name.as_deref(),
                last_name: new_user.profile.last_name.as_deref(),
                practice_name: new_user.profile.practice_name.as_deref(),
                phone: new_user.profile.phone.as_deref(),
                created_at: now,
                updated_at: now,
                email_verified: false,
                verification_token: Some(new_user.verification_token.as_str()),
            };
            diesel::insert_into(users::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            let id: i64 = diesel::select(last_insert_rowid())
                .get_result(conn)
                .map_err(map_diesel_error)?;

            Ok(UserRecord {
                id: UserId::new(id),
                email: new_user.email,
                password_hash: new_user.password_hash,
                profile: new_user.profile,
                created_at: now.and_utc(),
                updated_at: now.and_utc(),
                email_verified: false,
                verification_token: Some(new_user.verification_token),
                reset_token: None,
                reset_token_expires: None,
            })
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        let email = email.to_owned();
        self.run(move |conn| {
            users::table
                .filter(users::email.eq(email))
                .select(UserRow::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_record)
                .transpose()
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, UserRepositoryError> {
        self.run(move |conn| {
            users::table
                .find(id.as_i64())
                .select(UserRow::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_record)
                .transpose()
        })
        .await
    }

    async fn set_reset_token(
        &self,
        id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), UserRepositoryError> {
        let token = token.to_owned();
        self.run(move |conn| {
            diesel::update(users::table.find(id.as_i64()))
                .set((
                    users::reset_token.eq(token),
                    users::reset_token_expires.eq(expires_at.naive_utc()),
                ))
                .execute(conn)
                .map(|_| ())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_by_valid_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        let token = token.to_owned();
        self.run(move |conn| {
            users::table
                .filter(users::reset_token.eq(token))
                .filter(users::reset_token_expires.gt(now.naive_utc()))
                .select(UserRow::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(row_to_record)
                .transpose()
        })
        .await
    }

    async fn consume_reset_token(
        &self,
        id: UserId,
        new_password_hash: &str,
    ) -> Result<(), UserRepositoryError> {
        let new_password_hash = new_password_hash.to_owned();
        self.run(move |conn| {
            diesel::update(users::table.find(id.as_i64()))
                .set((
                    users::password_hash.eq(new_password_hash),
                    users::reset_token.eq(None::<String>),
                    users::reset_token_expires.eq(None::<NaiveDateTime>),
                    users::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .map(|_| ())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn update_profile(
        &self,
        id: UserId,
        fields: ProfileFields,
    ) -> Result<(), UserRepositoryError> {
        self.run(move |conn| {
            let update = ProfileUpdate {
                first_name: fields.first_name.as_deref(),
                last_name: fields.last_name.as_deref(),
                practice_name: fields.practice_name.as_deref(),
                phone: fields.phone.as_deref(),
                updated_at: Utc::now().naive_utc(),
            };
            diesel::update(users::table.find(id.as_i64()))
                .set(&update)
                .execute(conn)
                .map(|_| ())
                .map_err(map_diesel_error)
        })
        .await
    }
}
