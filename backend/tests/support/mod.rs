//! Shared fixtures for integration tests against temp-file SQLite.
//!
//! Every test gets its own database file inside a fresh temp directory, so
//! suites can run in parallel without sharing state.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use tempfile::TempDir;

use backend::domain::{AnnotationService, AuthService, SyncService};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DbPool, DieselAnnotationRepository, DieselUserRepository, PoolConfig, run_migrations,
};
use backend::outbound::{Argon2PasswordHasher, JwtTokenService};

pub const JWT_SECRET: &[u8] = b"integration-test-secret";

/// Token and reset windows for one test backend.
#[derive(Clone, Copy)]
pub struct Windows {
    pub token_ttl_secs: i64,
    pub reset_token_ttl: Duration,
}

impl Default for Windows {
    fn default() -> Self {
        Self {
            token_ttl_secs: 3600,
            reset_token_ttl: Duration::hours(1),
        }
    }
}

/// A migrated database plus the service graph wired over it.
pub struct TestBackend {
    pub pool: DbPool,
    pub users: Arc<DieselUserRepository>,
    pub annotations: Arc<DieselAnnotationRepository>,
    pub http_state: web::Data<HttpState>,
    _dir: TempDir,
}

pub fn backend() -> TestBackend {
    backend_with(Windows::default())
}

pub fn backend_with(windows: Windows) -> TestBackend {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("personalization.db");
    let pool = DbPool::new(PoolConfig::new(db_path.display().to_string()).with_max_size(2))
        .expect("build pool");
    run_migrations(&pool).expect("run migrations");

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let annotations = Arc::new(DieselAnnotationRepository::new(pool.clone()));
    let auth = AuthService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenService::new(JWT_SECRET, windows.token_ttl_secs)),
    )
    .with_reset_token_ttl(windows.reset_token_ttl);
    let http_state = web::Data::new(HttpState::new(
        Arc::new(auth),
        Arc::new(AnnotationService::new(annotations.clone())),
        Arc::new(SyncService::new(users.clone(), annotations.clone())),
    ));

    TestBackend {
        pool,
        users,
        annotations,
        http_state,
        _dir: dir,
    }
}

/// Build the full application the server binary runs, minus the listener.
pub fn test_app(
    backend: &TestBackend,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    backend::server::build_app(health_state, backend.http_state.clone())
}
