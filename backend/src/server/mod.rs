//! Server construction and middleware wiring.

mod config;

pub use config::AppConfig;

use std::io;
use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{AnnotationService, AuthService, SyncService};
use crate::inbound::http::annotations::{
    add_favorite, delete_note, list_favorites, list_notes, list_reviews, list_search_history,
    record_search, remove_favorite, save_note, save_review,
};
use crate::inbound::http::auth::{forgot_password, login, register, reset_password, verify};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::json_config;
use crate::inbound::http::profile::{get_profile, update_profile};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::sync::sync_user_data;
use crate::middleware::Correlate;
use crate::outbound::persistence::{
    DbPool, DieselAnnotationRepository, DieselUserRepository, PoolConfig, run_migrations,
};
use crate::outbound::{Argon2PasswordHasher, JwtTokenService};

/// Wire the domain services over SQLite-backed adapters.
fn build_http_state(pool: &DbPool, config: &AppConfig) -> web::Data<HttpState> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let annotations = Arc::new(DieselAnnotationRepository::new(pool.clone()));
    let auth = AuthService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(JwtTokenService::new(
            config.jwt_secret.as_bytes(),
            config.token_ttl_secs,
        )),
    )
    .with_reset_token_ttl(chrono::Duration::seconds(config.reset_token_ttl_secs));

    web::Data::new(HttpState::new(
        Arc::new(auth),
        Arc::new(AnnotationService::new(annotations.clone())),
        Arc::new(SyncService::new(users, annotations)),
    ))
}

/// Assemble the application: routes, middleware, and shared state.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let auth_scope = web::scope("/api/auth")
        .service(register)
        .service(login)
        .service(verify)
        .service(forgot_password)
        .service(reset_password);

    let user_scope = web::scope("/api/user")
        .service(get_profile)
        .service(update_profile)
        .service(list_favorites)
        .service(add_favorite)
        .service(remove_favorite)
        .service(list_search_history)
        .service(record_search)
        .service(list_notes)
        .service(save_note)
        .service(delete_note)
        .service(list_reviews)
        .service(save_review)
        .service(sync_user_data);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Correlate)
        .service(auth_scope)
        .service(user_scope)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Open the database, migrate it, and start the listener.
///
/// Readiness flips only after the pool and migrations succeed, so probes
/// stay 503 while the schema is catching up.
///
/// # Errors
///
/// Propagates [`io::Error`] when the pool cannot be built, migrations fail,
/// or the socket cannot be bound.
pub fn create_server(health_state: web::Data<HealthState>, config: AppConfig) -> io::Result<Server> {
    let pool = DbPool::new(PoolConfig::new(config.database_url())).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let http_state = build_http_state(&pool, &config);
    let bind_addr = config.bind_addr();
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
