//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;
use serde_json::json;

use crate::domain::DomainError;

pub mod annotations;
pub mod auth;
pub mod error;
pub mod health;
pub mod profile;
pub mod schemas;
pub mod session;
pub mod state;
pub mod sync;

pub use error::ApiResult;

/// JSON extractor configuration that reports malformed bodies through the
/// standard error envelope instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        DomainError::validation("Invalid JSON payload")
            .with_details(json!({ "reason": err.to_string() }))
            .into()
    })
}
