//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain services and remain testable without real storage.

use std::sync::Arc;

use crate::domain::{AnnotationService, AuthService, SyncService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<AuthService>,
    pub annotations: Arc<AnnotationService>,
    pub sync: Arc<SyncService>,
}

impl HttpState {
    /// Bundle the three workflow services handlers dispatch to.
    pub fn new(
        auth: Arc<AuthService>,
        annotations: Arc<AnnotationService>,
        sync: Arc<SyncService>,
    ) -> Self {
        Self {
            auth,
            annotations,
            sync,
        }
    }
}
