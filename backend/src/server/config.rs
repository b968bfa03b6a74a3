//! Process configuration read once at startup.
//!
//! Nothing else in the crate reads the environment; every knob lands here
//! and is injected through constructors.

use std::env;
use std::io;
use std::net::SocketAddr;

use tracing::warn;

use crate::domain::auth_service::generate_opaque_token;
use crate::outbound::jwt_token_service::JwtTokenService;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_DATABASE_URL: &str = "eyebridge.db";
const DEFAULT_RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Everything the server needs, resolved before any component starts.
#[derive(Clone)]
pub struct AppConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: String,
    pub(crate) jwt_secret: String,
    pub(crate) token_ttl_secs: i64,
    pub(crate) reset_token_ttl_secs: i64,
}

impl AppConfig {
    /// Read the configuration from environment variables.
    ///
    /// `BIND_ADDR` and `DATABASE_URL` have local-development defaults.
    /// `JWT_SECRET` is mandatory in release builds; debug builds fall back
    /// to an ephemeral secret, which invalidates all tokens on restart.
    /// `TOKEN_TTL_SECS` and `RESET_TOKEN_TTL_SECS` override the built-in
    /// windows and must parse when present.
    ///
    /// # Errors
    ///
    /// Fails with [`io::Error`] on an unparseable address or TTL, or on a
    /// missing `JWT_SECRET` in a release build.
    pub fn from_env() -> io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| io::Error::other(format!("invalid BIND_ADDR: {err}")))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if cfg!(debug_assertions) => {
                warn!("JWT_SECRET is not set, using an ephemeral secret (dev only)");
                generate_opaque_token()
            }
            _ => {
                return Err(io::Error::other("JWT_SECRET must be set"));
            }
        };

        let token_ttl_secs = match env::var("TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|err| io::Error::other(format!("invalid TOKEN_TTL_SECS: {err}")))?,
            Err(_) => JwtTokenService::DEFAULT_TTL_SECS,
        };

        let reset_token_ttl_secs = match env::var("RESET_TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|err| io::Error::other(format!("invalid RESET_TOKEN_TTL_SECS: {err}")))?,
            Err(_) => DEFAULT_RESET_TOKEN_TTL_SECS,
        };

        Ok(Self {
            bind_addr,
            database_url,
            jwt_secret,
            token_ttl_secs,
            reset_token_ttl_secs,
        })
    }

    /// Start from defaults plus an explicit secret, for tests and embedding.
    #[must_use]
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3001))),
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: JwtTokenService::DEFAULT_TTL_SECS,
            reset_token_ttl_secs: DEFAULT_RESET_TOKEN_TTL_SECS,
        }
    }

    #[must_use]
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    #[must_use]
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    #[must_use]
    pub fn with_token_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.token_ttl_secs = ttl_secs;
        self
    }

    #[must_use]
    pub fn with_reset_token_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.reset_token_ttl_secs = ttl_secs;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}
