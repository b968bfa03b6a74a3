//! Domain ports: trait seams between the services and the adapters.

pub(crate) mod macros;

mod annotation_repository;
mod password_hasher;
mod token_service;
mod user_repository;

pub use annotation_repository::{AnnotationRepository, AnnotationRepositoryError};
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use token_service::{AccessTokenClaims, TokenIssueError, TokenService, TokenVerifyError};
pub use user_repository::{UserRepository, UserRepositoryError};
