//! Identity Credential Core
//!
//! Clean Architecture structure:
//! - `domain/` - Credential record, value objects, the `UserStore` contract
//! - `application/` - Registration, authentication and token verification
//! - `infra/` - `UserStore` adapters (in-memory, PostgreSQL)
//! - `presentation/` - JSON handlers, DTOs, router, bearer middleware
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; plaintext is zeroized after use
//! - Duplicate accounts prevented by the store's conditional insert
//! - Unknown user and wrong password share one error and one code path
//! - Tokens are HS256 JWTs with a fixed lifetime; signing failures are errors

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryUserStore, postgres::PgUserStore};
pub use presentation::{IdentityState, identity_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
