//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod register;
pub mod verify_token;

// Re-exports
pub use authenticate::{AuthenticateInput, AuthenticateOutput, AuthenticateUseCase};
pub use config::AuthConfig;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use verify_token::{TokenSubject, VerifyTokenUseCase};
