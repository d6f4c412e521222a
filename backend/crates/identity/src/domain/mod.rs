//! Domain Layer
//!
//! Contains the credential entity, value objects and the store contract.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::credential::Credential;
pub use repository::{StoreError, StoreResult, UserStore};
pub use value_object::{user_name::UserName, user_password::RawPassword};
