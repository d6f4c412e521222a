//! Repository Traits
//!
//! The store contract the core consumes. Implementations live in `infra`.
//!
//! `insert` is the only guard against duplicate accounts: it must fail with
//! [`StoreError::AlreadyExists`] atomically with respect to concurrent inserts
//! of the same username. `exists` is a fast path for a friendly error and is
//! never relied on for correctness.

use thiserror::Error;

use crate::domain::entity::credential::Credential;
use crate::domain::value_object::user_name::UserName;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store failure modes
#[derive(Debug, Error)]
pub enum StoreError {
    /// Conditional insert rejected: the username is taken
    #[error("Record already exists")]
    AlreadyExists,

    /// Point lookup found nothing
    #[error("Record not found")]
    NotFound,

    /// Backend unreachable or returned an unexpected fault
    #[error("Store backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

/// Credential store keyed by username
#[trait_variant::make(UserStore: Send)]
pub trait LocalUserStore {
    /// Check if a record exists for the username
    async fn exists(&self, username: &UserName) -> StoreResult<bool>;

    /// Insert only if the username is absent
    async fn insert(&self, credential: &Credential) -> StoreResult<()>;

    /// Point lookup; `Err(StoreError::NotFound)` when absent
    async fn get(&self, username: &UserName) -> StoreResult<Credential>;
}
