//! Register Use Case
//!
//! Creates a new credential record.
//!
//! Sequence:
//! 1. Reject empty username or password without touching the store
//! 2. `exists` for a fast, friendly conflict
//! 3. Hash the password
//! 4. Conditional `insert`, the only guard against concurrent duplicates

use std::sync::Arc;

use platform::password::CredentialHasher;

use crate::domain::entity::credential::Credential;
use crate::domain::repository::UserStore;
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub username: String,
}

/// Register use case
pub struct RegisterUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    hasher: Arc<CredentialHasher>,
}

impl<S> RegisterUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, hasher: Arc<CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let username = UserName::new(input.username)?;
        let password = RawPassword::new(input.password)?;

        if self
            .store
            .exists(&username)
            .await
            .map_err(|e| AuthError::store("exists", e))?
        {
            tracing::debug!(username = %username, "Registration rejected: username taken");
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.hasher.hash(password.inner())?;
        drop(password);

        let credential = Credential::new(username, password_hash);

        // Losing a race with a concurrent registration lands here as AlreadyExists
        self.store
            .insert(&credential)
            .await
            .map_err(|e| AuthError::store("insert", e))?;

        tracing::info!(username = %credential.username, "User registered");

        Ok(RegisterOutput {
            username: credential.username.into_inner(),
        })
    }
}
