//! Authenticate Use Case
//!
//! Verifies a username/password pair and issues an access token.
//!
//! Unknown users are verified against the hasher's placeholder hash instead
//! of returning early, and every mismatch ends in the same
//! [`AuthError::AuthenticationFailed`]. An observer learns nothing about
//! whether the username exists, from either the error or the latency.

use std::sync::Arc;

use platform::password::{CredentialHasher, HashedPassword};
use platform::token::{IssuedToken, TokenIssuer};

use crate::domain::repository::{StoreError, UserStore};
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Authenticate input
pub struct AuthenticateInput {
    pub username: String,
    pub password: String,
}

/// Authenticate output
#[derive(Debug)]
pub struct AuthenticateOutput {
    pub token: IssuedToken,
}

/// Authenticate use case
pub struct AuthenticateUseCase<S>
where
    S: UserStore,
{
    store: Arc<S>,
    hasher: Arc<CredentialHasher>,
    issuer: Arc<TokenIssuer>,
}

impl<S> AuthenticateUseCase<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, hasher: Arc<CredentialHasher>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            store,
            hasher,
            issuer,
        }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> AuthResult<AuthenticateOutput> {
        let password = RawPassword::for_verification(input.password);
        let username = UserName::new(input.username).ok();

        let stored_hash = match &username {
            Some(name) => self.lookup(name).await?,
            None => None,
        };

        let verified = match &stored_hash {
            Some(hash) => {
                if !hash.is_well_formed() {
                    tracing::error!(
                        username = ?username.as_ref().map(UserName::as_str),
                        "Stored password hash is malformed"
                    );
                }
                self.hasher.verify(hash, password.inner())
            }
            None => {
                // Same cost as a real check; can never succeed
                let _ = self
                    .hasher
                    .verify(self.hasher.placeholder_hash(), password.inner());
                false
            }
        };
        drop(password);

        let username = match (verified, username) {
            (true, Some(name)) => name,
            _ => return Err(AuthError::AuthenticationFailed),
        };

        let token = self.issuer.issue(username.as_str())?;

        tracing::info!(username = %username, "User signed in");

        Ok(AuthenticateOutput { token })
    }

    /// Stored hash, or `None` when the user does not exist
    async fn lookup(&self, username: &UserName) -> AuthResult<Option<HashedPassword>> {
        match self.store.get(username).await {
            Ok(credential) => Ok(Some(credential.password_hash)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(AuthError::store("get", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::register::{RegisterInput, RegisterUseCase};
    use crate::domain::entity::credential::Credential;
    use crate::domain::repository::StoreResult;
    use crate::infra::memory::InMemoryUserStore;
    use platform::password::HashingCost;
    use platform::token::{DEFAULT_TOKEN_TTL, SigningKey};
    use std::time::{Duration, Instant};

    /// Store whose backend is down
    struct FailingStore;

    impl UserStore for FailingStore {
        async fn exists(&self, _: &UserName) -> StoreResult<bool> {
            Err(StoreError::backend(std::io::Error::other("timeout")))
        }

        async fn insert(&self, _: &Credential) -> StoreResult<()> {
            Err(StoreError::backend(std::io::Error::other("timeout")))
        }

        async fn get(&self, _: &UserName) -> StoreResult<Credential> {
            Err(StoreError::backend(std::io::Error::other("timeout")))
        }
    }

    struct Fixture {
        store: Arc<InMemoryUserStore>,
        hasher: Arc<CredentialHasher>,
        issuer: Arc<TokenIssuer>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(InMemoryUserStore::new()),
                hasher: Arc::new(CredentialHasher::new(HashingCost::for_tests()).unwrap()),
                issuer: Arc::new(TokenIssuer::new(SigningKey::generate(), DEFAULT_TOKEN_TTL)),
            }
        }

        async fn register(&self, username: &str, password: &str) {
            RegisterUseCase::new(self.store.clone(), self.hasher.clone())
                .execute(RegisterInput {
                    username: username.to_string(),
                    password: password.to_string(),
                })
                .await
                .unwrap();
        }

        async fn authenticate(&self, username: &str, password: &str) -> AuthResult<IssuedToken> {
            AuthenticateUseCase::new(self.store.clone(), self.hasher.clone(), self.issuer.clone())
                .execute(AuthenticateInput {
                    username: username.to_string(),
                    password: password.to_string(),
                })
                .await
                .map(|output| output.token)
        }
    }

    #[tokio::test]
    async fn test_success_issues_token_for_subject() {
        let fx = Fixture::new();
        fx.register("alice", "s3cret!").await;

        let token = fx.authenticate("alice", "s3cret!").await.unwrap();
        assert_eq!(token.subject(), "alice");

        let claims = fx.issuer.verify(token.as_str()).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_identical() {
        let fx = Fixture::new();
        fx.register("alice", "s3cret!").await;

        let wrong = fx.authenticate("alice", "wrong").await.unwrap_err();
        let unknown = fx.authenticate("bob", "anything").await.unwrap_err();

        assert!(matches!(wrong, AuthError::AuthenticationFailed));
        assert!(matches!(unknown, AuthError::AuthenticationFailed));
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert_eq!(wrong.kind(), unknown.kind());
        assert_eq!(
            wrong.to_app_error().to_string(),
            unknown.to_app_error().to_string()
        );
    }

    #[tokio::test]
    async fn test_empty_fields_fail_like_wrong_credentials() {
        let fx = Fixture::new();
        fx.register("alice", "s3cret!").await;

        for (username, password) in [("", "s3cret!"), ("alice", ""), ("", "")] {
            let err = fx.authenticate(username, password).await.unwrap_err();
            assert!(matches!(err, AuthError::AuthenticationFailed));
        }
    }

    #[tokio::test]
    async fn test_malformed_stored_hash_is_a_mismatch() {
        let fx = Fixture::new();
        let name = UserName::new("legacy").unwrap();
        fx.store
            .insert(&Credential::new(
                name,
                HashedPassword::from_phc_string("plaintext-from-old-system"),
            ))
            .await
            .unwrap();

        let err = fx
            .authenticate("legacy", "plaintext-from-old-system")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_missing_signing_key_is_signing_error() {
        let fx = Fixture {
            issuer: Arc::new(TokenIssuer::without_key(DEFAULT_TOKEN_TTL)),
            ..Fixture::new()
        };
        fx.register("alice", "s3cret!").await;

        let err = fx.authenticate("alice", "s3cret!").await.unwrap_err();
        assert!(matches!(err, AuthError::Signing(_)));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_storage_error() {
        let fx = Fixture::new();
        let use_case =
            AuthenticateUseCase::new(Arc::new(FailingStore), fx.hasher.clone(), fx.issuer.clone());

        let err = use_case
            .execute(AuthenticateInput {
                username: "alice".to_string(),
                password: "s3cret!".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthError::Storage {
                operation: "get",
                source: StoreError::Backend(_),
            }
        ));
    }

    #[tokio::test]
    async fn test_malformed_hash_and_unknown_user_take_equal_work() {
        let fx = Fixture {
            hasher: Arc::new(
                CredentialHasher::new(HashingCost {
                    memory_kib: 8192,
                    iterations: 2,
                    parallelism: 1,
                })
                .unwrap(),
            ),
            ..Fixture::new()
        };
        fx.store
            .insert(&Credential::new(
                UserName::new("legacy").unwrap(),
                HashedPassword::from_phc_string("corrupt"),
            ))
            .await
            .unwrap();

        async fn fastest(fx: &Fixture, username: &str) -> Duration {
            let mut best = Duration::MAX;
            for _ in 0..3 {
                let started = Instant::now();
                let err = fx.authenticate(username, "password").await.unwrap_err();
                assert!(matches!(err, AuthError::AuthenticationFailed));
                best = best.min(started.elapsed());
            }
            best
        }

        let unknown = fastest(&fx, "ghost").await;
        let malformed = fastest(&fx, "legacy").await;

        assert!(
            malformed * 4 >= unknown,
            "malformed={malformed:?} unknown={unknown:?}"
        );
    }
}
