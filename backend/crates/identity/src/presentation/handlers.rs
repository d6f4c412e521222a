//! HTTP Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

use platform::password::{CredentialHasher, PasswordHashError};
use platform::token::{SigningKey, TOKEN_TYPE, TokenIssuer};

use crate::application::config::AuthConfig;
use crate::application::{AuthenticateInput, AuthenticateUseCase, RegisterInput, RegisterUseCase};
use crate::domain::repository::UserStore;
use crate::error::AuthResult;
use crate::presentation::dto::{CredentialsRequest, LoginResponse, MeResponse, RegisterResponse};
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for identity handlers
pub struct IdentityState<S>
where
    S: UserStore + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub hasher: Arc<CredentialHasher>,
    pub issuer: Arc<TokenIssuer>,
}

// Derive would demand `S: Clone`
impl<S> Clone for IdentityState<S>
where
    S: UserStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            hasher: self.hasher.clone(),
            issuer: self.issuer.clone(),
        }
    }
}

impl<S> IdentityState<S>
where
    S: UserStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, hasher: Arc<CredentialHasher>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            store,
            hasher,
            issuer,
        }
    }

    /// Build hasher and issuer from configuration
    pub fn from_config(
        store: S,
        config: &AuthConfig,
        key: Option<SigningKey>,
    ) -> Result<Self, PasswordHashError> {
        Ok(Self::new(
            Arc::new(store),
            Arc::new(config.build_hasher()?),
            Arc::new(config.build_issuer(key)),
        ))
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<S>(
    State(state): State<IdentityState<S>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.store.clone(), state.hasher.clone());

    let output = use_case
        .execute(RegisterInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered".to_string(),
            username: output.username,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<S>(
    State(state): State<IdentityState<S>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    S: UserStore + Send + Sync + 'static,
{
    let use_case = AuthenticateUseCase::new(
        state.store.clone(),
        state.hasher.clone(),
        state.issuer.clone(),
    );

    let output = use_case
        .execute(AuthenticateInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    let expires_at = output.token.expires_at();

    Ok(Json(LoginResponse {
        access_token: output.token.into_string(),
        token_type: TOKEN_TYPE,
        expires_at,
    }))
}

// ============================================================================
// Me
// ============================================================================

/// GET /me
pub async fn me(
    Extension(AuthenticatedUser(subject)): Extension<AuthenticatedUser>,
) -> Json<MeResponse> {
    Json(MeResponse {
        username: subject.username,
        expires_at: subject.expires_at,
    })
}
