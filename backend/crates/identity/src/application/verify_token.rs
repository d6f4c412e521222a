//! Verify Token Use Case
//!
//! Resolves a bearer token to the username it was issued for.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::token::TokenIssuer;

use crate::error::AuthResult;

/// Authenticated subject of a valid token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

pub struct VerifyTokenUseCase {
    issuer: Arc<TokenIssuer>,
}

impl VerifyTokenUseCase {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    pub fn execute(&self, token: &str) -> AuthResult<TokenSubject> {
        self.execute_at(token, Utc::now())
    }

    /// Verify against an explicit clock
    pub fn execute_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<TokenSubject> {
        let claims = self.issuer.verify_at(token, now)?;
        Ok(TokenSubject {
            expires_at: claims.expires_at(),
            username: claims.sub,
        })
    }
}
