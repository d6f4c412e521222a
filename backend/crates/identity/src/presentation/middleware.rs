//! Bearer Token Middleware
//!
//! Guards routes behind `Authorization: Bearer <token>`.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;

use platform::token::TOKEN_TYPE;

use crate::application::{TokenSubject, VerifyTokenUseCase};
use crate::domain::repository::UserStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::handlers::IdentityState;

/// Verified caller, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenSubject);

/// Middleware that requires a valid access token
pub async fn require_bearer_token<S>(
    State(state): State<IdentityState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> AuthResult<Response>
where
    S: UserStore + Send + Sync + 'static,
{
    let token = bearer_token(req.headers()).ok_or(AuthError::InvalidToken)?;

    let subject = VerifyTokenUseCase::new(state.issuer.clone()).execute(token)?;

    tracing::debug!(username = %subject.username, "Access token accepted");

    req.extensions_mut().insert(AuthenticatedUser(subject));

    Ok(next.run(req).await)
}

/// Token from the `Authorization` header; the scheme is case-insensitive
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case(TOKEN_TYPE) {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
