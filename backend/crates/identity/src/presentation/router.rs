//! Identity Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::domain::repository::UserStore;
use crate::presentation::handlers::{self, IdentityState};
use crate::presentation::middleware::require_bearer_token;

/// Create the identity router for any store implementation
pub fn identity_router<S>(state: IdentityState<S>) -> Router
where
    S: UserStore + Send + Sync + 'static,
{
    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token::<S>,
        ))
        .route("/register", post(handlers::register::<S>))
        .route("/login", post(handlers::login::<S>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::infra::memory::InMemoryUserStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use platform::token::SigningKey;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = IdentityState::from_config(
            InMemoryUserStore::new(),
            &AuthConfig::for_tests(),
            Some(SigningKey::generate()),
        )
        .unwrap();
        identity_router(state)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_me(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri("/me");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_register_login_me() {
        let app = app();
        let creds = json!({"username": "alice", "password": "s3cret!"});

        let (status, body) = send(&app, post_json("/register", creds.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "alice");

        let (status, body) = send(&app, post_json("/login", creds)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokenType"], "Bearer");
        assert!(body["expiresAt"].is_string());
        let token = body["accessToken"].as_str().unwrap().to_string();

        let (status, body) = send(&app, get_me(Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
    }

    #[tokio::test]
    async fn test_duplicate_register_is_conflict() {
        let app = app();
        let creds = json!({"username": "alice", "password": "s3cret!"});

        send(&app, post_json("/register", creds.clone())).await;
        let (status, body) = send(&app, post_json("/register", creds)).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], 409);
    }

    #[tokio::test]
    async fn test_empty_register_is_bad_request() {
        let app = app();
        let (status, _) = send(
            &app,
            post_json("/register", json!({"username": "", "password": "pw"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_failures_share_one_response() {
        let app = app();
        send(
            &app,
            post_json("/register", json!({"username": "alice", "password": "s3cret!"})),
        )
        .await;

        let wrong = send(
            &app,
            post_json("/login", json!({"username": "alice", "password": "nope"})),
        )
        .await;
        let unknown = send(
            &app,
            post_json("/login", json!({"username": "bob", "password": "nope"})),
        )
        .await;

        assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong, unknown);
    }

    #[tokio::test]
    async fn test_me_requires_valid_token() {
        let app = app();

        let (status, _) = send(&app, get_me(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, get_me(Some("garbage"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_without_key_is_internal_error() {
        let state =
            IdentityState::from_config(InMemoryUserStore::new(), &AuthConfig::for_tests(), None)
                .unwrap();
        let app = identity_router(state);
        let creds = json!({"username": "alice", "password": "s3cret!"});

        let (status, _) = send(&app, post_json("/register", creds.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, post_json("/login", creds)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("accessToken").is_none());
    }
}
