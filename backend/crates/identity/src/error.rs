//! Identity Error Types
//!
//! Error taxonomy of the credential core, integrated with the unified
//! `kernel::error::AppError` at the transport boundary.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use platform::token::TokenError;
use thiserror::Error;

use crate::domain::repository::StoreError;
use crate::domain::value_object::user_name::UserNameError;

/// Identity result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or empty request field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Username already registered
    #[error("User already exists")]
    AlreadyExists,

    /// Record missing. Internal only: authentication never surfaces it.
    #[error("User not found")]
    NotFound,

    /// Wrong password or unknown user, deliberately indistinguishable
    #[error("Invalid credentials")]
    AuthenticationFailed,

    /// Store unavailable or faulted
    #[error("Storage error during {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordHashError),

    /// Token could not be signed
    #[error("Token signing failed: {0}")]
    Signing(#[source] TokenError),

    /// Token rejected (bad signature, malformed or expired)
    #[error("Invalid or expired token")]
    InvalidToken,
}

impl AuthError {
    /// Wrap a store failure with the operation it interrupted.
    ///
    /// A rejected conditional insert is the registration conflict itself and
    /// maps to [`AuthError::AlreadyExists`].
    pub fn store(operation: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::AlreadyExists => AuthError::AlreadyExists,
            StoreError::NotFound => AuthError::NotFound,
            source => AuthError::Storage { operation, source },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidInput(_) => ErrorKind::BadRequest,
            AuthError::AlreadyExists => ErrorKind::Conflict,
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::AuthenticationFailed | AuthError::InvalidToken => ErrorKind::Unauthorized,
            AuthError::Storage { .. } | AuthError::Hashing(_) | AuthError::Signing(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Server-side faults get a generic message; their detail stays in logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::InvalidInput(msg) => AppError::bad_request(msg.clone())
                .with_action("Provide a non-empty username and password"),
            AuthError::AlreadyExists => AppError::conflict("User already exists")
                .with_action("Choose a different username"),
            AuthError::AuthenticationFailed => AppError::unauthorized("Invalid credentials"),
            AuthError::InvalidToken => AppError::unauthorized("Invalid or expired token")
                .with_action("Sign in again"),
            AuthError::NotFound => AppError::new(ErrorKind::NotFound, "Not found"),
            AuthError::Storage { .. } | AuthError::Hashing(_) | AuthError::Signing(_) => {
                AppError::internal("Internal server error")
            }
        }
    }

    /// Like [`AuthError::to_app_error`], keeping the cause as the error source
    pub fn into_app_error(self) -> AppError {
        let app_error = self.to_app_error();
        match self {
            AuthError::Storage { source, .. } => app_error.with_source(source),
            AuthError::Hashing(e) => app_error.with_source(e),
            AuthError::Signing(e) => app_error.with_source(e),
            _ => app_error,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Storage { operation, source } => {
                tracing::error!(operation = *operation, error = %source, "Identity storage error");
            }
            AuthError::Hashing(e) => {
                tracing::error!(error = %e, "Password hashing error");
            }
            AuthError::Signing(e) => {
                tracing::error!(error = %e, "Token signing error");
            }
            AuthError::AuthenticationFailed => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Rejected access token");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken => AuthError::InvalidToken,
            other => AuthError::Signing(other),
        }
    }
}

impl From<UserNameError> for AuthError {
    fn from(err: UserNameError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_mapping() {
        assert!(matches!(
            AuthError::store("insert", StoreError::AlreadyExists),
            AuthError::AlreadyExists
        ));
        assert!(matches!(
            AuthError::store("get", StoreError::NotFound),
            AuthError::NotFound
        ));

        let io = std::io::Error::other("connection refused");
        let err = AuthError::store("exists", StoreError::backend(io));
        assert!(matches!(err, AuthError::Storage { operation: "exists", .. }));
        assert!(err.to_string().contains("exists"));
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(
            AuthError::from(TokenError::InvalidToken),
            AuthError::InvalidToken
        ));
        assert!(matches!(
            AuthError::from(TokenError::MissingKey),
            AuthError::Signing(TokenError::MissingKey)
        ));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AuthError::InvalidInput("x".into()).kind(), ErrorKind::BadRequest);
        assert_eq!(AuthError::AlreadyExists.kind(), ErrorKind::Conflict);
        assert_eq!(AuthError::AuthenticationFailed.kind(), ErrorKind::Unauthorized);
        assert_eq!(AuthError::InvalidToken.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            AuthError::Signing(TokenError::MissingKey).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_server_faults_are_not_echoed() {
        let io = std::io::Error::other("db at 10.0.0.5 refused");
        let err = AuthError::store("get", StoreError::backend(io));
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 500);
        assert!(!app.message().contains("10.0.0.5"));

        let app = err.into_app_error();
        assert!(std::error::Error::source(&app).is_some());
        assert!(!app.to_string().contains("10.0.0.5"));
    }
}
