use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the authentication flow.
///
/// Every variant maps to a per-request 4xx/5xx response; nothing here is
/// fatal to the process and nothing is retried server-side.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials!")]
    InvalidCredentials,

    #[error("User not found!")]
    UserNotFound,

    #[error("Email already exists!")]
    EmailAlreadyExists,

    #[error("Please verify your email!")]
    NotVerified,

    #[error("Please use social login!")]
    UseSocialLogin,

    #[error("You are not authorized to perform this action")]
    NotAuthorized,

    #[error("Authentication invalid")]
    Unauthenticated,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenMalformed,

    #[error("Session has been revoked")]
    SessionRevoked,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::UserNotFound
            | AuthError::EmailAlreadyExists
            | AuthError::NotVerified
            | AuthError::UseSocialLogin
            | AuthError::Validation(_) => StatusCode::BAD_REQUEST,

            AuthError::NotAuthorized
            | AuthError::Unauthenticated
            | AuthError::TokenExpired
            | AuthError::TokenMalformed
            | AuthError::SessionRevoked => StatusCode::UNAUTHORIZED,

            AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        // 23505 = unique_violation. The only user-facing unique constraint
        // is the lowercased email index, so a concurrent duplicate insert
        // that slips past the pre-check still reports as a duplicate email.
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                return AuthError::EmailAlreadyExists;
            }
        }
        AuthError::Database(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AuthError::Internal(format!("password hashing failed: {err}"))
    }
}

impl From<token_codec::CodecError> for AuthError {
    fn from(err: token_codec::CodecError) -> Self {
        AuthError::Internal(format!("token signing failed: {err}"))
    }
}
