// Authentication error types

use crate::error::ErrorKind;

/// Failures raised by the session lifecycle: registration, login, refresh and
/// bearer-token extraction.
///
/// Variants are fine-grained so logs and tests can tell the cases apart, but
/// [`AuthError::public_message`] collapses them to one string per endpoint so
/// clients cannot tell which check failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("A user with that email already exists.")]
    EmailAlreadyExists,

    /// Unknown email or wrong password
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Bad signature, expired, malformed, or not a refresh token
    #[error("Invalid or expired refresh token.")]
    InvalidRefreshToken,

    #[error("User not found for the provided token.")]
    UnknownTokenSubject,

    /// Signature is valid but the ledger holds no matching record
    #[error("Refresh token not recognized. It may have been used or expired.")]
    RefreshTokenNotRecognized,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid access token")]
    InvalidAccessToken,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailAlreadyExists => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::UnknownTokenSubject
            | AuthError::RefreshTokenNotRecognized
            | AuthError::MissingToken
            | AuthError::InvalidAccessToken => ErrorKind::Unauthorized,
            AuthError::PasswordHash(_) | AuthError::TokenGeneration(_) | AuthError::Store(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Message that is safe to send to clients
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::EmailAlreadyExists => "A user with that email already exists.",
            AuthError::InvalidCredentials => "Invalid credentials.",
            AuthError::InvalidRefreshToken
            | AuthError::UnknownTokenSubject
            | AuthError::RefreshTokenNotRecognized => "Invalid or expired refresh token.",
            AuthError::MissingToken => "Missing authentication token",
            AuthError::InvalidAccessToken => "Invalid access token",
            AuthError::PasswordHash(_) | AuthError::TokenGeneration(_) | AuthError::Store(_) => {
                "Internal server error"
            }
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Store(err.to_string())
    }
}
