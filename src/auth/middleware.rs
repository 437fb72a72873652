// Bearer token extraction for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;

use crate::auth::{error::AuthError, models::UserId, token::TokenService};
use crate::error::ApiError;

/// The authenticated principal, derived from a verified access token.
///
/// Handlers take this as an argument and pass `user_id` explicitly to the
/// services.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl AuthenticatedUser {
    /// Resolve the principal from an `Authorization` header value
    pub fn from_header(value: Option<&str>, tokens: &TokenService) -> Result<Self, AuthError> {
        let value = value.ok_or(AuthError::MissingToken)?;

        let token = value.strip_prefix("Bearer ").ok_or_else(|| {
            debug!("Authorization header missing 'Bearer ' prefix");
            AuthError::InvalidAccessToken
        })?;

        let claims = tokens.verify_access_token(token)?;
        let user_id = claims.user_id().ok_or(AuthError::InvalidAccessToken)?;

        Ok(Self { user_id })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);

        let header_value = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidAccessToken)?),
            None => None,
        };

        Ok(Self::from_header(header_value, &tokens)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use proptest::prelude::*;

    use crate::auth::token::{Claims, TokenKind};

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(SECRET))
    }

    fn create_parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    fn create_parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    async fn extract(parts: &mut Parts, tokens: &Arc<TokenService>) -> Result<AuthenticatedUser, ApiError> {
        AuthenticatedUser::from_request_parts(parts, tokens).await
    }

    #[tokio::test]
    async fn test_valid_access_token_is_accepted() {
        let tokens = test_token_service();
        let user_id = UserId::new();
        let access = tokens.issue_access_token(user_id).unwrap();

        let mut parts = create_parts_with_auth(&format!("Bearer {}", access.token));
        let user = extract(&mut parts, &tokens).await.unwrap();

        assert_eq!(user.user_id, user_id);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_a_bearer_token() {
        let tokens = test_token_service();
        let refresh = tokens.issue_refresh_token(UserId::new()).unwrap();

        let mut parts = create_parts_with_auth(&format!("Bearer {}", refresh.token));
        let result = extract(&mut parts, &tokens).await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let tokens = test_token_service();
        let claims = Claims {
            sub: UserId::new().to_string(),
            typ: TokenKind::Access,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: Utc::now().timestamp() - 1000,
            exp: Utc::now().timestamp() - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let mut parts = create_parts_with_auth(&format!("Bearer {}", token));
        let result = extract(&mut parts, &tokens).await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let tokens = test_token_service();
        let mut parts = create_parts_without_auth();

        match extract(&mut parts, &tokens).await {
            Err(ApiError::Unauthorized(message)) => {
                assert_eq!(message, "Missing authentication token")
            }
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_bearer_format() {
        let tokens = test_token_service();
        let access = tokens.issue_access_token(UserId::new()).unwrap();

        let invalid_formats = vec![
            access.token.clone(),
            format!("Basic {}", access.token),
            format!("bearer {}", access.token),
            "Basic dXNlcjpwYXNz".to_string(),
            String::new(),
        ];

        for auth_value in invalid_formats {
            let mut parts = create_parts_with_auth(&auth_value);
            assert!(extract(&mut parts, &tokens).await.is_err());
        }
    }

    proptest! {
        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let tokens = test_token_service();
            let result = AuthenticatedUser::from_header(
                Some(format!("Bearer {}", malformed).as_str()),
                &tokens,
            );
            prop_assert!(matches!(result, Err(AuthError::InvalidAccessToken)));
        }
    }
}
