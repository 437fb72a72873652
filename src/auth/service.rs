// Authentication service - session lifecycle orchestration

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::{
    error::AuthError,
    models::{TokenPair, User, UserId},
    password::PasswordHasher,
    repository::{hash_token, RefreshTokenRepository, UserRepository},
    token::TokenService,
};

/// Coordinates the credential store, password hasher, token signer and
/// refresh token ledger.
///
/// Refresh tokens form a single-use chain: every successful refresh consumes
/// the presented token's ledger record before a replacement is issued, so a
/// spent token can never be exchanged again.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            password_hasher,
            token_service,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }

    /// Register a new user
    ///
    /// The email is trimmed before the uniqueness check and before storage.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();

        if self.users.find_by_email(email).await?.is_some() {
            debug!("Registration rejected: email already taken");
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = self.password_hasher.hash(password)?;
        let user = self.users.create(email, &password_hash).await?;

        info!("User registered: user_id={}", user.id);
        Ok(user)
    }

    /// Login a user
    ///
    /// The email is matched exactly as supplied. An unknown email and a wrong
    /// password fail with the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                self.password_hasher.verify_dummy(password);
                debug!("Login rejected: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.password_hasher.verify(password, &user.password_hash) {
            warn!("Login rejected: wrong password for user_id={}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(user.id).await?;

        info!("User logged in: user_id={}", user.id);
        Ok(tokens)
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// 1. Verify signature, expiry and token kind
    /// 2. Load the token's subject
    /// 3. Require an active ledger record for the token's digest
    /// 4. Consume that record; losing a concurrent race counts as unrecognized
    /// 5. Issue and record a replacement pair
    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.token_service.verify_refresh_token(raw_refresh_token)?;

        let user_id = claims.user_id().ok_or(AuthError::UnknownTokenSubject)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UnknownTokenSubject)?;

        let token_hash = hash_token(raw_refresh_token);
        if self
            .refresh_tokens
            .find_active(user.id, &token_hash)
            .await?
            .is_none()
        {
            warn!("Refresh rejected: unrecognized token for user_id={}", user.id);
            return Err(AuthError::RefreshTokenNotRecognized);
        }

        if !self.refresh_tokens.consume(user.id, &token_hash).await? {
            warn!("Refresh rejected: token consumed concurrently for user_id={}", user.id);
            return Err(AuthError::RefreshTokenNotRecognized);
        }

        let tokens = self.issue_tokens(user.id).await?;

        info!("Tokens refreshed: user_id={}", user.id);
        Ok(tokens)
    }

    /// Get the user behind an authenticated principal
    pub async fn current_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidAccessToken)
    }

    /// Sign a new pair and record the refresh token's digest
    async fn issue_tokens(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let access = self.token_service.issue_access_token(user_id)?;
        let refresh = self.token_service.issue_refresh_token(user_id)?;

        self.refresh_tokens
            .store(user_id, &hash_token(&refresh.token), refresh.expires_at)
            .await?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }
}
