// JWT token issuance and verification

use crate::auth::{error::AuthError, models::UserId};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Default access token lifetime: 15 minutes
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 900;
/// Default refresh token lifetime: 7 days
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 604_800;

/// Discriminates access from refresh tokens so neither can stand in for the
/// other, independent of the ledger check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // user id
    pub typ: TokenKind,
    pub jti: String,     // random per token
    pub iat: i64,        // issued at timestamp
    pub exp: i64,        // expiration timestamp
}

impl Claims {
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }
}

/// A freshly signed token and the instant it stops verifying
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Token service for JWT operations
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    leeway_secs: u64,
}

impl TokenService {
    /// Create a TokenService with the default lifetimes and no clock-skew leeway
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl: Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECS),
            refresh_token_ttl: Duration::seconds(DEFAULT_REFRESH_TOKEN_TTL_SECS),
            leeway_secs: 0,
        }
    }

    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_token_ttl = access;
        self.refresh_token_ttl = refresh;
        self
    }

    /// Tolerated clock skew when checking `exp`
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    pub fn issue_access_token(&self, user_id: UserId) -> Result<IssuedToken, AuthError> {
        self.issue(user_id, TokenKind::Access, self.access_token_ttl)
    }

    pub fn issue_refresh_token(&self, user_id: UserId) -> Result<IssuedToken, AuthError> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_token_ttl)
    }

    fn issue(&self, user_id: UserId, kind: TokenKind, ttl: Duration) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::TokenGeneration(format!("{:?} token lifetime overflows", kind)))?;

        let claims = Claims {
            sub: user_id.to_string(),
            typ: kind,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a bearer access token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, TokenKind::Access)
            .map_err(|_| AuthError::InvalidAccessToken)
    }

    /// Verify signature, expiry and kind of a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, TokenKind::Refresh)
            .map_err(|_| AuthError::InvalidRefreshToken)
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, ()> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => debug!("Rejected expired {:?} token", expected),
                JwtErrorKind::InvalidSignature => debug!("Rejected {:?} token with bad signature", expected),
                other => debug!("Rejected malformed {:?} token: {:?}", expected, other),
            })?;

        if claims.typ != expected {
            debug!("Rejected {:?} token presented as {:?}", claims.typ, expected);
            return Err(());
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_token_service() -> TokenService {
        TokenService::new(SECRET)
    }

    fn encode_claims(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn claims_expiring_at(exp: i64, typ: TokenKind) -> Claims {
        Claims {
            sub: UserId::new().to_string(),
            typ,
            jti: Uuid::new_v4().to_string(),
            iat: exp - 1000,
            exp,
        }
    }

    #[test]
    fn test_access_token_expiration_is_15_minutes() {
        let service = test_token_service();
        let issued = service.issue_access_token(UserId::new()).unwrap();
        let claims = service.verify_access_token(&issued.token).unwrap();

        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_refresh_token_expiration_is_7_days() {
        let service = test_token_service();
        let issued = service.issue_refresh_token(UserId::new()).unwrap();
        let claims = service.verify_refresh_token(&issued.token).unwrap();

        assert_eq!(claims.exp - claims.iat, 604800);
    }

    #[test]
    fn test_claims_carry_subject() {
        let service = test_token_service();
        let user_id = UserId::new();

        let refresh = service.issue_refresh_token(user_id).unwrap();
        let claims = service.verify_refresh_token(&refresh.token).unwrap();

        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.typ, TokenKind::Refresh);
    }

    #[test]
    fn test_tokens_issued_back_to_back_differ() {
        let service = test_token_service();
        let user_id = UserId::new();

        let first = service.issue_refresh_token(user_id).unwrap();
        let second = service.issue_refresh_token(user_id).unwrap();

        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let service = test_token_service();
        let access = service.issue_access_token(UserId::new()).unwrap();

        assert!(matches!(
            service.verify_refresh_token(&access.token),
            Err(AuthError::InvalidRefreshToken)
        ));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let service = test_token_service();
        let refresh = service.issue_refresh_token(UserId::new()).unwrap();

        assert!(matches!(
            service.verify_access_token(&refresh.token),
            Err(AuthError::InvalidAccessToken)
        ));
    }

    #[test]
    fn test_expired_refresh_token_is_rejected() {
        let service = test_token_service();
        let expired = encode_claims(&claims_expiring_at(
            Utc::now().timestamp() - 5,
            TokenKind::Refresh,
        ));

        assert!(matches!(
            service.verify_refresh_token(&expired),
            Err(AuthError::InvalidRefreshToken)
        ));
    }

    #[test]
    fn test_leeway_is_opt_in() {
        let token = encode_claims(&claims_expiring_at(
            Utc::now().timestamp() - 5,
            TokenKind::Refresh,
        ));

        assert!(test_token_service().verify_refresh_token(&token).is_err());
        assert!(test_token_service()
            .with_leeway(60)
            .verify_refresh_token(&token)
            .is_ok());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1");
        let service2 = TokenService::new("secret2");

        let token = service1.issue_refresh_token(UserId::new()).unwrap().token;

        assert!(service1.verify_refresh_token(&token).is_ok());
        assert!(service2.verify_refresh_token(&token).is_err());
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.verify_refresh_token("").is_err());
        assert!(service.verify_refresh_token("not.a.token").is_err());
        assert!(service.verify_access_token("invalid_token_format").is_err());
        assert!(service
            .verify_access_token("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_custom_lifetimes() {
        let service = test_token_service()
            .with_lifetimes(Duration::seconds(60), Duration::seconds(120));

        let access = service.issue_access_token(UserId::new()).unwrap();
        let claims = service.verify_access_token(&access.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 60);
        assert_eq!(service.refresh_token_ttl(), Duration::seconds(120));
    }

    #[test]
    fn test_overflowing_lifetime_is_an_error() {
        let service = test_token_service()
            .with_lifetimes(Duration::seconds(60), Duration::weeks(1_000_000_000));

        assert!(service.issue_access_token(UserId::new()).is_ok());
        assert!(matches!(
            service.issue_refresh_token(UserId::new()),
            Err(AuthError::TokenGeneration(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_refresh_tokens_verify_with_their_subject(seed in any::<u128>()) {
            let user_id: UserId = Uuid::from_u128(seed).to_string().parse().unwrap();
            let service = test_token_service();

            let issued = service.issue_refresh_token(user_id)?;
            let claims = service.verify_refresh_token(&issued.token)?;
            prop_assert_eq!(claims.user_id(), Some(user_id));
            prop_assert_eq!(claims.exp - claims.iat, 604800);
        }

        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.verify_refresh_token(&malformed).is_err());
            prop_assert!(service.verify_access_token(&malformed).is_err());
        }
    }
}
