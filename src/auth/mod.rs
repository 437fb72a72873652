// Authentication module
// Password verification, access/refresh token issuance and single-use refresh rotation

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod sweeper;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, me_handler, refresh_handler, register_handler};
pub use middleware::AuthenticatedUser;
pub use models::{
    LoginRequest, RefreshRequest, RefreshTokenRecord, RegisterRequest, TokenPair, User, UserId,
    UserResponse,
};
pub use password::{PasswordHasher, PasswordService};
pub use repository::{
    hash_token, PgRefreshTokenRepository, PgUserRepository, RefreshTokenRepository, UserRepository,
};
pub use service::AuthService;
pub use token::{Claims, TokenKind, TokenService};
