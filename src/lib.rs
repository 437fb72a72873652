// Notes API
// Account registration, token sessions and per-user notes over HTTP

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod memory;
pub mod notes;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{
    AuthService, PasswordService, PgRefreshTokenRepository, PgUserRepository,
    RefreshTokenRepository, TokenService, UserRepository,
};
use crate::config::AppConfig;
use crate::memory::{InMemoryNoteRepository, InMemoryRefreshTokenRepository, InMemoryUserRepository};
use crate::notes::{NoteRepository, NoteService, PgNoteRepository};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::refresh_handler,
        auth::handlers::me_handler,
        notes::handlers::create_note_handler,
        notes::handlers::list_notes_handler,
        notes::handlers::get_note_handler,
        notes::handlers::update_note_handler,
        notes::handlers::delete_note_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::RefreshRequest,
            auth::TokenPair,
            auth::UserResponse,
            notes::NoteRequest,
            notes::NoteResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and token refresh"),
        (name = "notes", description = "Per-user notes")
    ),
    info(
        title = "Notes API",
        version = "1.0.0",
        description = "RESTful API for personal notes with token-based sessions"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Storage backends behind the services
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub notes: Arc<dyn NoteRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            refresh_tokens: Arc::new(InMemoryRefreshTokenRepository::new()),
            notes: Arc::new(InMemoryNoteRepository::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            refresh_tokens: Arc::new(PgRefreshTokenRepository::new(pool.clone())),
            notes: Arc::new(PgNoteRepository::new(pool)),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub note_service: Arc<NoteService>,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(repositories: Repositories, token_service: TokenService) -> Self {
        let token_service = Arc::new(token_service);
        let auth_service = AuthService::new(
            repositories.users,
            repositories.refresh_tokens,
            Arc::new(PasswordService::new()),
            Arc::clone(&token_service),
        );

        Self {
            auth_service: Arc::new(auth_service),
            note_service: Arc::new(NoteService::new(repositories.notes)),
            token_service,
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.token_service)
    }
}

/// Build the token service described by the configuration
pub fn token_service_from_config(config: &AppConfig) -> TokenService {
    TokenService::new(&config.jwt_secret)
        .with_lifetimes(
            chrono::Duration::seconds(config.access_token_ttl_secs),
            chrono::Duration::seconds(config.refresh_token_ttl_secs),
        )
        .with_leeway(config.jwt_leeway_secs)
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds request tracing and CORS
pub fn create_router(state: AppState) -> Router {
    use tower::ServiceBuilder;
    use tower_http::{
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/refresh", post(auth::refresh_handler))
        .route("/api/auth/me", get(auth::me_handler))
        .route(
            "/api/notes",
            post(notes::create_note_handler).get(notes::list_notes_handler),
        )
        .route(
            "/api/notes/:id",
            get(notes::get_note_handler)
                .put(notes::update_note_handler)
                .delete(notes::delete_note_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
