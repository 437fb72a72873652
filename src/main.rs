use notes_api::{
    auth::sweeper::spawn_expired_token_sweep, config::AppConfig, create_router, db, AppState,
    Repositories,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notes_api=debug,tower_http=info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Notes API - Starting...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let repositories = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(database_url, config.db_max_connections)
                .await
                .expect("Failed to create database pool");

            db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");

            Repositories::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            Repositories::in_memory()
        }
    };

    let sweep = config.token_sweep_interval.map(|period| {
        tracing::info!("Expired refresh token sweep every {:?}", period);
        spawn_expired_token_sweep(repositories.refresh_tokens.clone(), period)
    });

    let state = AppState::new(repositories, notes_api::token_service_from_config(&config));
    let app = create_router(state);

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Notes API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");

    if let Some(handle) = sweep {
        handle.abort();
    }
}
