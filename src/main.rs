use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use services::generative::GenerativeClient;
use services::places::PlacesClient;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
    pub generative: GenerativeClient,
    pub places: PlacesClient,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindease_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env();
    let config = Arc::new(config);

    // Database
    let db = db::create_pool(&config.database_url).await;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    let state = AppState {
        db,
        config: config.clone(),
        rate_limiter: RateLimitState::new(),
        generative: GenerativeClient::new(&config),
        places: PlacesClient::new(&config),
    };

    // Credential routes get their own rate limit
    let auth_routes = Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let api_routes = Router::new()
        .route("/", get(|| async { "MindEase backend running." }))
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/auth/user", get(handlers::auth::current_user))
        // Moods
        .route("/api/mood", post(handlers::moods::create_mood))
        .route("/api/mood/:id", get(handlers::moods::list_moods))
        .route("/api/mood/:id/stats", get(handlers::moods::mood_stats))
        .route("/api/mood/:id", patch(handlers::moods::update_mood))
        .route("/api/mood/:id", delete(handlers::moods::delete_mood))
        // Goals
        .route("/api/goals", get(handlers::goals::list_goals))
        .route("/api/goals", post(handlers::goals::create_goal))
        .route("/api/goals/:id", patch(handlers::goals::update_goal))
        .route("/api/goals/:id", delete(handlers::goals::delete_goal))
        // Game records & leaderboard
        .route("/api/game-records", get(handlers::game_records::leaderboard))
        .route(
            "/api/game-records",
            post(handlers::game_records::create_game_record),
        )
        // Journal
        .route("/api/journal", get(handlers::journal::list_entries))
        .route("/api/journal", post(handlers::journal::create_entry))
        // Dashboard
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        // Places
        .route(
            "/api/location/open-places",
            get(handlers::location::open_places),
        )
        .route(
            "/api/location/favorite",
            post(handlers::location::create_favorite),
        )
        .route(
            "/api/location/favorite/:user_id",
            get(handlers::location::list_favorites),
        )
        // Help / contact
        .route("/api/help", post(handlers::help::create_help_request))
        // Generative-text proxy
        .route(
            "/api/gemini/generate/journal-prompts",
            post(handlers::gemini::journal_prompts),
        )
        .route(
            "/api/gemini/generate/motivation",
            post(handlers::gemini::motivation),
        )
        .route(
            "/api/gemini/generate/empathetic-reply",
            post(handlers::gemini::empathetic_reply),
        );

    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = vec![config
            .frontend_url
            .parse::<axum::http::HeaderValue>()
            .unwrap()];
        // In dev, also allow LAN access (e.g. testing from another device)
        if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
            for o in extra.split(',') {
                if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                    origins.push(hv);
                }
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let app = Router::new()
        .merge(auth_routes)
        .merge(api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    // Use into_make_service_with_connect_info to provide client IP for rate limiting
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .unwrap();
}
