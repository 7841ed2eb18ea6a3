use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod filter;
mod handlers;
mod middleware;
mod services;

use config::AppConfig;
use services::{AuthService, HomeService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthService,
    pub homes: HomeService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and the secrets
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("realtor_api=info,tower_http=info")
                }),
        )
        .init();

    // Fails fast when JSON_TOKEN_KEY or PRODUCT_KEY_SECRET is unset
    let config = AppConfig::from_env()?;

    let pool = database::pool::connect(&config.database_url)?;
    let state = AppState {
        pool: pool.clone(),
        auth: AuthService::new(pool.clone(), &config.security),
        homes: HomeService::new(pool),
    };

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Realtor API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    // Mutating routes and profile lookups require a verified bearer token
    let protected = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/key", post(handlers::auth::product_key))
        .route("/api/home", post(handlers::home::create_home))
        .route(
            "/api/home/:id",
            put(handlers::home::update_home).delete(handlers::home::delete_home),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::jwt_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/signup/:user_type", post(handlers::auth::signup))
        .route("/auth/signin", post(handlers::auth::signin))
        .route("/home", get(handlers::home::list_homes))
        .route("/home/:id", get(handlers::home::get_home))
        .route("/home/:id/realtor", get(handlers::home::get_realtor))
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Realtor API",
            "version": version,
            "description": "Real-estate listing backend built with Rust (Axum)",
            "endpoints": {
                "auth": "/auth/signup/:userType, /auth/signin (public - token acquisition)",
                "homes": "/home[?city&minimumPrice&maximumPrice&propertyType], /home/:id, /home/:id/realtor (public)",
                "me": "/api/auth/me (protected)",
                "product_key": "/api/auth/key (protected, admin)",
                "listings": "/api/home, /api/home/:id (protected - realtor ownership)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::pool::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
