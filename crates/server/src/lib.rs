use std::sync::Arc;

use axum::{Router, routing::get};
use db::DBService;
use secrecy::ExposeSecret;
use services::services::auth::{AuthService, Authenticator, JwtAuthenticator, PasswordHasher};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utils::jwt::JwtKeys;

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

use config::Config;

/// Shared by every handler. Cloning is cheap: the pool and authenticator are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub authenticator: Arc<dyn Authenticator>,
    pub auth: AuthService,
    pub hasher: PasswordHasher,
    pub products_per_page: i64,
}

impl AppState {
    pub fn new(db: DBService, config: &Config) -> Self {
        let keys = JwtKeys::new(
            config.jwt_secret.expose_secret().as_bytes(),
            chrono::Duration::hours(config.token_ttl_hours),
        );
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        Self {
            authenticator: Arc::new(JwtAuthenticator::new(db.pool.clone(), keys.clone())),
            auth: AuthService::new(db.pool.clone(), keys, hasher),
            hasher,
            products_per_page: config.products_per_page,
            db,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::router(&state))
        .route("/api/", get(routes::welcome))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
