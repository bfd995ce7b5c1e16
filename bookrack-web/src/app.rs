/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use bookrack_web::{app::{AppState, build_router}, config::Config, lookup::RatingLookup};
/// use sqlx::PgPool;
/// use tower_sessions::{MemoryStore, SessionManagerLayer};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let lookup = RatingLookup::new(&config.lookup)?;
/// let state = AppState::new(pool, config, lookup);
///
/// let session_layer = SessionManagerLayer::new(MemoryStore::default());
/// let app = build_router(state, session_layer);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, lookup::RatingLookup};
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// External review-count lookup client
    pub lookup: Arc<RatingLookup>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, lookup: RatingLookup) -> Self {
        Self {
            db,
            config: Arc::new(config),
            lookup: Arc::new(lookup),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// ├── /register, /login, /logout # Authentication (public)
/// ├── /api/:isbn                 # JSON aggregate data (public)
/// ├── /                          # Search form (session gate)
/// ├── /search                    # Results (session gate)
/// ├── /books/:isbn               # Detail page (session gate)
/// └── /books/:isbn/reviews       # Submit review (session gate)
/// ```
///
/// The session gate (`session::require_login`) is the only authorization
/// path; every protected route is nested under it. The session layer wraps
/// the whole router because the login/logout handlers manipulate sessions
/// too.
pub fn build_router<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    use crate::routes;

    let protected = Router::new()
        .route("/", get(routes::books::index))
        .route("/search", get(routes::books::search))
        .route("/books/:isbn", get(routes::books::detail))
        .route("/books/:isbn/reviews", post(routes::books::submit_review))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::session::require_login,
        ));

    Router::new()
        .merge(protected)
        .route("/health", get(routes::health::health_check))
        .route(
            "/register",
            get(routes::auth::register_page).post(routes::auth::register),
        )
        .route(
            "/login",
            get(routes::auth::login_page).post(routes::auth::login),
        )
        .route("/logout", get(routes::auth::logout))
        .route("/api/:isbn", get(routes::api::book_summary))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(session_layer)
        .with_state(state)
}
