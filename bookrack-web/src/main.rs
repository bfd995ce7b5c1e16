//! # Bookrack Web Server
//!
//! Server-rendered book-review application: registration, login, catalog
//! search, book detail pages with best-effort external review counts, one
//! review per user per book, and a JSON aggregate endpoint.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/bookrack cargo run -p bookrack-web
//! ```

use bookrack_shared::db::{migrations, pool};
use bookrack_web::{
    app::{build_router, AppState},
    config::Config,
    lookup::RatingLookup,
};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookrack_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Bookrack v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    // Server-side session storage in the same database
    let session_store = PostgresStore::new(db.clone());
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.server.secure_cookies)
        .with_expiry(Expiry::OnSessionEnd);

    let lookup = RatingLookup::new(&config.lookup)?;

    let bind_address = config.bind_address();
    let state = AppState::new(db, config, lookup);
    let app = build_router(state, session_layer);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
