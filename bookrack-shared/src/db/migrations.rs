/// Database migration runner
///
/// Runs schema migrations from the `migrations/` directory at this crate's
/// root using sqlx's embedded migration system. Each migration is a
/// timestamped `.sql` file applied exactly once, in order.
///
/// # Example
///
/// ```no_run
/// use bookrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use bookrack_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed, a migration fails to
/// execute, or the database connection is lost during migration. Failed
/// migrations are rolled back where the statements allow it.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
