/// Database models for Bookrack
///
/// This module contains all database models and their query operations.
/// All statements use bound parameters; no query text is ever assembled
/// from user input.
///
/// # Models
///
/// - `user`: User accounts and credential storage
/// - `book`: Read-only book catalog and search
/// - `review`: Reviews and rating aggregation
///
/// # Example
///
/// ```no_run
/// use bookrack_shared::models::user::{User, CreateUser};
/// use bookrack_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "alice".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod book;
pub mod review;
pub mod user;
