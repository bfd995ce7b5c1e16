/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(64) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX users_username_lower_idx ON users (LOWER(username));
/// ```
///
/// Username case is preserved as entered; uniqueness is case-insensitive
/// and enforced by the expression index, so two concurrent registrations of
/// "Alice" and "alice" cannot both commit. Users are immutable after
/// registration and never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User account row
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Username as entered at registration
    ///
    /// Unique across all users under case-insensitive comparison
    pub username: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Username (case preserved; uniqueness checked case-insensitively)
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,
}

impl User {
    /// Creates a new user in the database
    ///
    /// A single INSERT; registration either fully commits the row or not at
    /// all.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The username is already taken (unique index violation on
    ///   `users_username_lower_idx`)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username, case-insensitively
    ///
    /// Matches the same normalization the unique index uses, so this lookup
    /// agrees with the store-level uniqueness rule.
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE LOWER(username) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
        };

        assert_eq!(create_user.username, "alice");
        assert_eq!(create_user.password_hash, "hash");
    }

    // Database operations are covered by tests/constraint_tests.rs against
    // a live PostgreSQL instance
}
