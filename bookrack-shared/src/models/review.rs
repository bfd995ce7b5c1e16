/// Review model, uniqueness checks, and rating aggregation
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reviews (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     book_id UUID NOT NULL REFERENCES books(id),
///     user_id UUID NOT NULL REFERENCES users(id),
///     rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
///     text TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT reviews_user_book_key UNIQUE (user_id, book_id)
/// );
/// ```
///
/// One review per (user, book), enforced by `reviews_user_book_key`. The
/// [`Review::exists`] check is a fast path for a friendly error message;
/// the constraint is what actually serializes concurrent duplicate
/// submissions. Reviews are immutable once created; there is no edit or
/// delete path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Valid rating range (inclusive)
pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Review row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    /// Unique review ID (UUID v4)
    pub id: Uuid,

    /// Reviewed book
    pub book_id: Uuid,

    /// Author of the review
    pub user_id: Uuid,

    /// Rating, always within `MIN_RATING..=MAX_RATING`
    pub rating: i16,

    /// Review text
    pub text: String,

    /// When the review was submitted
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReview {
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub text: String,
}

/// Review joined with its author's username, for display
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewWithAuthor {
    pub username: String,
    pub rating: i16,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Arithmetic mean of a set of ratings
///
/// Returns None for an empty slice — the distinguished no-reviews sentinel.
/// Never fabricates 0.0 and never divides by zero.
///
/// # Example
///
/// ```
/// use bookrack_shared::models::review::mean_rating;
///
/// assert_eq!(mean_rating(&[5, 3, 4]), Some(4.0));
/// assert_eq!(mean_rating(&[]), None);
/// ```
pub fn mean_rating(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    Some(sum as f64 / ratings.len() as f64)
}

impl Review {
    /// Creates a new review
    ///
    /// A single INSERT; the insert and the uniqueness check are one atomic
    /// operation from the application's point of view because the
    /// `reviews_user_book_key` constraint is evaluated by the database at
    /// commit of the statement.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A review already exists for this (user, book) pair (unique
    ///   constraint violation)
    /// - The rating is outside 1..=5 (CHECK constraint; callers validate
    ///   first for a better message)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateReview) -> Result<Self, sqlx::Error> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (book_id, user_id, rating, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, user_id, rating, text, created_at
            "#,
        )
        .bind(data.book_id)
        .bind(data.user_id)
        .bind(data.rating)
        .bind(data.text)
        .fetch_one(pool)
        .await?;

        Ok(review)
    }

    /// Checks whether a review already exists for the (user, book) pair
    ///
    /// The check is on the joint key; checking user_id alone would wrongly
    /// block a user from reviewing a second book.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn exists(
        pool: &PgPool,
        user_id: Uuid,
        book_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let (found,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reviews WHERE user_id = $1 AND book_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(pool)
        .await?;

        Ok(found)
    }

    /// Lists a book's reviews with author usernames, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list_for_book(
        pool: &PgPool,
        book_id: Uuid,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
            r#"
            SELECT u.username, r.rating, r.text, r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.book_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(pool)
        .await?;

        Ok(reviews)
    }

    /// Fetches all ratings for a book
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn ratings_for_book(pool: &PgPool, book_id: Uuid) -> Result<Vec<i16>, sqlx::Error> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            r#"
            SELECT rating FROM reviews WHERE book_id = $1
            "#,
        )
        .bind(book_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(r,)| r).collect())
    }

    /// Average rating for a book, or None when it has no reviews
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn average_rating(
        pool: &PgPool,
        book_id: Uuid,
    ) -> Result<Option<f64>, sqlx::Error> {
        let ratings = Self::ratings_for_book(pool, book_id).await?;
        Ok(mean_rating(&ratings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_rating_empty_is_none() {
        assert_eq!(mean_rating(&[]), None);
    }

    #[test]
    fn test_mean_rating_single() {
        assert_eq!(mean_rating(&[3]), Some(3.0));
    }

    #[test]
    fn test_mean_rating_known_value() {
        assert_eq!(mean_rating(&[5, 3, 4]), Some(4.0));
    }

    #[test]
    fn test_mean_rating_non_integral() {
        assert_eq!(mean_rating(&[4, 5]), Some(4.5));
    }

    #[test]
    fn test_mean_rating_never_zero_for_empty() {
        // The no-reviews sentinel must be distinguishable from a real 0.0
        assert_ne!(mean_rating(&[]), Some(0.0));
    }

    #[test]
    fn test_rating_bounds() {
        assert_eq!(MIN_RATING, 1);
        assert_eq!(MAX_RATING, 5);
    }
}
