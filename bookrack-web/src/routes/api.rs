/// JSON API for aggregate rating data
///
/// # Endpoint
///
/// ```text
/// GET /api/:isbn
/// ```
///
/// # Response
///
/// ```json
/// {
///   "title": "Dune",
///   "author": "Frank Herbert",
///   "year": 1965,
///   "isbn": "0441172717",
///   "review_count": 3,
///   "average_score": 4.0
/// }
/// ```
///
/// `average_score` is a number, or the literal string `"No reviews"` when
/// the book has no reviews. Unknown ISBNs get a 404 with an
/// `{"error": ...}` body.

use crate::{
    app::AppState,
    error::{ApiError, AppError},
};
use axum::{
    extract::{Path, State},
    Json,
};
use bookrack_shared::models::{
    book::Book,
    review::{mean_rating, Review},
};
use serde::Serialize;

/// Aggregate rating summary for one book
#[derive(Debug, Serialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub isbn: String,

    /// Number of locally stored reviews
    pub review_count: i64,

    /// Mean local rating, or the no-reviews sentinel
    pub average_score: AverageScore,
}

/// Average score wire representation: a number or `"No reviews"`
///
/// The sentinel is a distinguished value, never a fabricated 0.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AverageScore {
    Rated(f64),
    NoReviews(&'static str),
}

impl From<Option<f64>> for AverageScore {
    fn from(average: Option<f64>) -> Self {
        match average {
            Some(score) => AverageScore::Rated(score),
            None => AverageScore::NoReviews("No reviews"),
        }
    }
}

/// Returns the aggregate rating summary for an ISBN
///
/// # Errors
///
/// - `404 Not Found`: the ISBN is not in the catalog
pub async fn book_summary(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<BookSummary>, ApiError> {
    let book = Book::find_by_isbn(&state.db, &isbn)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("book not found".to_string())))?;

    let ratings = Review::ratings_for_book(&state.db, book.id).await?;

    Ok(Json(BookSummary {
        title: book.title,
        author: book.author,
        year: book.year,
        isbn: book.isbn,
        review_count: ratings.len() as i64,
        average_score: AverageScore::from(mean_rating(&ratings)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_average_score_serializes_as_number() {
        let score = AverageScore::from(Some(4.0));
        assert_eq!(serde_json::to_value(&score).unwrap(), json!(4.0));
    }

    #[test]
    fn test_average_score_sentinel_serializes_as_string() {
        let score = AverageScore::from(None);
        assert_eq!(serde_json::to_value(&score).unwrap(), json!("No reviews"));
    }

    #[test]
    fn test_book_summary_shape() {
        let summary = BookSummary {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
            isbn: "0441172717".to_string(),
            review_count: 0,
            average_score: AverageScore::from(None),
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["title"], "Dune");
        assert_eq!(value["year"], 1965);
        assert_eq!(value["review_count"], 0);
        assert_eq!(value["average_score"], "No reviews");
    }
}
