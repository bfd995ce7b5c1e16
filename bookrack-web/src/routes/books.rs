/// Catalog and review routes (all behind the session gate)
///
/// - `GET /` - search form
/// - `GET /search?field=&q=` - results list
/// - `GET /books/:isbn` - detail page with local reviews, average rating,
///   and best-effort external counts
/// - `POST /books/:isbn/reviews` - submit a review (one per user per book)

use crate::{
    app::AppState,
    error::{AppError, AppResult},
    routes::first_validation_message,
    session::CurrentUser,
    views,
};
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Extension, Form,
};
use bookrack_shared::models::{
    book::{Book, SearchField},
    review::{mean_rating, CreateReview, Review, MAX_RATING, MIN_RATING},
};
use serde::Deserialize;
use validator::Validate;

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,

    #[serde(default)]
    pub field: String,
}

/// Review submission payload
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewForm {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<i16>,

    /// Checked after trimming: see [`normalized_review_text`]
    #[serde(default)]
    pub text: String,
}

/// Trims review text, rejecting blank submissions
///
/// Whitespace-only text counts as missing; the stored text is always the
/// trimmed form, so a submission that trims to nothing never reaches the
/// database.
fn normalized_review_text(text: &str) -> Option<&str> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Home page: the search form
pub async fn index(Extension(user): Extension<CurrentUser>) -> Html<String> {
    views::search_page(&user.username)
}

/// Runs a catalog search and renders the results
///
/// # Errors
///
/// - `Validation`: empty term or unrecognized field
pub async fn search(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Html<String>> {
    if query.q.trim().is_empty() {
        return Err(AppError::Validation(
            "must provide a search term".to_string(),
        ));
    }

    let field = SearchField::parse(&query.field)
        .ok_or_else(|| AppError::Validation("unknown search field".to_string()))?;

    let books = Book::search(&state.db, query.q.trim(), field).await?;

    Ok(views::results_page(&user.username, query.q.trim(), &books))
}

/// Book detail page
///
/// Renders title/author/year, local reviews and their average, a review
/// form when the user has not reviewed yet, and supplemental external
/// counts when the lookup succeeds. A degraded lookup only drops the
/// supplemental line.
///
/// # Errors
///
/// - `NotFound`: the ISBN is not in the catalog
pub async fn detail(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(isbn): Path<String>,
) -> AppResult<Html<String>> {
    let book = Book::find_by_isbn(&state.db, &isbn)
        .await?
        .ok_or_else(|| AppError::NotFound("book not found".to_string()))?;

    let reviews = Review::list_for_book(&state.db, book.id).await?;
    let ratings: Vec<i16> = reviews.iter().map(|r| r.rating).collect();
    let average = mean_rating(&ratings);

    let can_review = !Review::exists(&state.db, user.id, book.id).await?;

    // Best-effort; None just means the supplemental line is omitted
    let counts = state.lookup.fetch_review_counts(&book.isbn).await;

    Ok(views::book_page(
        &user.username,
        &book,
        &reviews,
        average,
        counts.as_ref(),
        can_review,
    ))
}

/// Submits a review for a book
///
/// The application-level `exists` check is a fast path for a friendly
/// message; the `(user_id, book_id)` unique constraint decides concurrent
/// races, and its violation maps to `Conflict` as well.
///
/// # Errors
///
/// - `Validation`: missing rating, rating out of 1..=5, or text that is
///   empty after trimming
/// - `NotFound`: the ISBN is not in the catalog
/// - `Conflict`: this user already reviewed this book
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(isbn): Path<String>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Redirect> {
    form.validate()
        .map_err(|e| AppError::Validation(first_validation_message(&e)))?;

    let rating = form
        .rating
        .ok_or_else(|| AppError::Validation("must provide a rating".to_string()))?;
    debug_assert!((MIN_RATING..=MAX_RATING).contains(&rating));

    let text = normalized_review_text(&form.text)
        .ok_or_else(|| AppError::Validation("must provide review text".to_string()))?;

    let book = Book::find_by_isbn(&state.db, &isbn)
        .await?
        .ok_or_else(|| AppError::NotFound("book not found".to_string()))?;

    if Review::exists(&state.db, user.id, book.id).await? {
        return Err(AppError::Conflict(
            "you have already reviewed this book".to_string(),
        ));
    }

    let review = Review::create(
        &state.db,
        CreateReview {
            book_id: book.id,
            user_id: user.id,
            rating,
            text: text.to_string(),
        },
    )
    .await?;

    tracing::info!(review_id = %review.id, book_id = %book.id, "Review submitted");

    Ok(Redirect::to(&format!("/books/{}", book.isbn)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_form_rejects_out_of_range_rating() {
        let form = ReviewForm {
            rating: Some(6),
            text: "great".to_string(),
        };
        assert!(form.validate().is_err());

        let form = ReviewForm {
            rating: Some(0),
            text: "great".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_review_text_rejects_empty() {
        assert_eq!(normalized_review_text(""), None);
    }

    #[test]
    fn test_review_text_rejects_whitespace_only() {
        // Would otherwise store an empty review after trimming
        assert_eq!(normalized_review_text("   \t\n  "), None);
        assert_eq!(normalized_review_text("\r\n"), None);
    }

    #[test]
    fn test_review_text_is_trimmed() {
        assert_eq!(normalized_review_text("  loved it  "), Some("loved it"));
        assert_eq!(normalized_review_text("loved it"), Some("loved it"));
    }

    #[test]
    fn test_review_form_accepts_valid_input() {
        for rating in 1..=5 {
            let form = ReviewForm {
                rating: Some(rating),
                text: "ok".to_string(),
            };
            assert!(form.validate().is_ok(), "rating {} should be valid", rating);
        }
    }

    #[test]
    fn test_review_form_missing_rating_passes_validation() {
        // Absence is handled separately in the handler with its own message
        let form = ReviewForm {
            rating: None,
            text: "ok".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
