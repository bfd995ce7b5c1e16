/// Error handling for the web server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Page handlers return `Result<T, AppError>`, which renders an HTML error
/// page with the appropriate status code. The JSON API wraps the same
/// taxonomy in [`ApiError`], which renders a `{"error": ...}` body instead.
///
/// # Taxonomy
///
/// - `Validation` (400): missing or malformed input, user-correctable
/// - `Auth` (401): bad credentials
/// - `NotFound` (404): unknown user or book
/// - `Conflict` (409): duplicate username or duplicate review
/// - `Internal` (500): everything else; logged, details not exposed
///
/// The external review-count lookup never produces an error here: its
/// failures are represented as `Option::None` and masked (see `lookup`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type alias for page handlers
pub type AppResult<T> = Result<T, AppError>;

/// Unified application error type
#[derive(Debug)]
pub enum AppError {
    /// Bad request (400) - missing or malformed input
    Validation(String),

    /// Unauthorized (401) - bad credentials
    Auth(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate username, duplicate review
    Conflict(String),

    /// Internal server error (500)
    Internal(String),
}

/// JSON error response format for the API surface
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
}

impl AppError {
    /// HTTP status code this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the requester
    ///
    /// Internal errors are logged but reported generically.
    fn public_message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg,
            AppError::Internal(_) => "something went wrong",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AppError::Auth(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref msg) = self {
            tracing::error!("Internal error: {}", msg);
        }

        let status = self.status();
        let page = crate::views::error_page(status, self.public_message());
        (status, page).into_response()
    }
}

/// API error wrapper rendering the taxonomy as JSON
///
/// Same status mapping as [`AppError`], body is `{"error": message}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref msg) = self.0 {
            tracing::error!("Internal error: {}", msg);
        }

        let status = self.0.status();
        let body = Json(ErrorBody {
            error: self.0.public_message().to_string(),
        });
        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError(AppError::from(err))
    }
}

/// Convert sqlx errors to application errors
///
/// Unique-constraint violations are the authoritative uniqueness guards
/// (username index, (user_id, book_id) review key); they surface here when
/// the application-level fast-path check lost a race.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    return conflict_for_constraint(constraint);
                }

                AppError::Internal(format!("Database error: {}", db_err))
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Maps a violated constraint name to a user-facing conflict
///
/// Only the two known uniqueness guards get specific messages; anything
/// else gets a generic one, since schema identifiers are not for
/// requesters' eyes. The unrecognized name is logged instead.
fn conflict_for_constraint(constraint: &str) -> AppError {
    if constraint.contains("username") {
        return AppError::Conflict("username already exists".to_string());
    }
    if constraint.contains("user_book") {
        return AppError::Conflict("you have already reviewed this book".to_string());
    }

    tracing::warn!(constraint, "Unrecognized constraint violation");
    AppError::Conflict("conflicting data".to_string())
}

/// Convert password hashing errors to application errors
///
/// A wrong password is not an error at this level (verify returns
/// Ok(false)); anything surfacing here is an operational fault.
impl From<bookrack_shared::auth::password::PasswordError> for AppError {
    fn from(err: bookrack_shared::auth::password::PasswordError) -> Self {
        AppError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert session store errors to application errors
impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Internal(format!("Session error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Validation("must provide username".to_string());
        assert_eq!(err.to_string(), "Validation failed: must provide username");

        let err = AppError::NotFound("book not found".to_string());
        assert_eq!(err.to_string(), "Not found: book not found");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Auth(String::new()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound(String::new()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict(String::new()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_not_exposed() {
        let err = AppError::Internal("connection refused at 10.0.0.3".to_string());
        assert_eq!(err.public_message(), "something went wrong");
    }

    #[test]
    fn test_known_constraints_get_specific_messages() {
        let err = conflict_for_constraint("users_username_lower_idx");
        assert_eq!(err.public_message(), "username already exists");
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = conflict_for_constraint("reviews_user_book_key");
        assert_eq!(err.public_message(), "you have already reviewed this book");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_unrecognized_constraint_name_not_exposed() {
        let err = conflict_for_constraint("reviews_rating_check");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(
            !err.public_message().contains("reviews_rating_check"),
            "Schema identifiers must not leak into responses: {}",
            err.public_message()
        );
    }

    #[test]
    fn test_api_error_status() {
        let err = ApiError(AppError::NotFound("book not found".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
