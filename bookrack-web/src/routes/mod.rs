/// Route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout
/// - `books`: Search pages, book detail, review submission
/// - `api`: JSON aggregate rating endpoint

pub mod api;
pub mod auth;
pub mod books;
pub mod health;

use validator::ValidationErrors;

/// First human-readable message out of a set of validation errors
///
/// Pages report one failure at a time, the way the original error page did.
pub(crate) fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "invalid input".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "must provide username"))]
        username: String,
    }

    #[test]
    fn test_first_validation_message() {
        let probe = Probe {
            username: String::new(),
        };
        let errors = probe.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "must provide username");
    }
}
