/// Best-effort external review-count lookup
///
/// Calls a third-party HTTP endpoint for supplemental review counts on a
/// book detail page. The call is at-most-once with a bounded timeout; any
/// failure — network error, timeout, non-2xx status, or an unexpected
/// response shape — collapses to `None` and is logged at debug level. The
/// page renders from local data either way; lookup degradation must never
/// become a user-visible error.
///
/// # Wire Format
///
/// `GET {url}?key={key}&isbns={isbn}` returning a JSON body with one entry
/// per requested ISBN:
///
/// ```json
/// {
///   "books": [
///     {"ratings_count": 28, "average_rating": "4.12"}
///   ]
/// }
/// ```

use crate::config::LookupConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Supplemental review counts for one book
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCounts {
    /// Number of ratings at the external service
    pub ratings_count: i64,

    /// Average rating at the external service
    pub average_rating: f64,
}

/// Response body: one entry per requested ISBN
#[derive(Debug, Deserialize)]
struct LookupBody {
    books: Vec<LookupEntry>,
}

/// Per-book entry in the response body
///
/// The service reports the average as a decimal string.
#[derive(Debug, Deserialize)]
struct LookupEntry {
    ratings_count: i64,
    average_rating: String,
}

/// Parses a lookup response body into review counts
///
/// Returns None on any shape mismatch: invalid JSON, empty book list, or an
/// unparseable average.
fn parse_review_counts(body: &str) -> Option<ReviewCounts> {
    let parsed: LookupBody = serde_json::from_str(body).ok()?;
    let entry = parsed.books.into_iter().next()?;
    let average_rating = entry.average_rating.parse::<f64>().ok()?;

    Some(ReviewCounts {
        ratings_count: entry.ratings_count,
        average_rating,
    })
}

/// Client for the external review-count service
#[derive(Debug, Clone)]
pub struct RatingLookup {
    client: reqwest::Client,
    url: String,
    key: Option<String>,
}

impl RatingLookup {
    /// Creates a lookup client with the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built
    pub fn new(config: &LookupConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            key: config.key.clone(),
        })
    }

    /// Fetches review counts for an ISBN, best-effort
    ///
    /// # Returns
    ///
    /// The counts, or None when the service is unavailable, the call times
    /// out, the response is non-2xx, the body has an unexpected shape, or
    /// no lookup key is configured. Never returns an error.
    pub async fn fetch_review_counts(&self, isbn: &str) -> Option<ReviewCounts> {
        let key = match &self.key {
            Some(key) => key,
            None => {
                debug!("Review-count lookup disabled: no key configured");
                return None;
            }
        };

        let response = self
            .client
            .get(self.url.as_str())
            .query(&[("key", key.as_str()), ("isbns", isbn)])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                debug!(isbn, "Review-count lookup unavailable: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(
                isbn,
                status = %response.status(),
                "Review-count lookup returned non-success status"
            );
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(isbn, "Failed to read review-count lookup body: {}", e);
                return None;
            }
        };

        let counts = parse_review_counts(&body);
        if counts.is_none() {
            debug!(isbn, "Review-count lookup body had unexpected shape");
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_body() {
        let body = r#"{"books": [{"ratings_count": 28, "average_rating": "4.12"}]}"#;
        let counts = parse_review_counts(body).expect("Should parse");
        assert_eq!(counts.ratings_count, 28);
        assert!((counts.average_rating - 4.12).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_extra_fields_ignored() {
        let body = r#"{
            "books": [{
                "id": 12345,
                "isbn": "1234567890",
                "ratings_count": 5,
                "reviews_count": 9,
                "average_rating": "3.50"
            }]
        }"#;
        let counts = parse_review_counts(body).expect("Should parse");
        assert_eq!(counts.ratings_count, 5);
    }

    #[test]
    fn test_parse_empty_book_list() {
        assert_eq!(parse_review_counts(r#"{"books": []}"#), None);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert_eq!(parse_review_counts("not json"), None);
        assert_eq!(parse_review_counts(""), None);
    }

    #[test]
    fn test_parse_shape_mismatch() {
        assert_eq!(parse_review_counts(r#"{"works": []}"#), None);
        assert_eq!(
            parse_review_counts(r#"{"books": [{"ratings_count": "many"}]}"#),
            None
        );
    }

    #[test]
    fn test_parse_unparseable_average() {
        let body = r#"{"books": [{"ratings_count": 28, "average_rating": "n/a"}]}"#;
        assert_eq!(parse_review_counts(body), None);
    }

    #[tokio::test]
    async fn test_fetch_without_key_is_unavailable() {
        let lookup = RatingLookup::new(&crate::config::LookupConfig {
            url: "https://example.invalid/review_counts.json".to_string(),
            key: None,
            timeout_seconds: 1,
        })
        .expect("Client should build");

        assert_eq!(lookup.fetch_review_counts("1234567890").await, None);
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_unavailable() {
        // .invalid never resolves; the failure must collapse to None
        let lookup = RatingLookup::new(&crate::config::LookupConfig {
            url: "https://example.invalid/review_counts.json".to_string(),
            key: Some("key".to_string()),
            timeout_seconds: 1,
        })
        .expect("Client should build");

        assert_eq!(lookup.fetch_review_counts("1234567890").await, None);
    }
}
