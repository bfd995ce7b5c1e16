/// Book catalog model and search
///
/// The catalog is read-only from the application's point of view; rows are
/// provisioned by an external loader. Search is case-insensitive substring
/// containment over a single caller-selected field.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE books (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     isbn VARCHAR(13) NOT NULL UNIQUE,
///     title VARCHAR(255) NOT NULL,
///     author VARCHAR(255) NOT NULL,
///     year INTEGER NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Book catalog row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Unique book ID (UUID v4)
    pub id: Uuid,

    /// ISBN (unique across the catalog)
    pub isbn: String,

    /// Title
    pub title: String,

    /// Author
    pub author: String,

    /// Publication year
    pub year: i32,
}

/// Field a catalog search runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Isbn,
    Title,
    Author,
}

impl SearchField {
    /// Parses a field name from a query-string value
    ///
    /// # Returns
    ///
    /// The field, or None for an unrecognized name (the caller turns that
    /// into a validation error)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "isbn" => Some(SearchField::Isbn),
            "title" => Some(SearchField::Title),
            "author" => Some(SearchField::Author),
            _ => None,
        }
    }
}

/// Builds an ILIKE containment pattern from a raw search term
///
/// `%`, `_`, and `\` are LIKE metacharacters; escaping them keeps the term
/// a literal substring match. The term itself is always bound as a
/// parameter, never spliced into the query text.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if c == '%' || c == '_' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl Book {
    /// Finds a book by exact ISBN
    ///
    /// # Returns
    ///
    /// The book if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_isbn(pool: &PgPool, isbn: &str) -> Result<Option<Self>, sqlx::Error> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, isbn, title, author, year
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(pool)
        .await?;

        Ok(book)
    }

    /// Searches the catalog by substring containment on one field
    ///
    /// Matching is case-insensitive for all fields (ILIKE). Returns an
    /// empty Vec, not an error, when nothing matches. Results are ordered
    /// by title for stable rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn search(
        pool: &PgPool,
        term: &str,
        field: SearchField,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = match field {
            SearchField::Isbn => {
                r#"
                SELECT id, isbn, title, author, year
                FROM books
                WHERE isbn ILIKE $1
                ORDER BY title
                "#
            }
            SearchField::Title => {
                r#"
                SELECT id, isbn, title, author, year
                FROM books
                WHERE title ILIKE $1
                ORDER BY title
                "#
            }
            SearchField::Author => {
                r#"
                SELECT id, isbn, title, author, year
                FROM books
                WHERE author ILIKE $1
                ORDER BY title
                "#
            }
        };

        let books = sqlx::query_as::<_, Book>(query)
            .bind(like_pattern(term))
            .fetch_all(pool)
            .await?;

        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_field_parse() {
        assert_eq!(SearchField::parse("isbn"), Some(SearchField::Isbn));
        assert_eq!(SearchField::parse("title"), Some(SearchField::Title));
        assert_eq!(SearchField::parse("author"), Some(SearchField::Author));
        assert_eq!(SearchField::parse("year"), None);
        assert_eq!(SearchField::parse(""), None);
        assert_eq!(SearchField::parse("Title"), None);
    }

    #[test]
    fn test_like_pattern_plain_term() {
        assert_eq!(like_pattern("tolkien"), "%tolkien%");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
