/// Minimal HTML page rendering
///
/// Template rendering is an external collaborator for Bookrack's core; this
/// module keeps that boundary deliberately thin with small string builders
/// behind one shared layout. All user-supplied data passes through
/// [`escape`] before it reaches markup.

use crate::lookup::ReviewCounts;
use axum::{http::StatusCode, response::Html};
use bookrack_shared::models::{book::Book, review::ReviewWithAuthor};

/// Escapes a string for safe inclusion in HTML text or attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared page layout
fn layout(title: &str, nav: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - Bookrack</title>\n</head>\n<body>\n\
         <nav>{nav}</nav>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
        nav = nav,
        body = body,
    ))
}

/// Navigation bar for anonymous visitors
fn nav_anonymous() -> &'static str {
    "<a href=\"/login\">Log In</a> <a href=\"/register\">Register</a>"
}

/// Navigation bar for a signed-in user
fn nav_signed_in(username: &str) -> String {
    format!(
        "<a href=\"/\">Search</a> <span>{}</span> <a href=\"/logout\">Log Out</a>",
        escape(username)
    )
}

/// Error page with the failure message
pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to search</a></p>",
        status.as_u16(),
        escape(message)
    );
    layout("Error", nav_anonymous(), &body)
}

/// Registration form
pub fn register_page() -> Html<String> {
    let body = "<h1>Register</h1>\n\
        <form action=\"/register\" method=\"post\">\n\
        <input name=\"username\" placeholder=\"Username\" autofocus>\n\
        <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
        <input name=\"confirmation\" type=\"password\" placeholder=\"Confirm password\">\n\
        <button type=\"submit\">Register</button>\n\
        </form>";
    layout("Register", nav_anonymous(), body)
}

/// Login form
pub fn login_page() -> Html<String> {
    let body = "<h1>Log In</h1>\n\
        <form action=\"/login\" method=\"post\">\n\
        <input name=\"username\" placeholder=\"Username\" autofocus>\n\
        <input name=\"password\" type=\"password\" placeholder=\"Password\">\n\
        <button type=\"submit\">Log In</button>\n\
        </form>";
    layout("Log In", nav_anonymous(), body)
}

/// Home/search page
pub fn search_page(username: &str) -> Html<String> {
    let body = "<h1>Search the catalog</h1>\n\
        <form action=\"/search\" method=\"get\">\n\
        <input name=\"q\" placeholder=\"Search term\" autofocus>\n\
        <select name=\"field\">\n\
        <option value=\"title\">Title</option>\n\
        <option value=\"author\">Author</option>\n\
        <option value=\"isbn\">ISBN</option>\n\
        </select>\n\
        <button type=\"submit\">Search</button>\n\
        </form>";
    layout("Search", &nav_signed_in(username), body)
}

/// Search results list
pub fn results_page(username: &str, term: &str, books: &[Book]) -> Html<String> {
    let mut body = format!("<h1>Results for \"{}\"</h1>\n", escape(term));
    if books.is_empty() {
        body.push_str("<p>No books matched your search.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for book in books {
            body.push_str(&format!(
                "<li><a href=\"/books/{isbn}\">{title}</a> by {author} ({year})</li>\n",
                isbn = escape(&book.isbn),
                title = escape(&book.title),
                author = escape(&book.author),
                year = book.year,
            ));
        }
        body.push_str("</ul>\n");
    }
    layout("Results", &nav_signed_in(username), &body)
}

/// Book detail page: local data, reviews, supplemental counts, review form
///
/// Renders whether or not `counts` is present; the external lookup being
/// down never blocks the page.
pub fn book_page(
    username: &str,
    book: &Book,
    reviews: &[ReviewWithAuthor],
    average: Option<f64>,
    counts: Option<&ReviewCounts>,
    can_review: bool,
) -> Html<String> {
    let mut body = format!(
        "<h1>{title}</h1>\n<p>by {author}, {year}. ISBN {isbn}</p>\n",
        title = escape(&book.title),
        author = escape(&book.author),
        year = book.year,
        isbn = escape(&book.isbn),
    );

    match average {
        Some(avg) => body.push_str(&format!(
            "<p>Average rating: {:.2} ({} review(s))</p>\n",
            avg,
            reviews.len()
        )),
        None => body.push_str("<p>No reviews yet.</p>\n"),
    }

    if let Some(counts) = counts {
        body.push_str(&format!(
            "<p>Elsewhere: {} ratings, {:.2} average.</p>\n",
            counts.ratings_count, counts.average_rating
        ));
    }

    if !reviews.is_empty() {
        body.push_str("<ul>\n");
        for review in reviews {
            body.push_str(&format!(
                "<li><strong>{username}</strong> rated {rating}/5: {text}</li>\n",
                username = escape(&review.username),
                rating = review.rating,
                text = escape(&review.text),
            ));
        }
        body.push_str("</ul>\n");
    }

    if can_review {
        body.push_str(&format!(
            "<form action=\"/books/{}/reviews\" method=\"post\">\n\
             <select name=\"rating\">\n\
             <option value=\"5\">5</option>\n\
             <option value=\"4\">4</option>\n\
             <option value=\"3\">3</option>\n\
             <option value=\"2\">2</option>\n\
             <option value=\"1\">1</option>\n\
             </select>\n\
             <textarea name=\"text\" placeholder=\"Your review\"></textarea>\n\
             <button type=\"submit\">Submit review</button>\n\
             </form>\n",
            escape(&book.isbn)
        ));
    } else {
        body.push_str("<p>You have already reviewed this book.</p>\n");
    }

    layout(&book.title, &nav_signed_in(username), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_passthrough() {
        assert_eq!(escape("plain text 123"), "plain text 123");
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(escape("a & b \"c\""), "a &amp; b &quot;c&quot;");
    }

    #[test]
    fn test_error_page_escapes_message() {
        let Html(page) = error_page(StatusCode::BAD_REQUEST, "<b>nope</b>");
        assert!(page.contains("400"));
        assert!(page.contains("&lt;b&gt;nope&lt;/b&gt;"));
        assert!(!page.contains("<b>nope</b>"));
    }

    #[test]
    fn test_results_page_escapes_titles() {
        let books = vec![Book {
            id: uuid::Uuid::new_v4(),
            isbn: "1234567890".to_string(),
            title: "Tom & Jerry <1>".to_string(),
            author: "Anon".to_string(),
            year: 1999,
        }];
        let Html(page) = results_page("alice", "tom", &books);
        assert!(page.contains("Tom &amp; Jerry &lt;1&gt;"));
    }

    #[test]
    fn test_book_page_renders_without_external_counts() {
        let book = Book {
            id: uuid::Uuid::new_v4(),
            isbn: "1234567890".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
        };
        let Html(page) = book_page("alice", &book, &[], None, None, true);
        assert!(page.contains("Dune"));
        assert!(page.contains("No reviews yet."));
        assert!(!page.contains("Elsewhere:"));
    }
}
