use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Author row as stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuthorRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// List row: author plus derived book count from the LEFT JOIN aggregate.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuthorListRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub books_count: i64,
}

/// Flat row from the author/books LEFT JOIN. Book columns are NULL for an
/// author with no books.
#[derive(Debug, Clone, FromRow)]
pub struct AuthorBookJoinRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub book_id: Option<i64>,
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i64>,
    pub book_created_at: Option<String>,
}

/// Book summary nested under a fetched author.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub published_year: Option<i64>,
    pub created_at: String,
}

/// Fetch-one payload: author with its books nested in store order.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorWithBooks {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub books: Vec<BookSummary>,
}

/// Create request body. Fields are optional so that missing input reaches
/// the validation layer and is reported as 400.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// List query parameters; `page` and `limit` stay raw strings for the lenient
/// parsing in the query builder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAuthorsParams {
    pub name: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}
