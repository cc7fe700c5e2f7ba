use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Book row as stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub published_year: Option<i64>,
    pub author_id: i64,
    pub created_at: String,
}

/// List row: book joined with its author's name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookListRow {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub published_year: Option<i64>,
    pub author_id: i64,
    pub created_at: String,
    pub author: String,
}

/// Fetch-one payload: one flattened row pairing author and book fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookDetailRow {
    pub author_id: i64,
    pub name: String,
    pub email: String,
    pub author_created_at: String,
    pub book_id: i64,
    pub title: String,
    pub isbn: String,
    pub published_year: Option<i64>,
    pub book_created_at: String,
}

/// Create request body. Fields are optional so that missing input reaches
/// the validation layer and is reported as 400.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i64>,
    pub author_id: Option<i64>,
}

/// Partial update body; every field optional, at least one required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i64>,
    pub author_id: Option<i64>,
}

impl UpdateBookRequest {
    /// True when no updatable field was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.isbn.is_none()
            && self.published_year.is_none()
            && self.author_id.is_none()
    }
}

/// List query parameters; `page` and `limit` stay raw strings for the lenient
/// parsing in the query builder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBooksParams {
    pub title: Option<String>,
    pub year: Option<String>,
    pub author: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}
