//! Author service logic: create with email uniqueness, list with book-count
//! aggregation, fetch-one with nested books.

use catalog_db::{Db, SelectBuilder, SortDirection, SqlValue};
use catalog_http::{ApiError, Pagination};

use super::models::{
    AuthorBookJoinRow, AuthorListRow, AuthorRow, AuthorWithBooks, BookSummary, ListAuthorsParams,
};

const AUTHOR_LIST_BASE: &str = "SELECT authors.id, authors.name, authors.email, \
     authors.created_at, COUNT(books.id) AS books_count FROM authors \
     LEFT JOIN books ON books.author_id = authors.id";

const AUTHOR_BOOKS_QUERY: &str = "SELECT authors.id, authors.name, authors.email, \
     authors.created_at, books.id AS book_id, books.title, books.isbn, \
     books.published_year, books.created_at AS book_created_at FROM authors \
     LEFT JOIN books ON books.author_id = authors.id WHERE authors.id = ?";

/// Create an author after checking that the email is not already taken.
pub async fn create_author(db: &Db, name: &str, email: &str) -> Result<(), ApiError> {
    let existing: Option<AuthorRow> = db
        .fetch_first(
            "SELECT * FROM authors WHERE email = ?",
            vec![SqlValue::text(email)],
        )
        .await?;

    if existing.is_some() {
        return Err(ApiError::conflict("Author with this email already exists"));
    }

    db.execute(
        "INSERT INTO authors (name, email) VALUES (?, ?)",
        vec![SqlValue::text(name), SqlValue::text(email)],
    )
    .await?;

    tracing::info!(email, "author created");
    Ok(())
}

/// List authors with their book counts; optional case-insensitive name
/// filter, ordered by book count, paginated.
pub async fn list_authors(
    db: &Db,
    params: &ListAuthorsParams,
) -> Result<(Vec<AuthorListRow>, Pagination), ApiError> {
    let mut builder = SelectBuilder::new(AUTHOR_LIST_BASE);

    if let Some(name) = present(params.name.as_deref()) {
        builder = builder.filter("authors.name LIKE ?", SqlValue::like(name));
    }

    let direction = SortDirection::parse(params.order.as_deref());
    builder = builder
        .group_by("authors.id")
        .order_by_column("books_count", direction)
        .paginate(params.page.as_deref(), params.limit.as_deref());

    let page = builder.page();
    let limit = builder.limit();
    let (sql, binds) = builder.build();

    let rows: Vec<AuthorListRow> = db.fetch_all(&sql, binds).await?;
    let count = rows.len();

    Ok((rows, Pagination { page, limit, count }))
}

/// Fetch a single author with its books nested, or NotFound.
pub async fn get_author(db: &Db, author_id: i64) -> Result<AuthorWithBooks, ApiError> {
    let rows: Vec<AuthorBookJoinRow> = db
        .fetch_all(AUTHOR_BOOKS_QUERY, vec![SqlValue::int(author_id)])
        .await?;

    fold_author_rows(rows).ok_or_else(|| {
        ApiError::not_found(format!(
            "No author with id {} exists in the authors table",
            author_id
        ))
    })
}

/// Fold the flat join rows into one author carrying its books in store
/// order. An author with zero books yields a single row whose book columns
/// are all NULL; that synthetic row must not become a books entry.
pub fn fold_author_rows(rows: Vec<AuthorBookJoinRow>) -> Option<AuthorWithBooks> {
    let first = rows.first()?;

    let mut author = AuthorWithBooks {
        id: first.id,
        name: first.name.clone(),
        email: first.email.clone(),
        created_at: first.created_at.clone(),
        books: Vec::new(),
    };

    for row in rows {
        if let (Some(id), Some(title), Some(isbn), Some(created_at)) =
            (row.book_id, row.title, row.isbn, row.book_created_at)
        {
            author.books.push(BookSummary {
                id,
                title,
                isbn,
                published_year: row.published_year,
                created_at,
            });
        }
    }

    Some(author)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
