//! Book service logic: create with ISBN uniqueness and author existence,
//! list with filters and sort whitelist, fetch-one, partial update with
//! self-excluding ISBN re-check.

use catalog_db::{Db, SelectBuilder, SortDirection, SqlValue};
use catalog_http::{ApiError, Pagination};

use crate::modules::authors::models::AuthorRow;

use super::models::{BookDetailRow, BookListRow, BookRow, ListBooksParams, UpdateBookRequest};

/// Sort fields a client may request on the list endpoint, mapped to their
/// qualified columns. Anything else yields no ORDER BY.
const BOOK_SORT_FIELDS: &[(&str, &str)] = &[
    ("title", "books.title"),
    ("published_year", "books.published_year"),
    ("created_at", "books.created_at"),
];

const BOOK_LIST_BASE: &str = "SELECT books.id, books.title, books.isbn, \
     books.published_year, books.author_id, books.created_at, \
     authors.name AS author FROM books \
     INNER JOIN authors ON authors.id = books.author_id";

const BOOK_DETAIL_QUERY: &str = "SELECT authors.id AS author_id, authors.name, \
     authors.email, authors.created_at AS author_created_at, \
     books.id AS book_id, books.title, books.isbn, books.published_year, \
     books.created_at AS book_created_at FROM books \
     INNER JOIN authors ON authors.id = books.author_id WHERE books.id = ?";

/// Create a book. The ISBN conflict check runs before the author existence
/// check so error precedence is deterministic.
pub async fn create_book(
    db: &Db,
    title: &str,
    isbn: &str,
    published_year: Option<i64>,
    author_id: i64,
) -> Result<(), ApiError> {
    let duplicate: Option<BookRow> = db
        .fetch_first(
            "SELECT * FROM books WHERE isbn = ?",
            vec![SqlValue::text(isbn)],
        )
        .await?;

    if duplicate.is_some() {
        return Err(ApiError::conflict("Book with this isbn already exists"));
    }

    let author: Option<AuthorRow> = db
        .fetch_first(
            "SELECT * FROM authors WHERE id = ?",
            vec![SqlValue::int(author_id)],
        )
        .await?;

    if author.is_none() {
        return Err(ApiError::bad_request(format!(
            "Author with id {} does not exist",
            author_id
        )));
    }

    db.execute(
        "INSERT INTO books (title, isbn, published_year, author_id) VALUES (?, ?, ?, ?)",
        vec![
            SqlValue::text(title),
            SqlValue::text(isbn),
            published_year.map_or(SqlValue::Null, SqlValue::Int),
            SqlValue::int(author_id),
        ],
    )
    .await?;

    tracing::info!(isbn, author_id, "book created");
    Ok(())
}

/// List books with their author names. Filters AND-combine in the fixed
/// order title, year, author; sort honored only from the whitelist.
pub async fn list_books(
    db: &Db,
    params: &ListBooksParams,
    year: Option<i64>,
) -> Result<(Vec<BookListRow>, Pagination), ApiError> {
    let mut builder = SelectBuilder::new(BOOK_LIST_BASE);

    if let Some(title) = present(params.title.as_deref()) {
        builder = builder.filter("books.title LIKE ?", SqlValue::like(title));
    }
    if let Some(year) = year {
        builder = builder.filter("books.published_year = ?", SqlValue::int(year));
    }
    if let Some(author) = present(params.author.as_deref()) {
        builder = builder.filter("authors.name LIKE ?", SqlValue::like(author));
    }

    let direction = SortDirection::parse(params.order.as_deref());
    builder = builder
        .order_by_whitelisted(params.sort.as_deref(), BOOK_SORT_FIELDS, direction)
        .paginate(params.page.as_deref(), params.limit.as_deref());

    let page = builder.page();
    let limit = builder.limit();
    let (sql, binds) = builder.build();

    let rows: Vec<BookListRow> = db.fetch_all(&sql, binds).await?;
    let count = rows.len();

    Ok((rows, Pagination { page, limit, count }))
}

/// Fetch a single book with its author joined in, or NotFound.
pub async fn get_book(db: &Db, id: i64) -> Result<BookDetailRow, ApiError> {
    let row: Option<BookDetailRow> = db
        .fetch_first(BOOK_DETAIL_QUERY, vec![SqlValue::int(id)])
        .await?;

    row.ok_or_else(|| {
        ApiError::not_found(format!("No book with id {} exists in the books table", id))
    })
}

/// Partially update a book. The target must exist and at least one field
/// must be supplied; both failures are 400, distinct from fetch's 404. A new
/// ISBN conflicts only when another row already holds it; re-submitting the
/// book's own ISBN is allowed.
pub async fn update_book(db: &Db, id: i64, request: &UpdateBookRequest) -> Result<(), ApiError> {
    let existing: Option<BookRow> = db
        .fetch_first("SELECT * FROM books WHERE id = ?", vec![SqlValue::int(id)])
        .await?;

    if existing.is_none() {
        return Err(ApiError::bad_request(format!(
            "No such book with id {} exists in the books table",
            id
        )));
    }

    if request.is_empty() {
        return Err(ApiError::bad_request(
            "At least one field (title, isbn, published_year, author_id) must be provided",
        ));
    }

    if let Some(isbn) = request.isbn.as_deref() {
        let holder: Option<BookRow> = db
            .fetch_first(
                "SELECT * FROM books WHERE isbn = ?",
                vec![SqlValue::text(isbn)],
            )
            .await?;

        if let Some(holder) = holder {
            if holder.id != id {
                return Err(ApiError::conflict(
                    "Book with this isbn already exists, update it to something else",
                ));
            }
        }
    }

    // SET clause in the fixed field order; target id is bound last. A
    // replacement author_id is intentionally not checked for existence,
    // matching create-time-only enforcement.
    let mut assignments: Vec<&str> = Vec::new();
    let mut binds: Vec<SqlValue> = Vec::new();

    if let Some(title) = &request.title {
        assignments.push("title = ?");
        binds.push(SqlValue::text(title.clone()));
    }
    if let Some(isbn) = &request.isbn {
        assignments.push("isbn = ?");
        binds.push(SqlValue::text(isbn.clone()));
    }
    if let Some(published_year) = request.published_year {
        assignments.push("published_year = ?");
        binds.push(SqlValue::int(published_year));
    }
    if let Some(author_id) = request.author_id {
        assignments.push("author_id = ?");
        binds.push(SqlValue::int(author_id));
    }

    let sql = format!("UPDATE books SET {} WHERE id = ?", assignments.join(", "));
    binds.push(SqlValue::int(id));

    db.execute(&sql, binds).await?;

    tracing::info!(id, "book updated");
    Ok(())
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{authors, books};
    use catalog_kernel::Module;

    async fn test_db() -> Db {
        let db = Db::in_memory().await.unwrap();
        for module in [authors::create_module(), books::create_module()] {
            for migration in module.migrations() {
                db.apply_migration(module.name(), migration.id, migration.up)
                    .await
                    .unwrap();
            }
        }
        db
    }

    async fn insert_author(db: &Db, name: &str, email: &str) -> i64 {
        db.execute(
            "INSERT INTO authors (name, email) VALUES (?, ?)",
            vec![SqlValue::text(name), SqlValue::text(email)],
        )
        .await
        .unwrap()
        .last_insert_rowid()
    }

    async fn fetch_book(db: &Db, id: i64) -> BookRow {
        db.fetch_first("SELECT * FROM books WHERE id = ?", vec![SqlValue::int(id)])
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn create_rejects_duplicate_isbn() {
        let db = test_db().await;
        let author = insert_author(&db, "Author", "a@example.com").await;
        create_book(&db, "First", "1234567890", Some(1999), author)
            .await
            .unwrap();

        let err = create_book(&db, "Second", "1234567890", None, author)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    #[tokio::test]
    async fn isbn_conflict_wins_over_missing_author() {
        let db = test_db().await;
        let author = insert_author(&db, "Author", "a@example.com").await;
        create_book(&db, "First", "1234567890", None, author)
            .await
            .unwrap();

        // Duplicate isbn AND nonexistent author: conflict is reported first.
        let err = create_book(&db, "Second", "1234567890", None, 999)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    #[tokio::test]
    async fn create_rejects_missing_author() {
        let db = test_db().await;
        let err = create_book(&db, "Orphan", "1234567890", None, 42)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn create_allows_null_published_year() {
        let db = test_db().await;
        let author = insert_author(&db, "Author", "a@example.com").await;
        create_book(&db, "Undated", "1234567890", None, author)
            .await
            .unwrap();

        let book = fetch_book(&db, 1).await;
        assert_eq!(book.published_year, None);
    }

    #[tokio::test]
    async fn list_joins_author_name_and_filters_combine() {
        let db = test_db().await;
        let rowling = insert_author(&db, "J.K. Rowling", "jk@example.com").await;
        let martin = insert_author(&db, "G.R.R. Martin", "grrm@example.com").await;
        create_book(&db, "Harry Potter", "1234567890", Some(1997), rowling)
            .await
            .unwrap();
        create_book(&db, "Game of Thrones", "0123456789", Some(1996), martin)
            .await
            .unwrap();

        let params = ListBooksParams {
            title: Some("potter".to_string()),
            ..Default::default()
        };
        let (rows, pagination) = list_books(&db, &params, Some(1997)).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Harry Potter");
        assert_eq!(rows[0].author, "J.K. Rowling");
        assert_eq!(pagination, Pagination { page: 1, limit: 10, count: 1 });
    }

    #[tokio::test]
    async fn list_sorts_by_whitelisted_field() {
        let db = test_db().await;
        let author = insert_author(&db, "Author", "a@example.com").await;
        create_book(&db, "Older", "1111111111", Some(1950), author)
            .await
            .unwrap();
        create_book(&db, "Newer", "2222222222", Some(2000), author)
            .await
            .unwrap();

        let params = ListBooksParams {
            sort: Some("published_year".to_string()),
            order: Some("asc".to_string()),
            ..Default::default()
        };
        let (rows, _) = list_books(&db, &params, None).await.unwrap();
        let years: Vec<_> = rows.iter().map(|r| r.published_year).collect();
        assert_eq!(years, vec![Some(1950), Some(2000)]);
    }

    #[tokio::test]
    async fn list_pagination_windows_results() {
        let db = test_db().await;
        let author = insert_author(&db, "Author", "a@example.com").await;
        for i in 0..5 {
            create_book(
                &db,
                &format!("Book {}", i),
                &format!("000000000{}", i),
                Some(1990 + i),
                author,
            )
            .await
            .unwrap();
        }

        let params = ListBooksParams {
            sort: Some("published_year".to_string()),
            order: Some("ASC".to_string()),
            page: Some("2".to_string()),
            limit: Some("2".to_string()),
            ..Default::default()
        };
        let (rows, pagination) = list_books(&db, &params, None).await.unwrap();

        assert_eq!(pagination, Pagination { page: 2, limit: 2, count: 2 });
        let years: Vec<_> = rows.iter().map(|r| r.published_year).collect();
        assert_eq!(years, vec![Some(1992), Some(1993)]);
    }

    #[tokio::test]
    async fn fetch_one_returns_flattened_author_and_book() {
        let db = test_db().await;
        let author = insert_author(&db, "J.K. Rowling", "jk@example.com").await;
        create_book(&db, "Harry Potter", "1234567890", Some(1997), author)
            .await
            .unwrap();

        let detail = get_book(&db, 1).await.unwrap();
        assert_eq!(detail.book_id, 1);
        assert_eq!(detail.title, "Harry Potter");
        assert_eq!(detail.author_id, author);
        assert_eq!(detail.name, "J.K. Rowling");
        assert_eq!(detail.email, "jk@example.com");
    }

    #[tokio::test]
    async fn fetch_one_missing_book_is_not_found() {
        let db = test_db().await;
        let err = get_book(&db, 99).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_missing_book_is_bad_request() {
        let db = test_db().await;
        let request = UpdateBookRequest {
            title: Some("New".to_string()),
            ..Default::default()
        };
        let err = update_book(&db, 1, &request).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn update_with_no_fields_is_bad_request() {
        let db = test_db().await;
        let author = insert_author(&db, "Author", "a@example.com").await;
        create_book(&db, "Book", "1234567890", None, author)
            .await
            .unwrap();

        let err = update_book(&db, 1, &UpdateBookRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));

        // Nothing changed.
        let book = fetch_book(&db, 1).await;
        assert_eq!(book.title, "Book");
    }

    #[tokio::test]
    async fn update_to_own_isbn_succeeds() {
        let db = test_db().await;
        let author = insert_author(&db, "Author", "a@example.com").await;
        create_book(&db, "Book", "1234567890", None, author)
            .await
            .unwrap();

        let request = UpdateBookRequest {
            title: Some("Renamed".to_string()),
            isbn: Some("1234567890".to_string()),
            ..Default::default()
        };
        update_book(&db, 1, &request).await.unwrap();

        let book = fetch_book(&db, 1).await;
        assert_eq!(book.title, "Renamed");
        assert_eq!(book.isbn, "1234567890");
    }

    #[tokio::test]
    async fn update_to_another_books_isbn_conflicts_without_writing() {
        let db = test_db().await;
        let author = insert_author(&db, "Author", "a@example.com").await;
        create_book(&db, "Five", "5555555555", None, author)
            .await
            .unwrap();
        create_book(&db, "Seven", "7777777777", None, author)
            .await
            .unwrap();

        let request = UpdateBookRequest {
            title: Some("Stolen".to_string()),
            isbn: Some("7777777777".to_string()),
            ..Default::default()
        };
        let err = update_book(&db, 1, &request).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));

        let book = fetch_book(&db, 1).await;
        assert_eq!(book.title, "Five");
        assert_eq!(book.isbn, "5555555555");
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let db = test_db().await;
        let author = insert_author(&db, "Author", "a@example.com").await;
        create_book(&db, "Original", "1234567890", Some(1999), author)
            .await
            .unwrap();

        let request = UpdateBookRequest {
            published_year: Some(2001),
            ..Default::default()
        };
        update_book(&db, 1, &request).await.unwrap();

        let book = fetch_book(&db, 1).await;
        assert_eq!(book.title, "Original");
        assert_eq!(book.isbn, "1234567890");
        assert_eq!(book.published_year, Some(2001));
        assert_eq!(book.author_id, author);
    }
}
