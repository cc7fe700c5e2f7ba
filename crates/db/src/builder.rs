//! Parameterized SELECT assembly for list endpoints.
//!
//! Query text and bind values are kept in lexical correspondence: every `?`
//! appended to the statement pushes its value onto the bind list at the same
//! position. Identifiers (sort columns, ASC/DESC) cannot be parameterized in
//! SQL, so they are validated against hardcoded allowlists before being
//! interpolated; all values go through binds.

use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

/// A positional bind value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Null,
}

impl SqlValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn int(value: i64) -> Self {
        Self::Int(value)
    }

    /// `%value%` pattern for LIKE filters.
    pub fn like(value: &str) -> Self {
        Self::Text(format!("%{}%", value))
    }

    pub(crate) fn bind_to<'q>(
        self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            Self::Text(v) => query.bind(v),
            Self::Int(v) => query.bind(v),
            Self::Null => query.bind(None::<i64>),
        }
    }

    pub(crate) fn bind_to_as<'q, T>(
        self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    ) -> QueryAs<'q, Sqlite, T, SqliteArguments<'q>> {
        match self {
            Self::Text(v) => query.bind(v),
            Self::Int(v) => query.bind(v),
            Self::Null => query.bind(None::<i64>),
        }
    }
}

/// Sort direction; anything other than a case-insensitive `ASC` means `DESC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.eq_ignore_ascii_case("ASC") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Builder for paginated SELECT statements.
///
/// Filters are AND-combined in the order they are added; callers add them in
/// a fixed per-entity order so bind positions stay deterministic. The final
/// statement always ends with `LIMIT ? OFFSET ?`, with those two binds after
/// every filter bind.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    base: String,
    conditions: Vec<&'static str>,
    binds: Vec<SqlValue>,
    group_by: Option<&'static str>,
    order_by: Option<String>,
    page: i64,
    limit: i64,
}

impl SelectBuilder {
    /// Start from a fixed base clause (SELECT ... FROM ... [JOIN ...]).
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            conditions: Vec::new(),
            binds: Vec::new(),
            group_by: None,
            order_by: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Add a WHERE predicate with its bind value.
    pub fn filter(mut self, predicate: &'static str, value: SqlValue) -> Self {
        self.conditions.push(predicate);
        self.binds.push(value);
        self
    }

    pub fn group_by(mut self, clause: &'static str) -> Self {
        self.group_by = Some(clause);
        self
    }

    /// Order by a fixed column known at the call site.
    pub fn order_by_column(mut self, column: &'static str, direction: SortDirection) -> Self {
        self.order_by = Some(format!("{} {}", column, direction.as_sql()));
        self
    }

    /// Order by a caller-supplied sort field only when it appears in
    /// `allowed`, a (request name, column) allowlist; unknown sort fields are
    /// silently ignored and the statement carries no ORDER BY clause. The
    /// column side may be table-qualified to disambiguate joins.
    pub fn order_by_whitelisted(
        mut self,
        requested: Option<&str>,
        allowed: &[(&'static str, &'static str)],
        direction: SortDirection,
    ) -> Self {
        if let Some(requested) = requested {
            if let Some((_, column)) = allowed.iter().find(|(name, _)| *name == requested) {
                self.order_by = Some(format!("{} {}", column, direction.as_sql()));
            }
        }
        self
    }

    /// Set the pagination window from raw request values. Non-numeric or
    /// non-positive input falls back to page 1 / limit 10.
    pub fn paginate(mut self, page: Option<&str>, limit: Option<&str>) -> Self {
        self.page = parse_positive(page, DEFAULT_PAGE);
        self.limit = parse_positive(limit, DEFAULT_LIMIT);
        self
    }

    /// Resolved page number (after defaulting).
    pub fn page(&self) -> i64 {
        self.page
    }

    /// Resolved page size (after defaulting).
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Produce the final statement and its bind list.
    pub fn build(self) -> (String, Vec<SqlValue>) {
        let mut sql = self.base;
        let mut binds = self.binds;

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }

        if let Some(group_by) = self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
        }

        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        sql.push_str(" LIMIT ? OFFSET ?");
        let offset = (self.page - 1) * self.limit;
        binds.push(SqlValue::Int(self.limit));
        binds.push(SqlValue::Int(offset));

        (sql, binds)
    }
}

fn parse_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pagination_is_page_one_limit_ten() {
        let (sql, binds) = SelectBuilder::new("SELECT * FROM books").build();

        assert_eq!(sql, "SELECT * FROM books LIMIT ? OFFSET ?");
        assert_eq!(binds, vec![SqlValue::Int(10), SqlValue::Int(0)]);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let builder =
            SelectBuilder::new("SELECT * FROM books").paginate(Some("3"), Some("25"));
        assert_eq!(builder.page(), 3);
        assert_eq!(builder.limit(), 25);

        let (_, binds) = builder.build();
        assert_eq!(binds, vec![SqlValue::Int(25), SqlValue::Int(50)]);
    }

    #[test]
    fn bad_pagination_input_falls_back_to_defaults() {
        for (page, limit) in [
            (Some("abc"), Some("xyz")),
            (Some("0"), Some("-5")),
            (Some("-1"), Some("0")),
            (None, None),
        ] {
            let (_, binds) = SelectBuilder::new("SELECT * FROM books")
                .paginate(page, limit)
                .build();
            assert_eq!(binds, vec![SqlValue::Int(10), SqlValue::Int(0)]);
        }
    }

    #[test]
    fn filters_combine_with_and_in_call_order() {
        let (sql, binds) = SelectBuilder::new("SELECT * FROM books")
            .filter("books.title LIKE ?", SqlValue::like("rust"))
            .filter("books.published_year = ?", SqlValue::int(1999))
            .build();

        assert_eq!(
            sql,
            "SELECT * FROM books WHERE books.title LIKE ? AND books.published_year = ? \
             LIMIT ? OFFSET ?"
        );
        assert_eq!(
            binds,
            vec![
                SqlValue::text("%rust%"),
                SqlValue::Int(1999),
                SqlValue::Int(10),
                SqlValue::Int(0),
            ]
        );
    }

    #[test]
    fn pagination_binds_come_after_filter_binds() {
        let (_, binds) = SelectBuilder::new("SELECT * FROM books")
            .filter("books.title LIKE ?", SqlValue::like("t"))
            .paginate(Some("2"), Some("5"))
            .build();

        assert_eq!(
            binds,
            vec![SqlValue::text("%t%"), SqlValue::Int(5), SqlValue::Int(5)]
        );
    }

    const BOOK_SORT: &[(&str, &str)] = &[
        ("title", "books.title"),
        ("published_year", "books.published_year"),
        ("created_at", "books.created_at"),
    ];

    #[test]
    fn whitelisted_sort_field_is_honored() {
        let (sql, _) = SelectBuilder::new("SELECT * FROM books")
            .order_by_whitelisted(
                Some("published_year"),
                BOOK_SORT,
                SortDirection::parse(Some("asc")),
            )
            .build();

        assert_eq!(
            sql,
            "SELECT * FROM books ORDER BY books.published_year ASC LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn unknown_sort_field_produces_no_order_by() {
        let allowed = BOOK_SORT;
        for requested in [Some("isbn"), Some("id; DROP TABLE books"), None] {
            let (sql, _) = SelectBuilder::new("SELECT * FROM books")
                .order_by_whitelisted(requested, allowed, SortDirection::Desc)
                .build();
            assert!(!sql.contains("ORDER BY"), "unexpected ORDER BY in {sql}");
        }
    }

    #[test]
    fn direction_defaults_to_desc() {
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("ascending")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Desc);
    }

    #[test]
    fn group_by_precedes_order_by() {
        let (sql, _) = SelectBuilder::new(
            "SELECT authors.*, COUNT(books.id) AS books_count FROM authors \
             LEFT JOIN books ON books.author_id = authors.id",
        )
        .group_by("authors.id")
        .order_by_column("books_count", SortDirection::Desc)
        .build();

        assert_eq!(
            sql,
            "SELECT authors.*, COUNT(books.id) AS books_count FROM authors \
             LEFT JOIN books ON books.author_id = authors.id \
             GROUP BY authors.id ORDER BY books_count DESC LIMIT ? OFFSET ?"
        );
    }
}
