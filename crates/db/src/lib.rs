//! SQLite access layer: connection pool, the three storage primitives
//! (execute / fetch_all / fetch_first), and the migration runner.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteQueryResult,
    SqliteRow,
};

pub mod builder;

pub use builder::{SelectBuilder, SortDirection, SqlValue};

/// Handle to the SQLite connection pool. Cheap to clone; all clones share
/// the same pool.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open a pooled connection to the database at `url`
    /// (e.g. `sqlite:data/catalog.db`), creating the file if missing.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await?;

        tracing::info!(url, max_connections, "database pool created");

        Ok(Self { pool })
    }

    /// In-memory database on a single connection, for tests.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // One connection only: each sqlite in-memory connection is its own
        // database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run a mutating statement with positional `?` parameters.
    pub async fn execute(
        &self,
        sql: &str,
        params: Vec<SqlValue>,
    ) -> Result<SqliteQueryResult, sqlx::Error> {
        let mut query = sqlx::query(sql);
        for value in params {
            query = value.bind_to(query);
        }
        query.execute(&self.pool).await
    }

    /// Fetch all rows matching a query.
    pub async fn fetch_all<T>(&self, sql: &str, params: Vec<SqlValue>) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut query = sqlx::query_as::<_, T>(sql);
        for value in params {
            query = value.bind_to_as(query);
        }
        query.fetch_all(&self.pool).await
    }

    /// Fetch the first row matching a query, if any.
    pub async fn fetch_first<T>(
        &self,
        sql: &str,
        params: Vec<SqlValue>,
    ) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut query = sqlx::query_as::<_, T>(sql);
        for value in params {
            query = value.bind_to_as(query);
        }
        query.fetch_optional(&self.pool).await
    }

    /// Apply a module migration if it has not been recorded yet. Returns
    /// `true` when the migration ran, `false` when it was already applied.
    pub async fn apply_migration(
        &self,
        module: &str,
        id: &str,
        up: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS schema_migrations (\
                key TEXT PRIMARY KEY, \
                applied_at TEXT DEFAULT CURRENT_TIMESTAMP\
            )",
        )
        .execute(&self.pool)
        .await?;

        let key = format!("{}/{}", module, id);

        let already: Option<(String,)> =
            sqlx::query_as("SELECT key FROM schema_migrations WHERE key = ?")
                .bind(&key)
                .fetch_optional(&self.pool)
                .await?;

        if already.is_some() {
            tracing::debug!(migration = %key, "migration already applied");
            return Ok(false);
        }

        sqlx::raw_sql(up).execute(&self.pool).await?;

        sqlx::query("INSERT INTO schema_migrations (key) VALUES (?)")
            .bind(&key)
            .execute(&self.pool)
            .await?;

        tracing::info!(migration = %key, "migration applied");
        Ok(true)
    }
}

/// Whether a sqlx error is a store-level UNIQUE constraint violation.
/// The application pre-checks uniqueness before writing, but under
/// concurrent writers the constraint is the final backstop.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation)
        }
        _ => false,
    }
}
