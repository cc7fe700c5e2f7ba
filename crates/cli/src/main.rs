use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use catalog_db::Db;
use catalog_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "catalog-cli", about = "Maintenance tasks for the catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending module migrations.
    Migrate,
    /// Apply migrations and insert sample authors and books.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry);

    let cli = Cli::parse();

    let db = Db::connect(
        &settings.database.url,
        settings.database.max_connections,
        Duration::from_millis(settings.database.acquire_timeout_ms),
    )
    .await
    .with_context(|| format!("failed to open database at {}", settings.database.url))?;

    match cli.command {
        Command::Migrate => migrate(&db).await?,
        Command::Seed => {
            migrate(&db).await?;
            seed(&db).await?;
        }
    }

    Ok(())
}

async fn migrate(db: &Db) -> anyhow::Result<()> {
    let registry = catalog_app::modules::build_registry();

    for (module, migration) in registry.collect_migrations() {
        let applied = db
            .apply_migration(&module, migration.id, migration.up)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;

        if applied {
            tracing::info!(module = %module, id = migration.id, "applied migration");
        }
    }

    Ok(())
}

/// Sample rows for local development. Idempotent via INSERT OR IGNORE on the
/// unique email/isbn columns.
async fn seed(db: &Db) -> anyhow::Result<()> {
    const AUTHORS: &[(&str, &str)] = &[
        ("sahil", "sahil@gmail.com"),
        ("sahil2", "sahil2@gmail.com"),
    ];
    const BOOKS: &[(&str, &str, i64, i64)] = &[
        ("Harry Potter", "1234567890", 1997, 1),
        ("Game of Thrones", "0123456789", 1996, 2),
    ];

    for (name, email) in AUTHORS {
        db.execute(
            "INSERT OR IGNORE INTO authors (name, email) VALUES (?, ?)",
            vec![
                catalog_db::SqlValue::text(*name),
                catalog_db::SqlValue::text(*email),
            ],
        )
        .await?;
        tracing::info!(name, "seeded author");
    }

    for (title, isbn, year, author_id) in BOOKS {
        db.execute(
            "INSERT OR IGNORE INTO books (title, isbn, published_year, author_id) \
             VALUES (?, ?, ?, ?)",
            vec![
                catalog_db::SqlValue::text(*title),
                catalog_db::SqlValue::text(*isbn),
                catalog_db::SqlValue::int(*year),
                catalog_db::SqlValue::int(*author_id),
            ],
        )
        .await?;
        tracing::info!(title, "seeded book");
    }

    Ok(())
}
