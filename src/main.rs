use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use catalog_app::modules;
use catalog_db::Db;
use catalog_kernel::{settings::Settings, InitCtx};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "catalog-app starting"
    );

    ensure_database_dir(&settings.database.url)?;

    let db = Db::connect(
        &settings.database.url,
        settings.database.max_connections,
        Duration::from_millis(settings.database.acquire_timeout_ms),
    )
    .await
    .with_context(|| format!("failed to open database at {}", settings.database.url))?;

    let registry = modules::build_registry();

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };

    registry.init_modules(&ctx).await?;

    for (module, migration) in registry.collect_migrations() {
        db.apply_migration(&module, migration.id, migration.up)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
    }

    registry.start_modules(&ctx).await?;

    catalog_http::start_server(&registry, &settings, &db).await?;

    registry.stop_modules().await?;

    Ok(())
}

/// Create the parent directory of a `sqlite:path` url; sqlite creates the
/// file on demand but not the directory.
fn ensure_database_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite:") {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
    }
    Ok(())
}
