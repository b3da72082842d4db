//! Embedded schema migrations.

use anyhow::Context;
use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// ## Summary
/// Applies every pending migration.
///
/// Migrations run over a dedicated synchronous connection on the blocking pool.
///
/// ## Errors
/// Returns an error if the connection cannot be established or a migration fails.
#[tracing::instrument(skip(database_url))]
pub async fn run_migrations(database_url: &str) -> anyhow::Result<()> {
    let database_url = database_url.to_owned();

    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let mut conn = PgConnection::establish(&database_url)
            .context("failed to connect for migrations")?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))?;

        if applied.is_empty() {
            tracing::info!("Schema is up to date");
        }
        for version in applied {
            tracing::info!(%version, "Applied migration");
        }
        Ok(())
    })
    .await
    .context("migration task failed")?
}
