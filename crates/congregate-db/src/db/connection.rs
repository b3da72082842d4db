use std::time::Duration;

use anyhow::Context;
use congregate_core::config::DatabaseConfig;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection<'pool> = PooledConnection<'pool, AsyncPgConnection>;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// ## Summary
/// Creates the connection pool described by `config` and checks out one
/// connection to confirm the database is reachable.
///
/// ## Errors
/// Returns an error if the pool cannot be built or no connection can be made.
#[tracing::instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn create_pool(config: &DatabaseConfig) -> anyhow::Result<DbPool> {
    let size = u32::from(config.max_connections.max(1));
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);

    let pool = Pool::builder()
        .max_size(size)
        .min_idle(Some(1))
        .connection_timeout(CONNECTION_TIMEOUT)
        .build(manager)
        .await
        .context("failed to build connection pool")?;

    drop(pool.get().await.context("database is unreachable")?);

    tracing::info!(pool_size = size, "Database connection pool ready");

    Ok(pool)
}
