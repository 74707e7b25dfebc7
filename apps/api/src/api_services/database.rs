use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::DatabaseConfig;

/// Creates the connection pool without opening a connection.
///
/// Connections are established on first use, so the service starts even when
/// the database is down and reports the outage per request instead.
pub fn build_pool(config: &DatabaseConfig) -> PgPool {
    info!(
        database_host = %config.host,
        database_port = config.port,
        database_name = %config.name,
        max_connections = config.max_connections,
        "configuring postgres pool"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(config.connect_options())
}
