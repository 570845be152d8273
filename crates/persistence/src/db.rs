//! MongoDB connection management.

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::Duration;
use tracing::info;

/// Database used when neither the configuration nor the URI names one.
pub const DEFAULT_DATABASE_NAME: &str = "todos";

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: Option<String>,
    pub app_name: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

/// Connects to MongoDB and verifies the connection with a `ping`.
///
/// The returned handle is cheap to clone and shares the driver's internal
/// connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&config.url).await?;
    options.app_name = Some(config.app_name.clone());
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    let client = Client::with_options(options)?;
    let database = select_database(&client, config.name.as_deref());

    database.run_command(doc! { "ping": 1 }, None).await?;
    info!(database = %database.name(), "Connected to MongoDB");

    Ok(database)
}

/// Picks the configured database, then the URI default, then [`DEFAULT_DATABASE_NAME`].
fn select_database(client: &Client, name: Option<&str>) -> Database {
    match name.filter(|n| !n.is_empty()) {
        Some(name) => client.database(name),
        None => client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE_NAME)),
    }
}
