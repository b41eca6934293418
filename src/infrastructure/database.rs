use crate::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Connects to the configured database, if any.
///
/// The upload workflow never queries it, so a missing or unreachable database is
/// logged and the service keeps running without one.
pub async fn setup_database(config: &DatabaseConfig) -> Option<DatabaseConnection> {
    let Some(db_url) = config.connection_url() else {
        info!("📂 Database: not configured");
        return None;
    };

    info!("📂 Database: {}", redact(&db_url));

    let mut opt = ConnectOptions::new(&db_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    match Database::connect(opt).await {
        Ok(db) => {
            info!("✅ Database connected successfully");
            Some(db)
        }
        Err(e) => {
            warn!("⚠️ Database connection failed: {}. Continuing without it.", e);
            None
        }
    }
}

/// Replaces the password of a connection URL for logging
fn redact(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return "<unparseable url>".to_string();
    };
    if url.password().is_none() {
        return raw.to_string();
    }
    match url.set_password(Some("***")) {
        Ok(()) => url.into(),
        Err(()) => "<unparseable url>".to_string(),
    }
}
