use crate::config::AppConfig;
use crate::services::storage::{LocalUploadStore, UploadStore};
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> anyhow::Result<Arc<LocalUploadStore>> {
    let store = LocalUploadStore::new(&config.upload_folder);
    store.ensure_ready().await?;

    info!("🗂️  Upload folder: {}", store.root().display());

    Ok(Arc::new(store))
}
