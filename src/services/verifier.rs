use crate::models::{BaseName, VerifiedPair};
use crate::services::pairing::PairingError;
use crate::services::storage::UploadStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Confirms both halves of a pair are in the upload folder
pub struct PairVerifier {
    store: Arc<dyn UploadStore>,
}

impl PairVerifier {
    pub fn new(store: Arc<dyn UploadStore>) -> Self {
        Self { store }
    }

    pub async fn verify(&self, filename: &str) -> Result<VerifiedPair, PairingError> {
        if filename.trim().is_empty() {
            return Err(PairingError::MissingInput);
        }

        // Anything the sanitizer would rewrite can never have been stored
        let base = BaseName::parse(filename).ok_or_else(|| {
            debug!("Rejected unsafe base name in verification: {}", filename);
            PairingError::NotFound
        })?;

        let csv_file_name = base.file_name("csv");
        let pdf_file_name = base.file_name("pdf");

        if !(self.store.exists(&csv_file_name).await? && self.store.exists(&pdf_file_name).await?)
        {
            return Err(PairingError::NotFound);
        }

        info!("✅ Pair verified: {}", base);
        Ok(VerifiedPair {
            csv_file_name,
            pdf_file_name,
        })
    }
}
