use crate::models::BaseName;
use crate::services::storage::UploadStore;
use crate::utils::validation::{allowed_file, file_extension, sanitize_filename};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncRead;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum PairingError {
    #[error("No file part")]
    MissingFilePart,

    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed")]
    DisallowedExtension,

    #[error("No filename provided")]
    MissingInput,

    #[error("File not found")]
    NotFound,

    #[error("Malformed upload: {0}")]
    Malformed(String),

    #[error("Request body exceeds the maximum allowed limit")]
    PayloadTooLarge,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl PairingError {
    /// Errors the upload forms report back to the user instead of failing the request
    pub fn is_form_error(&self) -> bool {
        matches!(
            self,
            PairingError::MissingFilePart
                | PairingError::EmptyFilename
                | PairingError::DisallowedExtension
        )
    }
}

/// Where a pair currently stands in the two-step upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingState {
    AwaitingCsv,
    AwaitingPdf(BaseName),
    Complete(BaseName),
}

impl PairingState {
    /// Page that serves this state
    pub fn location(&self) -> String {
        match self {
            PairingState::AwaitingCsv => "/upload_csv".to_string(),
            PairingState::AwaitingPdf(base) => format!("/upload_pdf/{}", base),
            PairingState::Complete(base) => format!("/uploaded/{}", base),
        }
    }
}

/// Which half of the pair an upload is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairStep {
    Csv,
    Pdf(BaseName),
}

impl PairStep {
    pub fn expected_extension(&self) -> &'static str {
        match self {
            PairStep::Csv => "csv",
            PairStep::Pdf(_) => "pdf",
        }
    }

    /// The state a rejected upload leaves the pair in
    pub fn current_state(&self) -> PairingState {
        match self {
            PairStep::Csv => PairingState::AwaitingCsv,
            PairStep::Pdf(base) => PairingState::AwaitingPdf(base.clone()),
        }
    }
}

/// A file part received from the client
pub struct IncomingFile<'a> {
    pub filename: String,
    pub reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
}

pub struct PairingService {
    store: Arc<dyn UploadStore>,
}

impl PairingService {
    pub fn new(store: Arc<dyn UploadStore>) -> Self {
        Self { store }
    }

    /// Parses the base name carried in a PDF or completion page URL
    pub fn resume(&self, raw_base: &str) -> Result<BaseName, PairingError> {
        BaseName::parse(raw_base).ok_or(PairingError::NotFound)
    }

    /// Validates and stores one half of a pair, returning the state it moves to.
    /// Nothing is written unless the file passes every check.
    pub async fn accept(
        &self,
        step: PairStep,
        upload: Option<IncomingFile<'_>>,
    ) -> Result<PairingState, PairingError> {
        let upload = upload.ok_or(PairingError::MissingFilePart)?;

        if upload.filename.is_empty() {
            return Err(PairingError::EmptyFilename);
        }

        let sanitized = sanitize_filename(&upload.filename);
        if sanitized.is_empty() {
            warn!("Upload filename '{}' sanitized to nothing", upload.filename);
            return Err(PairingError::EmptyFilename);
        }

        let expected = step.expected_extension();
        let extension = file_extension(&sanitized);
        if !allowed_file(&sanitized) || extension.as_deref() != Some(expected) {
            warn!(
                "Rejected '{}' for {} step: extension {:?} not allowed",
                sanitized, expected, extension
            );
            return Err(PairingError::DisallowedExtension);
        }

        match step {
            PairStep::Csv => {
                let base = BaseName::from_filename(&sanitized).ok_or(PairingError::EmptyFilename)?;
                let stored = self
                    .store
                    .save_stream(&base.file_name(expected), upload.reader)
                    .await?;
                info!("📄 CSV stored: {} ({} bytes)", stored.key, stored.size);
                Ok(PairingState::AwaitingPdf(base))
            }
            PairStep::Pdf(base) => {
                let stored = self
                    .store
                    .save_stream(&base.file_name(expected), upload.reader)
                    .await?;
                info!("📎 PDF stored: {} ({} bytes)", stored.key, stored.size);
                Ok(PairingState::Complete(base))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::LocalUploadStore;

    fn incoming<'a>(filename: &str, data: &'a [u8]) -> Option<IncomingFile<'a>> {
        Some(IncomingFile {
            filename: filename.to_string(),
            reader: Box::new(data),
        })
    }

    fn setup() -> (tempfile::TempDir, Arc<LocalUploadStore>, PairingService) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalUploadStore::new(dir.path()));
        let service = PairingService::new(store.clone());
        (dir, store, service)
    }

    #[tokio::test]
    async fn test_full_pairing() {
        let (_dir, store, service) = setup();

        let state = service
            .accept(PairStep::Csv, incoming("report.csv", b"a,b\n"))
            .await
            .unwrap();
        let base = BaseName::parse("report").unwrap();
        assert_eq!(state, PairingState::AwaitingPdf(base.clone()));
        assert_eq!(state.location(), "/upload_pdf/report");

        let state = service
            .accept(PairStep::Pdf(base.clone()), incoming("scan.pdf", b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(state, PairingState::Complete(base));
        assert_eq!(state.location(), "/uploaded/report");

        assert_eq!(store.read("report.csv").await.unwrap(), b"a,b\n");
        assert_eq!(store.read("report.pdf").await.unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_csv_base_name_is_sanitized() {
        let (_dir, store, service) = setup();

        let state = service
            .accept(PairStep::Csv, incoming("../../Q3 Sales.CSV", b"x"))
            .await
            .unwrap();
        assert_eq!(state.location(), "/upload_pdf/Q3_Sales");
        assert!(store.exists("Q3_Sales.csv").await.unwrap());
    }

    #[tokio::test]
    async fn test_uppercase_pdf_extension_is_normalized() {
        let (_dir, store, service) = setup();
        let base = BaseName::parse("report").unwrap();

        service
            .accept(PairStep::Pdf(base), incoming("SCAN.PDF", b"%PDF"))
            .await
            .unwrap();
        assert!(store.exists("report.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_validation_order() {
        let (_dir, _store, service) = setup();

        let err = service.accept(PairStep::Csv, None).await.unwrap_err();
        assert!(matches!(err, PairingError::MissingFilePart));
        assert_eq!(err.to_string(), "No file part");

        let err = service
            .accept(PairStep::Csv, incoming("", b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PairingError::EmptyFilename));
        assert_eq!(err.to_string(), "No selected file");

        let err = service
            .accept(PairStep::Csv, incoming("???", b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PairingError::EmptyFilename));

        let err = service
            .accept(PairStep::Csv, incoming("notes.txt", b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PairingError::DisallowedExtension));
        assert!(err.is_form_error());
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let (dir, _store, service) = setup();

        for name in ["notes.txt", "payload.exe", "csv"] {
            let _ = service.accept(PairStep::Csv, incoming(name, b"x")).await;
        }
        let base = BaseName::parse("report").unwrap();
        let _ = service
            .accept(PairStep::Pdf(base), incoming("image.png", b"x"))
            .await;

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_step_requires_its_own_extension() {
        let (dir, _store, service) = setup();

        let err = service
            .accept(PairStep::Csv, incoming("scan.pdf", b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PairingError::DisallowedExtension));

        let base = BaseName::parse("report").unwrap();
        let err = service
            .accept(PairStep::Pdf(base), incoming("other.csv", b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PairingError::DisallowedExtension));

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_resume() {
        let (_dir, _store, service) = setup();

        assert_eq!(service.resume("report").unwrap().as_str(), "report");
        assert!(matches!(
            service.resume("../secret"),
            Err(PairingError::NotFound)
        ));
        assert_eq!(
            PairStep::Pdf(service.resume("report").unwrap()).current_state().location(),
            "/upload_pdf/report"
        );
    }
}
