use crate::AppState;
use crate::api::error::AppError;
use crate::services::pairing::{IncomingFile, PairStep, PairingError, PairingState};
use axum::{
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let step = PairStep::Csv;
    let outcome = receive_file(&state, step.clone(), multipart).await;
    respond(&step, outcome)
}

pub async fn upload_pdf(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let base = state.pairing.resume(&filename)?;
    let step = PairStep::Pdf(base);
    let outcome = receive_file(&state, step.clone(), multipart).await;
    respond(&step, outcome)
}

/// Streams the first `file` part into the pairing workflow
async fn receive_file(
    state: &AppState,
    step: PairStep,
    mut multipart: Multipart,
) -> Result<PairingState, PairingError> {
    let result = async {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            if field.name() != Some("file") {
                continue;
            }
            // No filename attribute is treated like an empty selection
            let filename = field.file_name().unwrap_or_default().to_string();

            let reader = StreamReader::new(field.map_err(std::io::Error::other));
            let upload = IncomingFile {
                filename,
                reader: Box::new(reader),
            };
            return state
                .pairing
                .accept(step.clone(), Some(upload))
                .await
                .map_err(body_limit_error);
        }

        state.pairing.accept(step.clone(), None).await
    }
    .await;

    if let Err(e) = &result {
        // Drain what is left so the client sees our response instead of a reset connection
        tracing::warn!("Upload rejected: {}. Consuming remaining stream...", e);
        while let Ok(Some(mut field)) = multipart.next_field().await {
            while let Ok(Some(_)) = field.chunk().await {}
        }
    }

    result
}

fn multipart_error(err: MultipartError) -> PairingError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PairingError::PayloadTooLarge
    } else {
        PairingError::Malformed(err.body_text())
    }
}

/// A body limit hit while streaming a part surfaces as a storage error
fn body_limit_error(err: PairingError) -> PairingError {
    let PairingError::Storage(inner) = &err else {
        return err;
    };
    let hit_limit = inner.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .and_then(|io| io.get_ref())
            .and_then(|source| source.downcast_ref::<MultipartError>())
            .is_some_and(|e| e.status() == StatusCode::PAYLOAD_TOO_LARGE)
    });
    if hit_limit {
        PairingError::PayloadTooLarge
    } else {
        err
    }
}

fn respond(step: &PairStep, outcome: Result<PairingState, PairingError>) -> Result<Response, AppError> {
    match outcome {
        Ok(next) => Ok(Redirect::to(&next.location()).into_response()),
        Err(e) if e.is_form_error() => {
            Ok(flash_redirect(&step.current_state().location(), &e.to_string()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Sends the user back to `location` with `message` shown on the form
pub fn flash_redirect(location: &str, message: &str) -> Redirect {
    match serde_urlencoded::to_string([("error", message)]) {
        Ok(query) => Redirect::to(&format!("{}?{}", location, query)),
        Err(_) => Redirect::to(location),
    }
}
