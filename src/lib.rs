pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::pairing::PairingService;
use crate::services::storage::UploadStore;
use crate::services::verifier::PairVerifier;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::process::process,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::process::ProcessRequest,
            api::handlers::health::HealthResponse,
            api::error::ErrorResponse,
            models::VerifiedPair,
        )
    ),
    tags(
        (name = "pairing", description = "CSV/PDF pair verification"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: Option<DatabaseConnection>,
    pub store: Arc<dyn UploadStore>,
    pub pairing: Arc<PairingService>,
    pub verifier: Arc<PairVerifier>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn UploadStore>,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            db,
            pairing: Arc::new(PairingService::new(store.clone())),
            verifier: Arc::new(PairVerifier::new(store.clone())),
            store,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    Router::new()
        .route("/", get(api::handlers::pages::home))
        .route(
            "/upload_csv",
            get(api::handlers::pages::upload_csv_form).post(api::handlers::upload::upload_csv),
        )
        .route(
            "/upload_pdf/:filename",
            get(api::handlers::pages::upload_pdf_form).post(api::handlers::upload::upload_pdf),
        )
        .route(
            "/uploaded/:filename",
            get(api::handlers::pages::uploaded).post(api::handlers::pages::uploaded),
        )
        .route("/process", post(api::handlers::process::process))
        .route("/health", get(api::handlers::health::health_check))
        .layer(from_fn(api::middleware::security::security_headers))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_file_size,
        ))
        .with_state(state)
}
