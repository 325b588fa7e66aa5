//! HTTP API Layer
//!
//! This crate serves the sales document forms using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: form page, document downloads, submission API, health
//! - **Middleware**: request logging and tracing
//! - **DTOs**: multipart decoding and submission responses
//! - **Error Handling**: consistent `{ error, message, details }` bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_config(config, ledger)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::CoreError;
use domain_sales::{DocumentService, SubmissionLedger};
use domain_template::{TemplateEngine, TemplateStore};

use crate::config::ApiConfig;
use crate::handlers::{documents, health, page, submissions};
use crate::middleware::request_log_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DocumentService>,
    pub ledger: Arc<dyn SubmissionLedger>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(service: DocumentService, config: ApiConfig) -> Self {
        Self {
            ledger: Arc::clone(service.ledger()),
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }

    /// Builds the document service described by `config`
    ///
    /// # Errors
    ///
    /// Fails if the configured timezone is unknown or a limit is zero.
    pub fn from_config(
        config: ApiConfig,
        ledger: Arc<dyn SubmissionLedger>,
    ) -> Result<Self, CoreError> {
        let engine = TemplateEngine::new(TemplateStore::new(config.template_dir.clone()))
            .with_image_constraint(config.image_constraint());
        let mut service = DocumentService::new(engine, ledger, config.document_settings()?);
        if let Some(converter) = config.converter() {
            service = service.with_converter(Arc::new(converter));
        }
        Ok(Self::new(service, config))
    }
}

/// Creates the main router
pub fn create_router(state: AppState) -> Router {
    let max_upload = state.config.max_upload_bytes;

    let public_routes = Router::new()
        .route("/", get(page::index))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let document_routes = Router::new()
        .route("/proposals", post(documents::create_proposal))
        .route("/gerar-pdf", post(documents::create_proposal))
        .route("/contracts", post(documents::create_contract))
        .layer(DefaultBodyLimit::max(max_upload));

    let api_routes = Router::new()
        .route("/proposals", get(submissions::list_proposals))
        .route(
            "/proposals/:id",
            get(submissions::get_proposal).delete(submissions::delete_proposal),
        )
        .route("/proposals/:id/contract", get(submissions::contract_from_proposal))
        .route("/contracts", get(submissions::list_contracts));

    Router::new()
        .merge(public_routes)
        .merge(document_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(axum_middleware::from_fn(request_log_middleware)),
        )
        .with_state(state)
}
