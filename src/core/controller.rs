use std::sync::Arc;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;

#[derive(Clone)]
pub struct AppState {
    pub(crate) config: Configuration,
    pub(crate) catalog_service: Arc<dyn CatalogService>,
}

impl AppState {
    // builds the service once so that every request shares the same store
    pub async fn new(branch: &str, store: RepositoryStore) -> AppState {
        let config = Configuration::new(branch);
        let catalog_service = factory::create_catalog_service(&config, store).await;
        AppState {
            config,
            catalog_service: Arc::from(catalog_service),
        }
    }
}

// ApiErrors is the body of every failed response
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub(crate) struct ApiErrors {
    pub errors: Vec<String>,
}

impl ApiErrors {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

pub(crate) type ServerError = (StatusCode, Json<ApiErrors>);

// extractor rejections keep their status but share the error body
pub(crate) fn rejection_to_server_error(status: StatusCode, message: String) -> ServerError {
    (status, Json(ApiErrors::new(vec![message])))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::Database { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CommandError::DuplicateKey { .. } => {
                StatusCode::BAD_REQUEST
            }
            CommandError::InvalidInput { .. } => {
                StatusCode::BAD_REQUEST
            }
            CommandError::InvalidArgument { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CommandError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            CommandError::Runtime { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CommandError::Serialization { .. } => {
                StatusCode::BAD_REQUEST
            }
            CommandError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
        };
        if status.is_server_error() {
            tracing::error!(?err, "request failed");
        }
        (status, Json(ApiErrors::new(err.messages())))
    }
}
