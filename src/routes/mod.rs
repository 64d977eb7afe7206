// Route exports
pub mod recommendations;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::core::ValidationError;
use crate::models::ErrorResponse;
use crate::services::UpstreamError;

pub use recommendations::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(recommendations::configure),
    );
}

/// Every way an ask request can fail, mapped onto the HTTP error envelope
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl RelayError {
    fn envelope(&self) -> ErrorResponse {
        match self {
            RelayError::Validation(e) => ErrorResponse::new(e.to_string(), None),
            RelayError::Upstream(UpstreamError::Configuration(reason)) => {
                ErrorResponse::new("Error processing request", Some(reason.clone()))
            }
            RelayError::Upstream(UpstreamError::Transport(e)) => {
                ErrorResponse::new("Failed to reach recommender service", Some(e.to_string()))
            }
            RelayError::Upstream(UpstreamError::Status { status, body }) => ErrorResponse::new(
                format!("Recommender service error: {}", status),
                Some(body.clone()),
            ),
            RelayError::Upstream(UpstreamError::Format { reason, raw }) => ErrorResponse::new(
                format!("Recommender returned an unreadable payload: {}", reason),
                Some(raw.clone()),
            ),
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream(UpstreamError::Transport(_))
            | RelayError::Upstream(UpstreamError::Status { .. }) => StatusCode::BAD_GATEWAY,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.envelope())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    RelayError::from(ValidationError::InvalidShape(format!("Invalid JSON: {}", err))).into()
}
