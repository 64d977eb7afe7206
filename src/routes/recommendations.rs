use actix_web::{web, HttpResponse, Responder};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

use crate::core::{canned_recommendations, normalize, validate_request};
use crate::models::{HealthResponse, PreferenceRequest, RecommendationResponse};
use crate::routes::RelayError;
use crate::services::RecommendationSource;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecommendationSource>,
    pub test_mode: bool,
}

/// Configure recommendation and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/ai/ask", web::post().to(ask));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        message: "AI API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recommendation endpoint
///
/// POST /api/ai/ask
///
/// Request body:
/// ```json
/// {
///   "type": "villa",
///   "amount": 1500000,
///   "questions_answers": [{ "question": "string", "answer": "string" }],
///   "points": [{ "latitude": 24.71, "longitude": 46.67 }],
///   "neighborhood_price_info": { "<neighborhood>": 123456 }
/// }
/// ```
async fn ask(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, RelayError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("ask", %request_id);

    recommend(state, body.into_inner()).instrument(span).await
}

async fn recommend(
    state: web::Data<AppState>,
    body: Value,
) -> Result<HttpResponse, RelayError> {
    let request = validate_request(&body).inspect_err(|e| {
        tracing::info!("Rejected ask request: {}", e);
    })?;
    log_request(&request);

    if state.test_mode {
        let points = canned_recommendations();
        tracing::info!("Test mode: returning {} canned locations", points.len());
        return Ok(HttpResponse::Ok().json(RecommendationResponse { points }));
    }

    let payload = state.source.recommend(&request).await.inspect_err(|e| {
        tracing::error!("Upstream {} failed: {}", state.source.name(), e);
    })?;

    let normalized = normalize(payload);
    if normalized.is_unrecognized() {
        tracing::warn!("Unexpected upstream response structure, unable to extract points");
    }
    for defect in &normalized.defects {
        tracing::warn!("Defaulted upstream field: {}", defect);
    }

    tracing::info!(
        "Returning {} recommended locations (shape: {}, defaults applied: {})",
        normalized.points.len(),
        normalized.shape,
        normalized.defects.len()
    );

    Ok(HttpResponse::Ok().json(RecommendationResponse {
        points: normalized.points,
    }))
}

fn log_request(request: &PreferenceRequest) {
    tracing::info!(
        "Received ask request: type={}, budget={} SAR, questions={}, reference points={}",
        request.property_type,
        request.amount,
        request.questions_answers.len(),
        request.points.len()
    );

    for (i, qa) in request.questions_answers.iter().enumerate() {
        tracing::debug!("Q&A {}: {}: {}", i + 1, qa.question, qa.answer);
    }
    for (i, point) in request.points.iter().enumerate() {
        tracing::debug!("Reference point {}: lat {}, lng {}", i + 1, point.latitude, point.longitude);
    }
    if let Some(prices) = &request.neighborhood_price_info {
        tracing::debug!("Caller supplied {} neighborhood prices", prices.len());
    }
}
