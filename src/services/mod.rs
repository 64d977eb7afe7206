// Upstream recommender clients
pub mod completion;
pub mod space;

pub use completion::CompletionClient;
pub use space::SpaceClient;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{Settings, UpstreamStrategy};
use crate::core::NeighborhoodPriceTable;
use crate::models::PreferenceRequest;

/// Errors that can occur when asking an upstream for recommendations
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream is not configured: {0}")]
    Configuration(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Recommender service error: {status}")]
    Status { status: u16, body: String },

    #[error("Unreadable recommender payload: {reason}")]
    Format { reason: String, raw: String },
}

/// Anything that can turn a validated request into a raw recommendation payload
///
/// The payload is returned as untyped JSON; shaping it is the normalizer's job.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn recommend(&self, request: &PreferenceRequest) -> Result<Value, UpstreamError>;
}

/// Build the source selected by `upstream.strategy`
pub fn build_source(
    settings: &Settings,
    prices: Arc<NeighborhoodPriceTable>,
) -> Result<Arc<dyn RecommendationSource>, UpstreamError> {
    let timeout = Duration::from_secs(settings.upstream.timeout_secs);

    let source: Arc<dyn RecommendationSource> = match settings.upstream.strategy {
        UpstreamStrategy::Space => Arc::new(SpaceClient::new(
            settings.space.url.clone(),
            timeout,
            prices,
        )?),
        UpstreamStrategy::Completion => Arc::new(CompletionClient::new(
            &settings.completion,
            timeout,
            prices,
        )?),
    };

    Ok(source)
}
