use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::core::NeighborhoodPriceTable;
use crate::models::{Coordinate, PreferenceRequest, QuestionAnswer};
use crate::services::{RecommendationSource, UpstreamError};

/// Client for the hosted structured recommender
///
/// Forwards the validated request as JSON, together with the neighborhood
/// price table (or the caller's replacement for it), and hands back whatever
/// JSON the Space answers with.
pub struct SpaceClient {
    url: String,
    client: Client,
    prices: Arc<NeighborhoodPriceTable>,
}

#[derive(Debug, Serialize)]
struct SpaceRequest<'a> {
    #[serde(rename = "type")]
    property_type: &'a str,
    amount: f64,
    questions_answers: &'a [QuestionAnswer],
    points: &'a [Coordinate],
    neighborhood_price_info: &'a BTreeMap<String, f64>,
}

impl SpaceClient {
    pub fn new(
        url: String,
        timeout: Duration,
        prices: Arc<NeighborhoodPriceTable>,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { url, client, prices })
    }

    fn request_body<'a>(&'a self, request: &'a PreferenceRequest) -> SpaceRequest<'a> {
        SpaceRequest {
            property_type: &request.property_type,
            amount: request.amount,
            questions_answers: &request.questions_answers,
            points: &request.points,
            neighborhood_price_info: request
                .neighborhood_price_info
                .as_ref()
                .unwrap_or_else(|| self.prices.as_map()),
        }
    }
}

#[async_trait]
impl RecommendationSource for SpaceClient {
    fn name(&self) -> &'static str {
        "space"
    }

    async fn recommend(&self, request: &PreferenceRequest) -> Result<Value, UpstreamError> {
        tracing::info!("Calling recommender Space: {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Space status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Space error response: {} - {}", status, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        tracing::debug!("Raw Space payload: {}", body);

        serde_json::from_str(&body).map_err(|e| UpstreamError::Format {
            reason: format!("Space returned invalid JSON: {}", e),
            raw: body,
        })
    }
}
