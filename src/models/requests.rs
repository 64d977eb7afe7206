use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::domain::{Coordinate, QuestionAnswer};

/// Property search request sent by the mobile app
///
/// Built from the raw body by [`crate::core::validation::validate_request`],
/// which checks presence and shape before this type is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PreferenceRequest {
    #[serde(rename = "type")]
    pub property_type: String,
    #[validate(range(exclusive_min = 0.0))]
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[validate(length(min = 1))]
    pub questions_answers: Vec<QuestionAnswer>,
    #[validate(length(min = 1))]
    pub points: Vec<Coordinate>,
    /// Per-request replacement for the built-in price table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood_price_info: Option<BTreeMap<String, f64>>,
}

/// Budgets arrive as JSON numbers, but older app builds send them as strings
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| serde::de::Error::custom(format!("amount is not a number: {:?}", s))),
    }
}
