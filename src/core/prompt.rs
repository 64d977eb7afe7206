use std::fmt::Write;

use crate::core::prices::NeighborhoodPriceTable;
use crate::models::PreferenceRequest;

/// Number of locations requested from a completion model
pub const RECOMMENDATION_COUNT: usize = 8;

/// Requested tier split: green, yellow, red
pub const TIER_SPLIT: (usize, usize, usize) = (4, 2, 2);

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a real estate assistant for Riyadh, Saudi Arabia. \
You recommend neighborhoods that match a buyer's budget and lifestyle. \
You always answer with raw JSON only, without markdown or commentary.";

const FORMAT_EXAMPLE: &str = r#"{
  "points": [
    {
      "Name": "حي النرجس، شمال الرياض، المملكة العربية السعودية",
      "coordinates": [{ "latitude": 24.8336, "longitude": 46.6519 }],
      "color": "green"
    }
  ]
}"#;

/// Build the user prompt sent to a completion model
pub fn build_prompt(request: &PreferenceRequest, prices: &NeighborhoodPriceTable) -> String {
    let (green, yellow, red) = TIER_SPLIT;
    let mut prompt = String::new();

    let _ = writeln!(prompt, "A user is searching for a property in Riyadh.");
    let _ = writeln!(prompt, "Property type: {}", request.property_type);
    let _ = writeln!(prompt, "Budget: {} SAR", request.amount);

    let _ = writeln!(prompt, "\nQuestionnaire answers:");
    for (i, qa) in request.questions_answers.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}: {}", i + 1, qa.question, qa.answer);
    }

    let _ = writeln!(prompt, "\nPlaces the user cares about (latitude, longitude):");
    for (i, point) in request.points.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}, {}", i + 1, point.latitude, point.longitude);
    }

    if !prices.is_empty() {
        let _ = writeln!(prompt, "\nAverage property price per neighborhood (SAR):");
        for (name, price) in prices.iter() {
            let _ = writeln!(prompt, "- {}: {:.0}", name, price);
        }
    }

    let _ = writeln!(
        prompt,
        "\nRecommend exactly {} neighborhoods. Mark {} as \"green\" (best match), \
         {} as \"yellow\" (acceptable) and {} as \"red\" (weak match). \
         Prefer neighborhoods whose average price fits the budget and that are close \
         to the places listed above.",
        RECOMMENDATION_COUNT, green, yellow, red
    );
    let _ = writeln!(
        prompt,
        "Write each Name in Arabic. Give each location exactly one coordinate. \
         Respond with JSON only, in this format:\n{}",
        FORMAT_EXAMPLE
    );

    prompt
}

/// Strip a surrounding markdown code fence from model output
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
    {
        return inner.strip_suffix("```").unwrap_or(inner).trim();
    }

    trimmed
}
