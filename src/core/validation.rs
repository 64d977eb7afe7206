use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::models::PreferenceRequest;

/// Fields every ask request must carry
pub const REQUIRED_FIELDS: [&str; 4] = ["type", "amount", "questions_answers", "points"];

/// Reasons a request is rejected before any upstream call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field '{0}': type, amount, questions_answers, and points are required")]
    MissingField(&'static str),

    #[error("{0}")]
    InvalidShape(String),

    #[error("{0}")]
    InvalidValue(String),
}

/// Validate a raw request body and turn it into a [`PreferenceRequest`]
///
/// Checks run in the order the app's error messages are written for:
/// presence of every required field, then the array shapes, then the
/// entries inside them, then value ranges.
pub fn validate_request(body: &Value) -> Result<PreferenceRequest, ValidationError> {
    let object = body
        .as_object()
        .ok_or_else(|| ValidationError::InvalidShape("request body must be a JSON object".into()))?;

    for field in REQUIRED_FIELDS {
        if is_missing(object.get(field)) {
            return Err(ValidationError::MissingField(field));
        }
    }

    let questions_answers = non_empty_array(object.get("questions_answers"), "questions_answers")?;
    let points = non_empty_array(object.get("points"), "points")?;

    for (i, qa) in questions_answers.iter().enumerate() {
        let well_formed = qa.get("question").is_some_and(Value::is_string)
            && qa.get("answer").is_some_and(Value::is_string);
        if !well_formed {
            return Err(ValidationError::InvalidShape(format!(
                "questions_answers[{}] must have string question and answer",
                i
            )));
        }
    }

    for (i, point) in points.iter().enumerate() {
        let well_formed = point.get("latitude").is_some_and(Value::is_number)
            && point.get("longitude").is_some_and(Value::is_number);
        if !well_formed {
            return Err(ValidationError::InvalidShape(format!(
                "points[{}] must have numeric latitude and longitude",
                i
            )));
        }
    }

    match object.get("type") {
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(ValidationError::InvalidValue("type must not be blank".into()));
        }
        Some(Value::String(_)) => {}
        _ => return Err(ValidationError::InvalidShape("type must be a string".into())),
    }

    let request: PreferenceRequest = serde_json::from_value(body.clone())
        .map_err(|e| ValidationError::InvalidValue(format!("Invalid request: {}", e)))?;

    request.validate().map_err(|errors| {
        if errors.field_errors().contains_key("amount") {
            ValidationError::InvalidValue("amount must be a positive number".into())
        } else {
            ValidationError::InvalidValue(errors.to_string())
        }
    })?;

    Ok(request)
}

/// Absent, null and empty-string values all count as missing
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn non_empty_array<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a Vec<Value>, ValidationError> {
    match value.and_then(Value::as_array) {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(ValidationError::InvalidShape(format!("{} must be a non-empty array", field))),
    }
}
