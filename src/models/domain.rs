use serde::{Deserialize, Serialize};
use std::fmt;

/// A single latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Placeholder used when the upstream gives no location at all
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Match-quality tier attached to every recommended point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointColor {
    #[default]
    Green,
    Yellow,
    Red,
}

impl PointColor {
    /// Parse a tier name, ignoring case and surrounding whitespace
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "green" => Some(PointColor::Green),
            "yellow" => Some(PointColor::Yellow),
            "red" => Some(PointColor::Red),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PointColor::Green => "green",
            PointColor::Yellow => "yellow",
            PointColor::Red => "red",
        }
    }
}

impl fmt::Display for PointColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recommended location returned to the app
///
/// `coordinates` is a sequence so that areas can later be described by
/// several points; today it always holds exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedPoint {
    #[serde(rename = "Name")]
    pub name: String,
    pub coordinates: Vec<Coordinate>,
    pub color: PointColor,
}

impl RecommendedPoint {
    pub fn new(name: impl Into<String>, coordinate: Coordinate, color: PointColor) -> Self {
        Self {
            name: name.into(),
            coordinates: vec![coordinate],
            color,
        }
    }
}

/// A question from the in-app questionnaire and the user's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_is_case_insensitive() {
        assert_eq!(PointColor::parse("Green"), Some(PointColor::Green));
        assert_eq!(PointColor::parse(" RED "), Some(PointColor::Red));
        assert_eq!(PointColor::parse("orange"), None);
    }

    #[test]
    fn test_point_serializes_with_capitalized_name() {
        let point = RecommendedPoint::new("حي الملقا", Coordinate::new(24.8, 46.6), PointColor::Yellow);
        let json = serde_json::to_value(&point).unwrap();

        assert_eq!(json["Name"], "حي الملقا");
        assert_eq!(json["color"], "yellow");
        assert_eq!(json["coordinates"][0]["latitude"], 24.8);
    }
}
