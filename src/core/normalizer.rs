use serde_json::{Map, Value};
use std::fmt;

use crate::models::{Coordinate, PointColor, RecommendedPoint};

/// Upstream payload decoded into one of the shapes the recommenders emit
///
/// Shapes are tried in a fixed order: a `results` array, a `points` array,
/// a top-level array, then any other object taken as a single record.
/// Anything else (strings, numbers, null) is unrecognized.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamPayload {
    /// `{ "results": [ { district, latitude, longitude, color } ] }`
    Results(Vec<Value>),
    /// `{ "points": [ RecommendedPoint ] }`
    Points(Vec<Value>),
    /// `[ RecommendedPoint ]`
    Array(Vec<Value>),
    /// A lone object, treated as a one-element list
    Single(Value),
    Unrecognized(Value),
}

impl UpstreamPayload {
    pub fn decode(payload: Value) -> Self {
        match payload {
            Value::Object(mut map) => {
                if let Some(items) = take_array(&mut map, "results") {
                    UpstreamPayload::Results(items)
                } else if let Some(items) = take_array(&mut map, "points") {
                    UpstreamPayload::Points(items)
                } else {
                    UpstreamPayload::Single(Value::Object(map))
                }
            }
            Value::Array(items) => UpstreamPayload::Array(items),
            other => UpstreamPayload::Unrecognized(other),
        }
    }

    pub fn shape(&self) -> PayloadShape {
        match self {
            UpstreamPayload::Results(_) => PayloadShape::Results,
            UpstreamPayload::Points(_) => PayloadShape::Points,
            UpstreamPayload::Array(_) => PayloadShape::Array,
            UpstreamPayload::Single(_) => PayloadShape::Single,
            UpstreamPayload::Unrecognized(_) => PayloadShape::Unrecognized,
        }
    }

    /// Raw point-like records in upstream order
    pub fn into_records(self) -> Vec<Value> {
        match self {
            UpstreamPayload::Results(items)
            | UpstreamPayload::Points(items)
            | UpstreamPayload::Array(items) => items,
            UpstreamPayload::Single(record) => vec![record],
            UpstreamPayload::Unrecognized(_) => Vec::new(),
        }
    }
}

/// Which shape an upstream payload was decoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Results,
    Points,
    Array,
    Single,
    Unrecognized,
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayloadShape::Results => "results",
            PayloadShape::Points => "points",
            PayloadShape::Array => "array",
            PayloadShape::Single => "single",
            PayloadShape::Unrecognized => "unrecognized",
        })
    }
}

fn take_array(map: &mut Map<String, Value>, key: &str) -> Option<Vec<Value>> {
    match map.get_mut(key) {
        Some(Value::Array(items)) => Some(std::mem::take(items)),
        _ => None,
    }
}

/// What was wrong with a single upstream record
#[derive(Debug, Clone, PartialEq)]
pub enum DefectKind {
    NotAnObject,
    MissingName,
    MissingCoordinates,
    MalformedCoordinate,
    MissingColor,
    UnknownColor(String),
}

/// A gap in one record that was papered over with a default
#[derive(Debug, Clone, PartialEq)]
pub struct PointDefect {
    pub index: usize,
    pub kind: DefectKind,
}

impl fmt::Display for PointDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DefectKind::NotAnObject => write!(f, "point {} is not an object", self.index),
            DefectKind::MissingName => write!(f, "point {} has no Name", self.index),
            DefectKind::MissingCoordinates => write!(f, "point {} has no coordinates", self.index),
            DefectKind::MalformedCoordinate => {
                write!(f, "point {} has a coordinate without numeric latitude/longitude", self.index)
            }
            DefectKind::MissingColor => write!(f, "point {} has no color", self.index),
            DefectKind::UnknownColor(raw) => write!(f, "point {} has unknown color {}", self.index, raw),
        }
    }
}

/// Output of [`normalize`]: the points plus everything that had to be defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub shape: PayloadShape,
    pub points: Vec<RecommendedPoint>,
    pub defects: Vec<PointDefect>,
}

impl Normalized {
    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }

    /// True when the payload matched none of the known shapes
    pub fn is_unrecognized(&self) -> bool {
        self.shape == PayloadShape::Unrecognized
    }
}

/// Normalize any accepted upstream payload into recommended points
///
/// Never fails. Missing or malformed fields are replaced with fixed
/// placeholders and reported in [`Normalized::defects`]; logging them is
/// left to the caller.
pub fn normalize(payload: Value) -> Normalized {
    let decoded = UpstreamPayload::decode(payload);
    let shape = decoded.shape();

    let mut defects = Vec::new();
    let points = decoded
        .into_records()
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record, &mut defects))
        .collect();

    Normalized { shape, points, defects }
}

/// Build one point from a raw record, defaulting every missing field
pub fn normalize_record(index: usize, record: &Value, defects: &mut Vec<PointDefect>) -> RecommendedPoint {
    let mut report = |kind| defects.push(PointDefect { index, kind });

    if !record.is_object() {
        report(DefectKind::NotAnObject);
    }

    let name = ["Name", "district"]
        .iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            report(DefectKind::MissingName);
            default_name(index)
        });

    let (coordinates, coordinate_defects) = extract_coordinates(record);
    for kind in coordinate_defects {
        report(kind);
    }

    let color = match record.get("color") {
        None | Some(Value::Null) => {
            report(DefectKind::MissingColor);
            PointColor::default()
        }
        Some(Value::String(raw)) => PointColor::parse(raw).unwrap_or_else(|| {
            report(DefectKind::UnknownColor(raw.clone()));
            PointColor::default()
        }),
        Some(other) => {
            report(DefectKind::UnknownColor(other.to_string()));
            PointColor::default()
        }
    };

    RecommendedPoint { name, coordinates, color }
}

/// Placeholder label for a point at a 0-based index
pub fn default_name(index: usize) -> String {
    format!("Location {}", index + 1)
}

fn extract_coordinates(record: &Value) -> (Vec<Coordinate>, Vec<DefectKind>) {
    let mut defects = Vec::new();

    let raw: Vec<&Value> = match (record.get("coordinates"), record.get("coordinate")) {
        (Some(Value::Array(items)), _) if !items.is_empty() => items.iter().collect(),
        (Some(single @ Value::Object(_)), _) => vec![single],
        (_, Some(single @ Value::Object(_))) => vec![single],
        _ if record.get("latitude").is_some() || record.get("longitude").is_some() => vec![record],
        _ => Vec::new(),
    };

    if raw.is_empty() {
        defects.push(DefectKind::MissingCoordinates);
        return (vec![Coordinate::origin()], defects);
    }

    let coordinates = raw
        .into_iter()
        .map(|value| {
            let latitude = number_field(value, "latitude");
            let longitude = number_field(value, "longitude");
            if latitude.is_none() || longitude.is_none() {
                defects.push(DefectKind::MalformedCoordinate);
            }
            Coordinate::new(latitude.unwrap_or(0.0), longitude.unwrap_or(0.0))
        })
        .collect();

    (coordinates, defects)
}

/// Numbers come back as JSON numbers or, from text models, numeric strings
fn number_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_precedence() {
        let both = json!({"results": [{}], "points": [{}, {}]});
        assert_eq!(UpstreamPayload::decode(both).shape(), PayloadShape::Results);

        let points_only = json!({"points": [{}], "results": "not an array"});
        assert_eq!(UpstreamPayload::decode(points_only).shape(), PayloadShape::Points);

        assert_eq!(UpstreamPayload::decode(json!([{}])).shape(), PayloadShape::Array);
        assert_eq!(UpstreamPayload::decode(json!({"Name": "x"})).shape(), PayloadShape::Single);
        assert_eq!(UpstreamPayload::decode(json!("text")).shape(), PayloadShape::Unrecognized);
    }

    #[test]
    fn test_results_shape_maps_district_and_flat_coordinates() {
        let normalized = normalize(json!({
            "results": [
                {"district": "حي النرجس", "latitude": 24.83, "longitude": 46.65, "color": "green"},
                {"district": "حي الملز", "latitude": 24.66, "longitude": 46.73, "color": "Red"}
            ]
        }));

        assert!(normalized.is_clean());
        assert_eq!(normalized.points[0].name, "حي النرجس");
        assert_eq!(normalized.points[0].coordinates, vec![Coordinate::new(24.83, 46.65)]);
        assert_eq!(normalized.points[1].color, PointColor::Red);
    }

    #[test]
    fn test_singular_coordinate_is_wrapped() {
        let normalized = normalize(json!([
            {"Name": "A", "coordinate": {"latitude": 1.5, "longitude": 2.5}, "color": "yellow"}
        ]));

        assert_eq!(normalized.points[0].coordinates, vec![Coordinate::new(1.5, 2.5)]);
        assert!(normalized.is_clean());
    }

    #[test]
    fn test_string_coordinates_are_parsed() {
        let normalized = normalize(json!([
            {"Name": "A", "coordinates": [{"latitude": "24.7", "longitude": " 46.6 "}], "color": "green"}
        ]));

        assert_eq!(normalized.points[0].coordinates, vec![Coordinate::new(24.7, 46.6)]);
        assert!(normalized.is_clean());
    }

    #[test]
    fn test_unknown_color_defaults_to_green() {
        let normalized = normalize(json!([
            {"Name": "A", "coordinates": [{"latitude": 1, "longitude": 2}], "color": "orange"}
        ]));

        assert_eq!(normalized.points[0].color, PointColor::Green);
        assert_eq!(
            normalized.defects,
            vec![PointDefect { index: 0, kind: DefectKind::UnknownColor("orange".into()) }]
        );
    }

    #[test]
    fn test_non_object_record_gets_all_defaults() {
        let normalized = normalize(json!(["just a string"]));
        let point = &normalized.points[0];

        assert_eq!(point.name, "Location 1");
        assert_eq!(point.coordinates, vec![Coordinate::origin()]);
        assert_eq!(point.color, PointColor::Green);
        assert_eq!(normalized.defects[0].kind, DefectKind::NotAnObject);
    }

    #[test]
    fn test_unrecognized_payload_is_empty() {
        let normalized = normalize(json!(42));
        assert!(normalized.points.is_empty());
        assert!(normalized.is_unrecognized());
        assert_eq!(normalized.shape.to_string(), "unrecognized");
    }

    #[test]
    fn test_defect_display() {
        let defect = PointDefect { index: 3, kind: DefectKind::MissingColor };
        assert_eq!(defect.to_string(), "point 3 has no color");
    }
}
