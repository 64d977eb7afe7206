// Unit tests for the mskn relay core

use mskn_relay::core::{
    canned_recommendations,
    normalizer::{default_name, normalize, DefectKind, PayloadShape},
    validation::{validate_request, ValidationError},
};
use mskn_relay::models::{Coordinate, PointColor, RecommendedPoint};
use serde_json::{json, Value};

fn well_formed_points() -> Vec<RecommendedPoint> {
    vec![
        RecommendedPoint::new("حي حطين", Coordinate::new(24.7612, 46.6003), PointColor::Green),
        RecommendedPoint::new("حي الربيع", Coordinate::new(24.7941, 46.6590), PointColor::Yellow),
        RecommendedPoint::new("حي منفوحة", Coordinate::new(24.6021, 46.7205), PointColor::Red),
    ]
}

fn assert_fully_populated(points: &[RecommendedPoint]) {
    for point in points {
        assert!(!point.name.is_empty());
        assert!(!point.coordinates.is_empty());
    }
}

#[test]
fn test_results_shape_keeps_length() {
    let payload = json!({
        "results": [
            {"district": "حي الملقا", "latitude": 24.81, "longitude": 46.60, "color": "green"},
            {"latitude": 24.70},
            {}
        ],
        "model_version": "v2"
    });

    let normalized = normalize(payload);

    assert_eq!(normalized.points.len(), 3);
    assert_fully_populated(&normalized.points);
    assert_eq!(normalized.points[1].coordinates, vec![Coordinate::new(24.70, 0.0)]);
}

#[test]
fn test_points_shape_keeps_length() {
    let payload = json!({
        "points": [
            {"Name": "A", "coordinates": [{"latitude": 1.0, "longitude": 2.0}], "color": "red"},
            {"Name": "", "color": null}
        ]
    });

    let normalized = normalize(payload);

    assert_eq!(normalized.points.len(), 2);
    assert_fully_populated(&normalized.points);
    assert_eq!(normalized.points[1].name, "Location 2");
}

#[test]
fn test_bare_array_keeps_length() {
    let payload = json!([{}, {}, {}, {}]);
    let normalized = normalize(payload);

    assert_eq!(normalized.shape, PayloadShape::Array);
    assert_eq!(normalized.points.len(), 4);
    assert_fully_populated(&normalized.points);
}

#[test]
fn test_single_object_is_wrapped() {
    let payload = json!({"Name": "حي الورود", "coordinate": {"latitude": 24.72, "longitude": 46.68}});
    let normalized = normalize(payload);

    assert_eq!(normalized.shape, PayloadShape::Single);
    assert_eq!(normalized.points.len(), 1);
    assert_eq!(normalized.points[0].name, "حي الورود");
}

#[test]
fn test_normalizing_well_formed_points_is_identity() {
    let points = well_formed_points();
    let payload = json!({ "points": points });

    let normalized = normalize(payload);

    assert_eq!(normalized.points, points);
    assert!(normalized.is_clean());

    // And again on the output
    let again = normalize(serde_json::to_value(&normalized.points).unwrap());
    assert_eq!(again.points, points);
}

#[test]
fn test_missing_coordinates_default_to_origin() {
    let normalized = normalize(json!([{"Name": "No location", "color": "green"}]));

    assert_eq!(normalized.points[0].coordinates, vec![Coordinate::new(0.0, 0.0)]);
    assert_eq!(normalized.defects.len(), 1);
    assert_eq!(normalized.defects[0].kind, DefectKind::MissingCoordinates);
}

#[test]
fn test_missing_name_uses_one_based_index() {
    let normalized = normalize(json!([
        {"Name": "first"},
        {"Name": "second"},
        {"coordinates": [{"latitude": 1.0, "longitude": 1.0}], "color": "yellow"}
    ]));

    assert_eq!(normalized.points[2].name, "Location 3");
    assert_eq!(default_name(2), "Location 3");
}

#[test]
fn test_missing_color_defaults_to_green() {
    let normalized = normalize(json!([{"Name": "x", "coordinates": [{"latitude": 1, "longitude": 1}]}]));

    assert_eq!(normalized.points[0].color, PointColor::Green);
    assert_eq!(normalized.defects[0].kind, DefectKind::MissingColor);
}

#[test]
fn test_order_is_preserved() {
    let names: Vec<Value> = (0..8).map(|i| json!({"Name": format!("n{}", i)})).collect();
    let normalized = normalize(Value::Array(names));

    let got: Vec<&str> = normalized.points.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(got, vec!["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"]);
}

#[test]
fn test_canned_recommendations_are_eight_tiered_points() {
    let first = canned_recommendations();
    let second = canned_recommendations();

    assert_eq!(first, second);
    assert_eq!(first.len(), 8);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let greens = first.iter().filter(|p| p.color == PointColor::Green).count();
    let yellows = first.iter().filter(|p| p.color == PointColor::Yellow).count();
    let reds = first.iter().filter(|p| p.color == PointColor::Red).count();
    assert_eq!((greens, yellows, reds), (4, 2, 2));
}

#[test]
fn test_validation_rejects_missing_amount() {
    let body = json!({
        "type": "villa",
        "questions_answers": [{"question": "q", "answer": "a"}],
        "points": [{"latitude": 24.7, "longitude": 46.6}]
    });

    assert_eq!(validate_request(&body).unwrap_err(), ValidationError::MissingField("amount"));
}

#[test]
fn test_validation_rejects_bad_question_entry() {
    let body = json!({
        "type": "villa",
        "amount": 100,
        "questions_answers": [{"question": "q"}],
        "points": [{"latitude": 24.7, "longitude": 46.6}]
    });

    assert!(matches!(validate_request(&body), Err(ValidationError::InvalidShape(_))));
}

#[test]
fn test_validation_keeps_price_override() {
    let body = json!({
        "type": "villa",
        "amount": 100,
        "questions_answers": [{"question": "q", "answer": "a"}],
        "points": [{"latitude": 24.7, "longitude": 46.6}],
        "neighborhood_price_info": {"حي لبن": 750000}
    });

    let request = validate_request(&body).unwrap();
    let prices = request.neighborhood_price_info.unwrap();
    assert_eq!(prices.get("حي لبن"), Some(&750000.0));
}
