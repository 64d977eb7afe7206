use crate::models::{Coordinate, PointColor, RecommendedPoint};

const CANNED_POINTS: [(&str, f64, f64, PointColor); 8] = [
    ("حي النرجس، شمال الرياض، المملكة العربية السعودية", 24.7136, 46.6753, PointColor::Green),
    ("حي الياسمين، شمال الرياض، المملكة العربية السعودية", 24.7200, 46.6800, PointColor::Green),
    ("حي العليا، شمال الرياض، المملكة العربية السعودية", 24.7300, 46.6900, PointColor::Green),
    ("حي الملقا، شمال الرياض، المملكة العربية السعودية", 24.7400, 46.7000, PointColor::Green),
    ("حي الصحافة، شمال الرياض، المملكة العربية السعودية", 24.7255, 46.6855, PointColor::Yellow),
    ("حي النفل، شمال الرياض، المملكة العربية السعودية", 24.7350, 46.6950, PointColor::Yellow),
    ("حي العريجاء، شمال الرياض، المملكة العربية السعودية", 24.7500, 46.7100, PointColor::Red),
    ("حي الشفا، شمال الرياض، المملكة العربية السعودية", 24.7600, 46.7200, PointColor::Red),
];

/// Fixed recommendations served in test mode instead of calling an upstream
pub fn canned_recommendations() -> Vec<RecommendedPoint> {
    CANNED_POINTS
        .iter()
        .map(|&(name, latitude, longitude, color)| {
            RecommendedPoint::new(name, Coordinate::new(latitude, longitude), color)
        })
        .collect()
}
