// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Coordinate, PointColor, QuestionAnswer, RecommendedPoint};
pub use requests::PreferenceRequest;
pub use responses::{ErrorResponse, HealthResponse, RecommendationResponse};
