//! mskn relay - recommendation relay for the mskn property search app
//!
//! Validates property-search requests from the mobile app, asks a hosted
//! recommender for matching Riyadh neighborhoods and normalizes whatever it
//! answers into a stable list of tiered points.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{normalize, validate_request, NeighborhoodPriceTable, Normalized, UpstreamPayload};
pub use models::{Coordinate, PointColor, PreferenceRequest, RecommendedPoint, RecommendationResponse};
pub use services::{RecommendationSource, UpstreamError};
