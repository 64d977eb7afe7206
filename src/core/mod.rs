// Relay core exports
pub mod mock;
pub mod normalizer;
pub mod prices;
pub mod prompt;
pub mod validation;

pub use mock::canned_recommendations;
pub use normalizer::{normalize, DefectKind, Normalized, PayloadShape, PointDefect, UpstreamPayload};
pub use prices::{NeighborhoodPriceTable, PriceTableError};
pub use prompt::{build_prompt, strip_code_fences};
pub use validation::{validate_request, ValidationError};
