// Adapters layer: concrete implementations of the domain ports.

pub mod candidates;
pub mod http;
pub mod position;

pub use candidates::{ConfiguredCandidates, JsonFileCandidates};
pub use http::HttpPlacesClient;
pub use position::FixedPosition;
