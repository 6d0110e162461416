pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::{FixedPosition, HttpPlacesClient, JsonFileCandidates};
pub use self::core::{
    controller::CollectionController,
    distance::{distance_km, sort_by_distance},
    removal::{RemovalConfirmationFlow, RemovalState},
    session::{NearbyPlaces, PickerSession},
};
pub use domain::model::{Coordinate, ErrorInfo, Place, PlaceId, SyncOutcome, SyncPhase, UserCollection};
pub use utils::error::{PickerError, Result};
