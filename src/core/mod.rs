pub mod controller;
pub mod distance;
pub mod removal;
pub mod session;

pub use crate::domain::model::{
    Coordinate, ErrorInfo, Place, PlaceId, SyncOutcome, SyncPhase, UserCollection,
};
pub use crate::domain::ports::{CandidateSource, ConfigProvider, PersistenceGateway, PositionProvider};
pub use crate::utils::error::Result;
