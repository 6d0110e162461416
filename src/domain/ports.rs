use crate::domain::model::{Coordinate, Place, UserCollection};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Reads and writes the whole user collection as one unit.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn read_all(&self) -> Result<UserCollection>;
    async fn write_all(&self, collection: &UserCollection) -> Result<()>;
}

/// Read-only listing of every place the user can pick from.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn list_places(&self) -> Result<Vec<Place>>;
}

pub trait PositionProvider: Send + Sync {
    fn current_position(&self) -> impl std::future::Future<Output = Result<Coordinate>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn extra_headers(&self) -> HashMap<String, String>;
    fn position(&self) -> Option<Coordinate>;
    fn candidates_file(&self) -> Option<&str>;
}
