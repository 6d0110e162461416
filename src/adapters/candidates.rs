use crate::adapters::http::HttpPlacesClient;
use crate::core::{CandidateSource, ConfigProvider, Place};
use crate::domain::model::PlacesEnvelope;
use crate::utils::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateFile {
    Wrapped(PlacesEnvelope<Vec<Place>>),
    Bare(Vec<Place>),
}

/// Candidates read from a JSON file, either `{ "places": [...] }` or a bare array.
#[derive(Debug, Clone)]
pub struct JsonFileCandidates {
    path: PathBuf,
}

impl JsonFileCandidates {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl CandidateSource for JsonFileCandidates {
    async fn list_places(&self) -> Result<Vec<Place>> {
        tracing::debug!("Reading candidate places from {}", self.path.display());
        let content = fs::read_to_string(&self.path)?;
        let places = match serde_json::from_str(&content)? {
            CandidateFile::Wrapped(envelope) => envelope.places,
            CandidateFile::Bare(places) => places,
        };
        Ok(places)
    }
}

/// Candidate source picked from configuration: a local file when one is set,
/// otherwise the backend's `/places` listing.
#[derive(Debug, Clone)]
pub enum ConfiguredCandidates {
    File(JsonFileCandidates),
    Remote(HttpPlacesClient),
}

impl ConfiguredCandidates {
    pub fn from_config<C: ConfigProvider>(config: &C, client: &HttpPlacesClient) -> Self {
        match config.candidates_file() {
            Some(path) => Self::File(JsonFileCandidates::new(path)),
            None => Self::Remote(client.clone()),
        }
    }
}

#[async_trait::async_trait]
impl CandidateSource for ConfiguredCandidates {
    async fn list_places(&self) -> Result<Vec<Place>> {
        match self {
            Self::File(source) => source.list_places().await,
            Self::Remote(source) => source.list_places().await,
        }
    }
}
