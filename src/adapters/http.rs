use crate::core::{CandidateSource, ConfigProvider, PersistenceGateway, Place, UserCollection};
use crate::domain::model::PlacesEnvelope;
use crate::utils::error::{PickerError, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

const USER_PLACES_PATH: &str = "user-places";
const PLACES_PATH: &str = "places";

#[derive(Debug, Deserialize)]
struct WriteAck {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the places backend: `GET /places`, `GET /user-places`, `PUT /user-places`.
#[derive(Debug, Clone)]
pub struct HttpPlacesClient {
    client: Client,
    base_url: Url,
    headers: HashMap<String, String>,
}

impl HttpPlacesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: parse_base_url(base_url)?,
            headers: HashMap::new(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: parse_base_url(config.api_base_url())?,
            headers: config.extra_headers(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PickerError::ConfigError {
                message: format!("Cannot build endpoint for {}: {}", path, e),
            })
    }

    fn with_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        request
    }

    async fn fetch_places(&self, path: &str) -> Result<Vec<Place>> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);

        let response = self.with_headers(self.client.get(url)).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(PickerError::Transport {
                message: format!("Failed to fetch {}: HTTP {}", path, status),
            });
        }

        let body = response.text().await?;
        let envelope: PlacesEnvelope<Vec<Place>> = serde_json::from_str(&body)?;
        Ok(envelope.places)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // Url::join drops the last segment unless the base ends with a slash
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    Url::parse(&normalized).map_err(|e| PickerError::InvalidConfigValueError {
        field: "api_base_url".to_string(),
        value: raw.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })
}

#[async_trait::async_trait]
impl PersistenceGateway for HttpPlacesClient {
    async fn read_all(&self) -> Result<UserCollection> {
        let places = self.fetch_places(USER_PLACES_PATH).await?;
        Ok(UserCollection::from_places(places))
    }

    async fn write_all(&self, collection: &UserCollection) -> Result<()> {
        let url = self.endpoint(USER_PLACES_PATH)?;
        tracing::debug!("PUT {} with {} places", url, collection.len());

        let response = self
            .with_headers(self.client.put(url))
            .json(&PlacesEnvelope { places: collection })
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(PickerError::Transport {
                message: format!("Failed to update user data: HTTP {}", status),
            });
        }

        let body = response.text().await?;
        if !body.trim().is_empty() {
            let ack: WriteAck = serde_json::from_str(&body)?;
            if let Some(message) = ack.message {
                tracing::debug!("Backend replied: {}", message);
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CandidateSource for HttpPlacesClient {
    async fn list_places(&self) -> Result<Vec<Place>> {
        self.fetch_places(PLACES_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let client = HttpPlacesClient::new("http://localhost:3000/api").unwrap();
        assert_eq!(
            client.endpoint(USER_PLACES_PATH).unwrap().as_str(),
            "http://localhost:3000/api/user-places"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = HttpPlacesClient::new("not a url").unwrap_err();
        assert!(err.is_config());
    }
}
