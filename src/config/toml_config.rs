use crate::core::{ConfigProvider, Coordinate};
use crate::utils::error::{PickerError, Result};
use crate::utils::validation::{
    validate_coordinate, validate_path, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub gateway: GatewayConfig,
    pub position: Option<PositionConfig>,
    pub candidates: Option<CandidatesConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionConfig {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesConfig {
    pub file: Option<String>,
}

impl TomlConfig {
    /// Reads and parses a config file, expanding `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PickerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PickerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${NAME}` from the environment. Unset names stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PickerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("gateway.base_url", &self.gateway.base_url)?;

        if let Some(timeout) = self.gateway.timeout_seconds {
            validate_positive_number("gateway.timeout_seconds", timeout, 1)?;
        }

        if let Some(position) = self.position() {
            validate_coordinate("position", &position)?;
        }

        if let Some(file) = self.candidates_file() {
            validate_path("candidates.file", file)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.gateway.base_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.gateway.timeout_seconds.map(Duration::from_secs)
    }

    fn extra_headers(&self) -> HashMap<String, String> {
        self.gateway.headers.clone().unwrap_or_default()
    }

    fn position(&self) -> Option<Coordinate> {
        self.position.as_ref().map(|p| Coordinate::new(p.lat, p.lon))
    }

    fn candidates_file(&self) -> Option<&str> {
        self.candidates.as_ref().and_then(|c| c.file.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[gateway]
base_url = "https://places.example.com"
timeout_seconds = 5
headers = { "X-Client" = "place-picker" }

[position]
lat = 52.52
lon = 13.405

[candidates]
file = "./places.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_base_url(), "https://places.example.com");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.extra_headers().get("X-Client").unwrap(), "place-picker");
        assert_eq!(config.position(), Some(Coordinate::new(52.52, 13.405)));
        assert_eq!(config.candidates_file(), Some("./places.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[gateway]
base_url = "http://localhost:3000"
"#,
        )
        .unwrap();

        assert!(config.position().is_none());
        assert!(config.candidates_file().is_none());
        assert!(config.extra_headers().is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PLACE_PICKER_TEST_TOKEN", "secret-123");

        let toml_content = r#"
[gateway]
base_url = "http://localhost:3000"
headers = { "Authorization" = "Bearer ${PLACE_PICKER_TEST_TOKEN}", "X-Other" = "${PLACE_PICKER_UNSET_VAR}" }
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let headers = config.extra_headers();
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer secret-123");
        assert_eq!(headers.get("X-Other").unwrap(), "${PLACE_PICKER_UNSET_VAR}");

        std::env::remove_var("PLACE_PICKER_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[gateway]
base_url = "http://localhost:3000"

[position]
lat = 95.0
lon = 0.0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        assert!(TomlConfig::from_toml_str("[gateway]\nbase_url = 7").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[gateway]\nbase_url = \"http://localhost:3000\"\ntimeout_seconds = 2\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(2)));
    }
}
