use crate::core::{ConfigProvider, Coordinate};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_coordinate, validate_path, validate_positive_number, validate_url, Validate,
};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "place-picker")]
#[command(about = "Keep a list of places to visit, synced with a places backend")]
pub struct CliConfig {
    #[arg(long, default_value = "http://localhost:3000")]
    pub api_url: String,

    #[arg(long, default_value = "10")]
    pub timeout_seconds: u64,

    #[arg(long, allow_negative_numbers = true, help = "Current latitude in degrees")]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, help = "Current longitude in degrees")]
    pub lon: Option<f64>,

    #[arg(long, help = "Read candidate places from a JSON file instead of the backend")]
    pub candidates_file: Option<String>,

    #[arg(long, help = "TOML configuration file, replaces the connection options above")]
    pub config: Option<PathBuf>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the places you picked, most recent first
    List,
    /// Show every available place, nearest first
    Nearby,
    /// Pick an available place
    Add { id: String },
    /// Remove a picked place after confirmation
    Remove {
        id: String,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        &self.api_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.timeout_seconds))
    }

    fn extra_headers(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    fn position(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.lat?, self.lon?))
    }

    fn candidates_file(&self) -> Option<&str> {
        self.candidates_file.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_url)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        if let Some(path) = &self.candidates_file {
            validate_path("candidates_file", path)?;
        }
        if let Some(position) = self.position() {
            validate_coordinate("position", &position)?;
        }
        Ok(())
    }
}
