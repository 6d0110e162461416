use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickerError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Position unavailable: {reason}")]
    PositionUnavailable { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Place not found: {id}")]
    NotFound { id: String },
}

impl From<reqwest::Error> for PickerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PickerError::Decode {
                message: err.to_string(),
            }
        } else {
            PickerError::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for PickerError {
    fn from(err: serde_json::Error) -> Self {
        PickerError::Decode {
            message: err.to_string(),
        }
    }
}

impl PickerError {
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            PickerError::ConfigError { .. }
                | PickerError::InvalidConfigValueError { .. }
                | PickerError::MissingConfigError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PickerError::Transport { .. } => {
                "Could not reach the places service, please try again later".to_string()
            }
            PickerError::Decode { .. } => {
                "The places service sent a response that could not be read".to_string()
            }
            PickerError::PositionUnavailable { .. } => {
                "Your current position could not be determined".to_string()
            }
            PickerError::NotFound { id } => format!("No place with id '{}'", id),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PickerError::Transport { .. } => "Check that the backend is running and retry",
            PickerError::Decode { .. } => "Check that --api-url points at a places backend",
            PickerError::PositionUnavailable { .. } => "Pass --lat and --lon, or set [position]",
            PickerError::IoError(_) => "Check the file path and its permissions",
            PickerError::NotFound { .. } => "Run `nearby` to list the available ids",
            _ => "Review the configuration and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, PickerError>;
