use crate::core::{Coordinate, PositionProvider};
use crate::utils::error::{PickerError, Result};
use crate::utils::validation::validate_coordinate;

/// Position taken from configuration instead of a device sensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition {
    coordinate: Option<Coordinate>,
}

impl FixedPosition {
    pub fn new(coordinate: Option<Coordinate>) -> Self {
        Self { coordinate }
    }
}

impl PositionProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinate> {
        let coordinate = self.coordinate.ok_or_else(|| PickerError::PositionUnavailable {
            reason: "no position configured".to_string(),
        })?;

        validate_coordinate("position", &coordinate).map_err(|e| {
            PickerError::PositionUnavailable {
                reason: e.to_string(),
            }
        })?;
        Ok(coordinate)
    }
}
