//! Configuration for the grid generation process

use serde::{Deserialize, Serialize};
use waygrid_common::{Error, Result};

/// Configuration parameters for grid generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Edge length of a lattice cell along the x and z axes
    pub cell_size: f32,
    /// The maximum surface inclination in radians that is considered walkable
    pub max_inclination: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            max_inclination: std::f32::consts::FRAC_PI_4,
        }
    }
}

impl GridSettings {
    /// Creates a new GridSettings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(Error::GridGeneration("invalid cell size".to_string()));
        }

        if !self.max_inclination.is_finite()
            || self.max_inclination < 0.0
            || self.max_inclination > std::f32::consts::FRAC_PI_2
        {
            return Err(Error::GridGeneration(
                "invalid maximum inclination".to_string(),
            ));
        }

        Ok(())
    }

    /// Byte projection fed into the content hash alongside the geometry
    pub(crate) fn digest_bytes(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&self.cell_size.to_le_bytes());
        bytes[4..].copy_from_slice(&self.max_inclination.to_le_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_validate() {
        assert!(GridSettings::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_cell_size() {
        let settings = GridSettings {
            cell_size: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = GridSettings {
            cell_size: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_inclination() {
        let settings = GridSettings {
            max_inclination: -0.1,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = GridSettings {
            max_inclination: 2.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_digest_bytes_track_fields() {
        let a = GridSettings::default();
        let b = GridSettings {
            cell_size: 2.0,
            ..a
        };
        assert_ne!(a.digest_bytes(), b.digest_bytes());
    }
}
