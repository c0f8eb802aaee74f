//! Configuration types for population scatter plots.

use serde::{Deserialize, Serialize};

/// Objective values at or above this mark an infeasible or unevaluated solution.
pub const INFEASIBILITY_SENTINEL: f64 = 1.0e99;

fn default_point_size() -> u32 {
    4
}

fn default_threshold() -> f64 {
    INFEASIBILITY_SENTINEL
}

fn default_colorbar_width() -> u32 {
    90
}

/// Scatter-plot rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Marker radius in pixels.
    #[serde(default = "default_point_size")]
    pub point_size: u32,
    /// Solutions whose largest objective reaches this value are not plotted.
    #[serde(default = "default_threshold")]
    pub infeasibility_threshold: f64,
    /// Optional chart caption.
    #[serde(default)]
    pub title: Option<String>,
    /// Width of the colorbar strip for four-objective plots.
    #[serde(default = "default_colorbar_width")]
    pub colorbar_width: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            point_size: default_point_size(),
            infeasibility_threshold: INFEASIBILITY_SENTINEL,
            title: None,
            colorbar_width: default_colorbar_width(),
        }
    }
}

impl PlotConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.colorbar_width >= self.width {
            return Err(ConfigError::InvalidColorbarWidth {
                colorbar: self.colorbar_width,
                width: self.width,
            });
        }
        if self.point_size == 0 {
            return Err(ConfigError::InvalidPointSize);
        }
        if self.infeasibility_threshold.is_nan() || self.infeasibility_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.infeasibility_threshold));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Plot dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Colorbar width {colorbar} must be smaller than plot width {width}")]
    InvalidColorbarWidth { colorbar: u32, width: u32 },
    #[error("Point size must be non-zero")]
    InvalidPointSize,
    #[error("Infeasibility threshold must be positive, got {0}")]
    InvalidThreshold(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PlotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.infeasibility_threshold, 1.0e99);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PlotConfig = serde_json::from_str(r#"{"width": 640, "height": 480}"#).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.point_size, 4);
        assert_eq!(config.infeasibility_threshold, INFEASIBILITY_SENTINEL);
        assert!(config.title.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let zero_width = PlotConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_width.validate(),
            Err(ConfigError::InvalidDimensions)
        ));

        let bad_threshold = PlotConfig {
            infeasibility_threshold: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_threshold.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));

        let wide_colorbar = PlotConfig {
            width: 100,
            colorbar_width: 100,
            ..Default::default()
        };
        assert!(matches!(
            wide_colorbar.validate(),
            Err(ConfigError::InvalidColorbarWidth { .. })
        ));
    }
}
