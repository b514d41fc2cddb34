//! Engine configuration
//!
//! Settings applied once when a [`Context`](crate::Context) is initialized.
//! Loadable from JSON so hosts can keep engine tuning next to the rest of
//! their configuration.

use std::path::Path;

use grb_core::{GlobalOption, Mode, Orientation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating an [`EngineConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Engine-wide settings
///
/// # Example
/// ```
/// use grb::EngineConfig;
///
/// let config = EngineConfig::default().with_nthreads(4).with_burble(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Blocking or non-blocking execution
    pub mode: Mode,

    /// Worker threads; 0 lets the engine decide
    pub nthreads: i32,

    /// Engine diagnostic output
    pub burble: bool,

    /// Orientation of newly created matrices
    pub default_orientation: Orientation,

    /// Hypersparse threshold, fraction of non-empty vectors
    pub hyper_switch: f64,

    /// Bitmap threshold, fraction of present entries. Must be in `[0, 1]`.
    pub bitmap_switch: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::NonBlocking,
            nthreads: 0,
            burble: false,
            default_orientation: Orientation::ByRow,
            hyper_switch: 0.0625,
            bitmap_switch: 0.04,
        }
    }
}

impl EngineConfig {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_nthreads(mut self, nthreads: i32) -> Self {
        self.nthreads = nthreads;
        self
    }

    pub fn with_burble(mut self, burble: bool) -> Self {
        self.burble = burble;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.default_orientation = orientation;
        self
    }

    pub fn with_hyper_switch(mut self, hyper_switch: f64) -> Self {
        self.hyper_switch = hyper_switch;
        self
    }

    pub fn with_bitmap_switch(mut self, bitmap_switch: f64) -> Self {
        self.bitmap_switch = bitmap_switch;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nthreads < 0 {
            return Err(ConfigError::Invalid {
                field: "nthreads",
                reason: format!("must be non-negative, got {}", self.nthreads),
            });
        }
        if !self.hyper_switch.is_finite() {
            return Err(ConfigError::Invalid {
                field: "hyper_switch",
                reason: format!("must be finite, got {}", self.hyper_switch),
            });
        }
        if !(0.0..=1.0).contains(&self.bitmap_switch) {
            return Err(ConfigError::Invalid {
                field: "bitmap_switch",
                reason: format!("must be in [0, 1], got {}", self.bitmap_switch),
            });
        }
        Ok(())
    }

    /// Options to set on the engine after initialization
    pub fn global_options(&self) -> [GlobalOption; 5] {
        [
            GlobalOption::Threads(self.nthreads),
            GlobalOption::Burble(self.burble),
            GlobalOption::Orientation(self.default_orientation),
            GlobalOption::HyperSwitch(self.hyper_switch),
            GlobalOption::BitmapSwitch(self.bitmap_switch),
        ]
    }
}
