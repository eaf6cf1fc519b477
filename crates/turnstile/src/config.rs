//! # Runtime Configuration
//!
//! All toggles are construction-time: the original build-configuration
//! matrix (threaded vs. single-threaded, windowed vs. headless) is a
//! strategy selected once, before the runtime starts, never a runtime
//! branch renegotiated mid-run. Loadable from a TOML file once at
//! startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Construction-time runtime configuration.
///
/// ## Usage
///
/// ```rust
/// use turnstile::RuntimeConfig;
///
/// let config = RuntimeConfig {
///     target_fps: 120,
///     ..RuntimeConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Target draw rate in frames per second. Default 60.
    pub target_fps: u32,
    /// Run update and draw on their own threads. Default true. When
    /// false, event/draw/update run in strict round-robin on the main
    /// thread through the same code path.
    pub multithreaded: bool,
    /// Presentation already blocks on the display's refresh, so the draw
    /// loop skips its pacing spin. Default false.
    pub vsync: bool,
    /// Capacity of the injected-event channel. Default 256.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            multithreaded: true,
            vsync: false,
            event_capacity: 256,
        }
    }
}

impl RuntimeConfig {
    /// Target interval between draw frames.
    ///
    /// # Panics
    ///
    /// Panics if `target_fps` is zero; call [`validate`] first.
    ///
    /// [`validate`]: RuntimeConfig::validate
    #[must_use]
    pub fn target_frame_interval(&self) -> Duration {
        assert!(self.target_fps > 0, "target_fps must be nonzero");
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps))
    }

    /// Rejects configurations the runtime cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::ZeroTargetFps);
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        Ok(())
    }

    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Errors produced while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path of the file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`RuntimeConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `target_fps` was zero.
    #[error("target_fps must be nonzero")]
    ZeroTargetFps,

    /// `event_capacity` was zero.
    #[error("event_capacity must be nonzero")]
    ZeroEventCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RuntimeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_fps, 60);
        assert!(config.multithreaded);
    }

    #[test]
    fn test_target_frame_interval() {
        let config = RuntimeConfig {
            target_fps: 50,
            ..RuntimeConfig::default()
        };
        assert_eq!(config.target_frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_zero_fps_rejected() {
        let config = RuntimeConfig {
            target_fps: 0,
            ..RuntimeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTargetFps)));
    }

    #[test]
    fn test_from_toml_str() {
        let config = RuntimeConfig::from_toml_str(
            "target_fps = 144\nmultithreaded = false\nvsync = true\n",
        )
        .expect("valid toml");
        assert_eq!(config.target_fps, 144);
        assert!(!config.multithreaded);
        assert!(config.vsync);
        // Unspecified fields keep their defaults.
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(RuntimeConfig::from_toml_str("target_pfs = 60\n").is_err());
    }
}
