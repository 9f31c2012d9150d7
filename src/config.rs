//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! ```toml
//! [controller]
//! port = 0
//! device_path = ""   # empty: pick the device by port
//! dead_zone = 0.1
//!
//! [control_loop]
//! rate_hz = 50
//! log_axes = false
//! ```

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{PadPollError, Result};

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub control_loop: ControlLoopConfig,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ControllerConfig {
    #[serde(default)]
    pub port: u32,

    #[serde(default)]
    pub device_path: String,

    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,
}

/// Control loop configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ControlLoopConfig {
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,

    #[serde(default)]
    pub log_axes: bool,
}

// Default value functions
fn default_dead_zone() -> f64 { 0.1 }
fn default_rate_hz() -> u32 { 50 }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            device_path: String::new(),
            dead_zone: default_dead_zone(),
        }
    }
}

impl Default for ControlLoopConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            log_axes: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padpoll::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns `Config` error if parsing or validation fails
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        // Negative dead zones would disable filtering entirely
        if !(0.0..1.0).contains(&self.controller.dead_zone) {
            return Err(PadPollError::Config(toml::de::Error::custom(
                "dead_zone must be at least 0.0 and below 1.0",
            )));
        }

        if self.control_loop.rate_hz == 0 || self.control_loop.rate_hz > 1000 {
            return Err(PadPollError::Config(toml::de::Error::custom(
                "rate_hz must be between 1 and 1000",
            )));
        }

        Ok(())
    }

    /// Control loop tick period
    ///
    /// A `rate_hz` of 0 (only reachable by skipping validation) is treated as 1Hz.
    #[must_use]
    pub fn tick_period(&self) -> std::time::Duration {
        let rate_hz = u64::from(self.control_loop.rate_hz.max(1));
        std::time::Duration::from_micros(1_000_000 / rate_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.controller.port, 0);
        assert!(config.controller.device_path.is_empty());
        assert_eq!(config.controller.dead_zone, 0.1);
        assert_eq!(config.control_loop.rate_hz, 50);
        assert!(!config.control_loop.log_axes);
    }

    #[test]
    fn test_empty_file_matches_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config = Config::from_toml(
            r#"
[controller]
port = 2

[control_loop]
log_axes = true
"#,
        )
        .unwrap();

        assert_eq!(config.controller.port, 2);
        assert_eq!(config.controller.dead_zone, 0.1);
        assert_eq!(config.control_loop.rate_hz, 50);
        assert!(config.control_loop.log_axes);
    }

    #[test]
    fn test_negative_dead_zone_rejected() {
        let mut config = Config::default();
        config.controller.dead_zone = -0.05;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_full_dead_zone_rejected() {
        let mut config = Config::default();
        config.controller.dead_zone = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_dead_zone_allowed() {
        let mut config = Config::default();
        config.controller.dead_zone = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rate_bounds() {
        let mut config = Config::default();

        config.control_loop.rate_hz = 0;
        assert!(config.validate().is_err());

        config.control_loop.rate_hz = 1001;
        assert!(config.validate().is_err());

        config.control_loop.rate_hz = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tick_period() {
        let mut config = Config::default();
        assert_eq!(config.tick_period(), std::time::Duration::from_millis(20));

        config.control_loop.rate_hz = 1000;
        assert_eq!(config.tick_period(), std::time::Duration::from_millis(1));
    }

    #[test]
    fn test_tick_period_unvalidated_zero_rate() {
        let mut config = Config::default();
        config.control_loop.rate_hz = 0;
        assert_eq!(config.tick_period(), std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_malformed_toml() {
        let result = Config::from_toml("[controller]\ndead_zone = \"wide\"\n");
        assert!(matches!(result, Err(PadPollError::Config(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[controller]
device_path = "/dev/input/event7"
dead_zone = 0.05

[control_loop]
rate_hz = 100
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.controller.device_path, "/dev/input/event7");
        assert_eq!(config.controller.dead_zone, 0.05);
        assert_eq!(config.control_loop.rate_hz, 100);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/padpoll.toml");
        assert!(matches!(result, Err(PadPollError::Io(_))));
    }
}
