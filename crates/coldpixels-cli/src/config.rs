//! Configuration management.

use anyhow::{Context, Result};
use coldpixels_hw::TimingPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Panel timing
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Timing configuration, durations in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Control transfer timeout, at most `u32::MAX`
    #[serde(default = "default_usb_timeout")]
    pub usb_timeout: u32,

    /// Wait after clearing all six lines
    #[serde(default = "default_clear_line_wait")]
    pub clear_line_wait: u64,

    #[serde(default = "default_erase_sector_wait")]
    pub erase_sector_wait: u64,

    #[serde(default = "default_min_icon_wait")]
    pub min_icon_wait: u64,

    /// Wait after drawing a large image
    #[serde(default = "default_max_icon_wait")]
    pub max_icon_wait: u64,

    #[serde(default = "default_write_page_wait")]
    pub write_page_wait: u64,

    #[serde(default = "default_sysinfo_wait")]
    pub sysinfo_wait: u64,

    /// Wait after a full-width text line
    #[serde(default = "default_max_text_wait")]
    pub max_text_wait: u64,

    #[serde(default = "default_chars_per_icon")]
    pub chars_per_icon: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            usb_timeout: default_usb_timeout(),
            clear_line_wait: default_clear_line_wait(),
            erase_sector_wait: default_erase_sector_wait(),
            min_icon_wait: default_min_icon_wait(),
            max_icon_wait: default_max_icon_wait(),
            write_page_wait: default_write_page_wait(),
            sysinfo_wait: default_sysinfo_wait(),
            max_text_wait: default_max_text_wait(),
            chars_per_icon: default_chars_per_icon(),
        }
    }
}

// Default value functions
fn default_usb_timeout() -> u32 {
    5000
}

fn default_clear_line_wait() -> u64 {
    1000
}

fn default_erase_sector_wait() -> u64 {
    220
}

fn default_min_icon_wait() -> u64 {
    10
}

fn default_max_icon_wait() -> u64 {
    700
}

fn default_write_page_wait() -> u64 {
    15
}

fn default_sysinfo_wait() -> u64 {
    50
}

fn default_max_text_wait() -> u64 {
    85
}

fn default_chars_per_icon() -> f64 {
    2.75
}

impl From<&TimingConfig> for TimingPolicy {
    fn from(config: &TimingConfig) -> Self {
        TimingPolicy {
            usb_timeout: Duration::from_millis(u64::from(config.usb_timeout)),
            clear_line_wait: Duration::from_millis(config.clear_line_wait),
            erase_sector_wait: Duration::from_millis(config.erase_sector_wait),
            min_icon_wait: Duration::from_millis(config.min_icon_wait),
            max_icon_wait: Duration::from_millis(config.max_icon_wait),
            write_page_wait: Duration::from_millis(config.write_page_wait),
            sysinfo_wait: Duration::from_millis(config.sysinfo_wait),
            max_text_wait: Duration::from_millis(config.max_text_wait),
            chars_per_icon: config.chars_per_icon,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Returns the timing policy for display sessions.
    pub fn timing_policy(&self) -> TimingPolicy {
        TimingPolicy::from(&self.timing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library() {
        assert_eq!(Config::default().timing_policy(), TimingPolicy::default());
    }

    #[test]
    fn test_partial_timing_table() {
        let config: Config = toml::from_str(
            r#"
            [timing]
            max_icon_wait = 900
            chars_per_icon = 3.0
            "#,
        )
        .unwrap();
        let policy = config.timing_policy();
        assert_eq!(policy.max_icon_wait, Duration::from_millis(900));
        assert_eq!(policy.chars_per_icon, 3.0);
        assert_eq!(policy.min_icon_wait, Duration::from_millis(10));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.timing_policy(), TimingPolicy::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let text = Config::default().to_toml().unwrap();
        assert!(text.contains("[timing]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.timing_policy(), TimingPolicy::default());
    }

    #[test]
    fn test_usb_timeout_must_fit_u32() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            [timing]
            usb_timeout = 5000000000
            "#,
        );
        assert!(result.is_err());
    }
}
