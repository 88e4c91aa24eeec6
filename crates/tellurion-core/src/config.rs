use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

/// Default geolocation endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ipapi.co/json/";

/// Bounds for the lookup deadline. Values outside are clamped, not
/// rejected — a bad config file should never stop the shell.
const TIMEOUT_FLOOR_MS: u64 = 3_000;
const TIMEOUT_CEIL_MS: u64 = 5_000;
const TIMEOUT_DEFAULT_MS: u64 = 4_000;

/// Whether the location panel is always shown or revealed on activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisclosureMode {
    AlwaysVisible,
    ClickToReveal,
}

/// Render backend variant for the location widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Auto-rotating world-map canvas with a visitor marker.
    Canvas,
    /// Looping pre-drawn globe frames.
    Frames,
    /// Styled terminal text with a blinking cursor.
    Text,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] =
        [StrategyKind::Canvas, StrategyKind::Frames, StrategyKind::Text];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Canvas => "canvas",
            StrategyKind::Frames => "frames",
            StrategyKind::Text => "text",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canvas" => Some(StrategyKind::Canvas),
            "frames" => Some(StrategyKind::Frames),
            "text" => Some(StrategyKind::Text),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for one location widget instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Lookup deadline in milliseconds, clamped to 3000..=5000.
    pub timeout_ms: u64,
    /// Suppress country and IP in all rendered text.
    pub privacy_mode: bool,
    pub disclosure_mode: DisclosureMode,
    pub strategy: StrategyKind,
    /// IP-geolocation endpoint returning a JSON object.
    pub endpoint: String,
    /// Host name shown in the widget's prompt line.
    pub prompt_host: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            timeout_ms: TIMEOUT_DEFAULT_MS,
            privacy_mode: true,
            disclosure_mode: DisclosureMode::ClickToReveal,
            strategy: StrategyKind::Text,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            prompt_host: "tellurion".to_string(),
        }
    }
}

impl WidgetConfig {
    /// The lookup deadline with bounds applied.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.clamp(TIMEOUT_FLOOR_MS, TIMEOUT_CEIL_MS))
    }
}

/// Top-level configuration for the shell.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tick interval for the event loop in milliseconds.
    pub tick_ms: u64,
    pub widget: WidgetConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            widget: WidgetConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse configuration TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse configuration TOML")
    }

    /// Load configuration from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid configuration at {}", path.display()))
    }

    /// Load from the default location, falling back to defaults.
    ///
    /// A missing file is normal and silent; an unreadable or malformed
    /// file is logged and otherwise ignored.
    pub fn load_or_default() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "falling back to default configuration");
                Self::default()
            }
        }
    }
}

/// Configuration file path.
///
/// Precedence: `TELLURION_CONFIG` env var > platform config dir
/// (`~/.config/tellurion/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("TELLURION_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tellurion")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = WidgetConfig::default();
        assert_eq!(config.timeout_ms, 4_000);
        assert!(config.privacy_mode);
        assert_eq!(config.disclosure_mode, DisclosureMode::ClickToReveal);
        assert_eq!(config.strategy, StrategyKind::Text);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn timeout_is_clamped_to_bounds() {
        let mut config = WidgetConfig::default();
        config.timeout_ms = 100;
        assert_eq!(config.timeout(), Duration::from_millis(3_000));
        config.timeout_ms = 60_000;
        assert_eq!(config.timeout(), Duration::from_millis(5_000));
        config.timeout_ms = 3_500;
        assert_eq!(config.timeout(), Duration::from_millis(3_500));
    }

    #[test]
    fn parses_full_config() {
        let config = AppConfig::from_toml_str(
            r#"
tick_ms = 50

[widget]
timeout_ms = 3500
privacy_mode = false
disclosure_mode = "always-visible"
strategy = "canvas"
endpoint = "https://geo.example/json/"
prompt_host = "example.io"
"#,
        )
        .unwrap();

        assert_eq!(config.tick_ms, 50);
        assert_eq!(config.widget.timeout_ms, 3_500);
        assert!(!config.widget.privacy_mode);
        assert_eq!(config.widget.disclosure_mode, DisclosureMode::AlwaysVisible);
        assert_eq!(config.widget.strategy, StrategyKind::Canvas);
        assert_eq!(config.widget.endpoint, "https://geo.example/json/");
        assert_eq!(config.widget.prompt_host, "example.io");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = AppConfig::from_toml_str("[widget]\nstrategy = \"frames\"\n").unwrap();
        assert_eq!(config.tick_ms, 100);
        assert_eq!(config.widget.strategy, StrategyKind::Frames);
        assert!(config.widget.privacy_mode);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = AppConfig::from_toml_str("widget = ]broken[")
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to parse configuration TOML"));
    }

    #[test]
    fn strategy_kind_parse_round_trips() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::parse(kind.name()), Some(kind));
        }
        assert_eq!(StrategyKind::parse("CANVAS"), Some(StrategyKind::Canvas));
        assert_eq!(StrategyKind::parse("sixel"), None);
    }
}
