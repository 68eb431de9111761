//! Configuration file parser for ~/.config/drip/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde, though we log a warning when
//! the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// A commodity ticker to track on the market panel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ticker {
    /// Display label, e.g. "Arabica".
    pub label: String,
    /// Exchange symbol for the futures contract, e.g. "KC=F".
    pub symbol: String,
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified. Missing keys fall back to `Default::default()`.
///
/// Custom Debug impl masks `reader_api_key` to prevent secret leakage in
/// logs, error messages, and debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Refresh interval in minutes for the dashboard fetch cycle.
    /// 0 = manual refresh only.
    pub refresh_interval_minutes: u64,

    /// Ordered candidate locations for the news document. Each entry is
    /// either a filesystem path or an http(s) URL; they are tried in order
    /// until one yields a parseable document.
    pub sources: Vec<String>,

    /// Commodity tickers shown on the market panel.
    pub tickers: Vec<Ticker>,

    /// Optional CORS-style relay for the finance API. When set, quote
    /// requests go to `{quote_relay}{encoded target URL}` instead of
    /// hitting Yahoo directly.
    pub quote_relay: Option<String>,

    /// Readability relay used to turn article links into markdown for the
    /// reader view.
    pub reader_relay: String,

    /// Bearer key for the readability relay (alternative to the
    /// DRIP_READER_KEY env var; the env var takes precedence).
    pub reader_api_key: Option<String>,

    /// Fixed asset list pre-populated into the offline cache at startup.
    pub precache: Vec<String>,

    /// RSS feeds aggregated by the digest exporter.
    pub feeds: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            refresh_interval_minutes: 5,
            sources: vec![
                "./news.json".to_string(),
                "./public/news.json".to_string(),
                "../news.json".to_string(),
            ],
            tickers: vec![
                Ticker {
                    label: "Arabica".to_string(),
                    symbol: "KC=F".to_string(),
                },
                Ticker {
                    label: "Robusta".to_string(),
                    symbol: "RC=F".to_string(),
                },
            ],
            quote_relay: None,
            reader_relay: "https://r.jina.ai".to_string(),
            reader_api_key: None,
            precache: Vec::new(),
            feeds: vec![
                "https://perfectdailygrind.com/feed/".to_string(),
                "https://dailycoffeenews.com/feed/".to_string(),
                "https://sprudge.com/feed/".to_string(),
            ],
        }
    }
}

/// Mask reader_api_key in Debug output to prevent secret leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("theme", &self.theme)
            .field("refresh_interval_minutes", &self.refresh_interval_minutes)
            .field("sources", &self.sources)
            .field("tickers", &self.tickers)
            .field("quote_relay", &self.quote_relay)
            .field("reader_relay", &self.reader_relay)
            .field(
                "reader_api_key",
                &self.reader_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("precache", &self.precache)
            .field("feeds", &self.feeds)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a corrupted or
        // maliciously large config file into memory.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw table first to flag probable typos
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "theme",
                "refresh_interval_minutes",
                "sources",
                "tickers",
                "quote_relay",
                "reader_relay",
                "reader_api_key",
                "precache",
                "feeds",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            sources = config.sources.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.refresh_interval_minutes, 5);
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.sources[0], "./news.json");
        assert_eq!(config.tickers.len(), 2);
        assert_eq!(config.tickers[0].symbol, "KC=F");
        assert_eq!(config.tickers[1].symbol, "RC=F");
        assert!(config.quote_relay.is_none());
        assert_eq!(config.reader_relay, "https://r.jina.ai");
        assert!(config.reader_api_key.is_none());
        assert!(config.precache.is_empty());
        assert_eq!(config.feeds.len(), 3);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/drip_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("drip_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("drip_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "theme = \"light\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.refresh_interval_minutes, 5); // default
        assert_eq!(config.sources.len(), 3); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("drip_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
theme = "light"
refresh_interval_minutes = 10
sources = ["https://example.com/news.json", "./fallback.json"]
quote_relay = "https://relay.example.com/?"
reader_relay = "https://reader.example.com"
reader_api_key = "test-key-123"
precache = ["https://example.com/about.html"]
feeds = ["https://coffee.example.com/feed/"]

[[tickers]]
label = "Arabica"
symbol = "KC=F"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.refresh_interval_minutes, 10);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(
            config.quote_relay.as_deref(),
            Some("https://relay.example.com/?")
        );
        assert_eq!(config.reader_relay, "https://reader.example.com");
        assert_eq!(config.reader_api_key.as_deref(), Some("test-key-123"));
        assert_eq!(config.precache.len(), 1);
        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.tickers.len(), 1);
        assert_eq!(config.tickers[0].label, "Arabica");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("drip_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let dir = std::env::temp_dir().join("drip_config_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
theme = "dark"
totally_fake_key = "should not fail"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let dir = std::env::temp_dir().join("drip_config_test_wrongtype");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "sources = 42\n").unwrap();

        assert!(Config::load(&path).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("drip_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = "a".repeat(1_048_577);
        std::fs::write(&path, content).unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::TooLarge(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = Config {
            reader_api_key: Some("super-secret-key-12345".to_string()),
            ..Config::default()
        };

        let debug_output = format!("{:?}", config);
        assert!(
            !debug_output.contains("super-secret-key-12345"),
            "Debug output should not contain the API key"
        );
        assert!(debug_output.contains("[REDACTED]"));
    }
}
