//! # Emissor Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TUDBOOM_API_URL=http://localhost:3000                              │
//! │     TUDBOOM_TIMEOUT_SECS=5                                             │
//! │     TUDBOOM_INPUT_POLICY=coerce                                        │
//! │     TUDBOOM_FONTS_DIR=/usr/share/fonts/truetype/liberation             │
//! │                                                                         │
//! │  2. TOML Config File (--config, or the default location)               │
//! │     ~/.config/tudboom-emissor/emissor.toml (Linux)                     │
//! │     ~/Library/Application Support/com.tudboom.emissor/emissor.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api-tudboom.vercel.app"
//! timeout_secs = 15
//!
//! [issuer]
//! name = "Tudboom"
//! legal_name = "TUDBOOM LTDA"
//!
//! [draft]
//! tax_rate_bps = 1000   # 10%
//! input_policy = "reject"   # reject | coerce
//!
//! [export]
//! fonts_dir = "./fonts"
//! font_family = "LiberationSans"
//! out_dir = "."
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use tudboom_core::validation::InputPolicy;
use tudboom_core::{Issuer, TaxRate};
use tudboom_store::ApiSettings;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "emissor.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// Draft defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSettings {
    /// Tax rate applied when "include tax" is on, in basis points.
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// What to do with non-numeric quantity / price input.
    #[serde(default)]
    pub input_policy: InputPolicy,
}

fn default_tax_rate_bps() -> u32 {
    tudboom_core::DEFAULT_TAX_RATE_BPS
}

impl Default for DraftSettings {
    fn default() -> Self {
        DraftSettings {
            tax_rate_bps: default_tax_rate_bps(),
            input_policy: InputPolicy::default(),
        }
    }
}

impl DraftSettings {
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

/// Where and how exports are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Directory holding the TTF files of `font_family` (PDF only).
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,

    /// Font family base name, e.g. `LiberationSans` for
    /// `LiberationSans-Regular.ttf`, `LiberationSans-Bold.ttf`, ...
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Default output directory for exported files.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("./fonts")
}

fn default_font_family() -> String {
    "LiberationSans".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            fonts_dir: default_fonts_dir(),
            font_family: default_font_family(),
            out_dir: default_out_dir(),
        }
    }
}

// =============================================================================
// Emissor Config
// =============================================================================

/// Complete emissor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissorConfig {
    #[serde(default)]
    pub api: ApiSettings,

    /// Company printed on every nota.
    #[serde(default)]
    pub issuer: Issuer,

    #[serde(default)]
    pub draft: DraftSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

impl EmissorConfig {
    /// Loads configuration from file and environment.
    ///
    /// An explicit `config_path` must exist; the default location is
    /// optional and falls back to defaults when absent.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        // Override with environment variables
        config.apply_env_overrides();

        // Validate the configuration
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading emissor config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.draft.tax_rate_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "tax_rate_bps must be at most 10000 (100%), got {}",
                self.draft.tax_rate_bps
            )));
        }

        if self.export.font_family.trim().is_empty() {
            return Err(ConfigError::Invalid("font_family must not be empty".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API URL
        if let Some(url) = lookup("TUDBOOM_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        // Request timeout
        if let Some(timeout) = lookup("TUDBOOM_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid TUDBOOM_TIMEOUT_SECS"),
            }
        }

        // Input policy
        if let Some(policy) = lookup("TUDBOOM_INPUT_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding input policy from environment");
                    self.draft.input_policy = parsed;
                }
                Err(_) => warn!(value = %policy, "Ignoring invalid TUDBOOM_INPUT_POLICY"),
            }
        }

        // Fonts directory
        if let Some(dir) = lookup("TUDBOOM_FONTS_DIR") {
            self.export.fonts_dir = PathBuf::from(dir);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tudboom", "emissor")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
