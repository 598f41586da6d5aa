use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::geocode::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use crate::overlay::{Alignment, OverlayOptions};

/// Top-level configuration for metatagger.
///
/// Controls which overlay lines are drawn, which fonts draw them, how place
/// names are looked up, and where rendered images go.
///
/// # Loading
///
/// ```rust,no_run
/// use metatagger::config::Config;
/// use metatagger::overlay::Alignment;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.overlay.alignment = Alignment::Right;
/// config.geocoding.enabled = false;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Alignment and line toggles.
    pub overlay: OverlayConfig,
    /// TrueType faces for the three text tiers.
    pub fonts: FontConfig,
    /// Reverse geocoding of GPS coordinates.
    pub geocoding: GeocodingConfig,
    /// Output location, naming, and encoding.
    pub output: OutputConfig,
}

/// Which overlay lines to draw, and on which side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub alignment: Alignment,
    /// Camera model line.
    pub show_model: bool,
    /// City, region, country line (only drawn when the image has GPS data).
    pub show_location: bool,
    /// ISO, focal length, aperture, and shutter speed line.
    pub show_settings: bool,
}

/// Font files, one per style tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    /// Model line, 59 pt.
    pub bold: PathBuf,
    /// Place line, 54 pt.
    pub medium: PathBuf,
    /// Settings line, 49 pt.
    pub regular: PathBuf,
}

/// Reverse geocoding service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// If `false`, no lookups are made and the location line never appears.
    pub enabled: bool,
    /// Nominatim-compatible `/reverse` endpoint.
    pub endpoint: String,
    /// Sent as the `User-Agent` header; Nominatim rejects anonymous clients.
    pub user_agent: String,
}

/// Output and behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for rendered images. Defaults to next to each input.
    pub directory: Option<PathBuf>,
    /// Prepended to the input file stem.
    pub prefix: String,
    /// JPEG quality, 1–100.
    pub jpeg_quality: u8,
    /// If `true`, render but do not write any files.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlay: OverlayConfig {
                alignment: Alignment::Left,
                show_model: true,
                show_location: true,
                show_settings: true,
            },
            fonts: FontConfig {
                bold: PathBuf::from("roboto/Roboto-Bold.ttf"),
                medium: PathBuf::from("roboto/Roboto-Medium.ttf"),
                regular: PathBuf::from("roboto/Roboto-Regular.ttf"),
            },
            geocoding: GeocodingConfig {
                enabled: true,
                endpoint: DEFAULT_ENDPOINT.to_string(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            output: OutputConfig {
                directory: None,
                prefix: "processed_".to_string(),
                jpeg_quality: 95,
                dry_run: false,
            },
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// The overlay section as render options.
    pub fn overlay_options(&self) -> OverlayOptions {
        OverlayOptions {
            alignment: self.overlay.alignment,
            show_model: self.overlay.show_model,
            show_location: self.overlay.show_location,
            show_settings: self.overlay.show_settings,
        }
    }
}
