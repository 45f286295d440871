//! Configuration management for the Crop Advisor service
//!
//! Resolved once at startup, in increasing precedence:
//! 1. Default values in code
//! 2. Optional configuration file (`config/<environment>.toml`)
//! 3. Environment variable overrides with the `CROP_ADVISOR_` prefix
//!    (nested keys separated by `__`, e.g. `CROP_ADVISOR_SERVER__PORT`)
//! 4. The plain variables `PORT`, `OPENWEATHER_API_KEY` and `GMAPS_API_KEY`
//!
//! A `.env` file is read by `main` beforehand and only fills variables that
//! are not already set.

use std::{path::PathBuf, time::Duration};

use config::{ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_SOILGRIDS_ENDPOINT: &str = "https://rest.isric.org/soilgrids/v2.0";

/// Value shipped in the sample `.env`; treated as "no key"
const PLACEHOLDER_API_KEY: &str = "your_openweather_api_key_here";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Outbound HTTP settings shared by the providers
    pub upstream: UpstreamConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Soil provider configuration
    pub soil: SoilConfig,

    /// Client-side map configuration
    pub maps: MapsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Directory holding `index.html` and the `/static` assets
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Per-call timeout for provider requests
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Supported forecast providers
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum WeatherProviderKind {
    /// OpenWeatherMap 5 day / 3 hour forecast, bucketed into daily arrays
    #[serde(rename = "openweathermap")]
    OpenWeatherMap,

    /// OpenWeatherMap One Call, daily list with current conditions
    #[serde(rename = "openweathermap_onecall")]
    OpenWeatherMapOneCall,

    /// Open-Meteo daily aggregates, no key required
    #[serde(rename = "open_meteo")]
    OpenMeteo,
}

impl WeatherProviderKind {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            WeatherProviderKind::OpenWeatherMap => "https://api.openweathermap.org/data/2.5",
            WeatherProviderKind::OpenWeatherMapOneCall => "https://api.openweathermap.org/data/3.0",
            WeatherProviderKind::OpenMeteo => "https://api.open-meteo.com/v1",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, WeatherProviderKind::OpenMeteo)
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeatherProviderKind::OpenWeatherMap => "openweathermap",
            WeatherProviderKind::OpenWeatherMapOneCall => "openweathermap_onecall",
            WeatherProviderKind::OpenMeteo => "open_meteo",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Which forecast API to call
    pub provider: WeatherProviderKind,

    /// Base URL override; the provider default is used when unset
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// Weather API key
    #[serde(default)]
    pub api_key: Option<String>,
}

impl WeatherConfig {
    pub fn endpoint(&self) -> &str {
        self.api_endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| self.provider.default_endpoint())
    }

    /// Configured key, ignoring blanks and the sample placeholder
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

/// What to report when SoilGrids has no usable value
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoilFallback {
    /// Estimate pH from the coordinate's latitude band
    LatitudeEstimate,
    /// Report pH as unknown
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SoilConfig {
    /// SoilGrids API base URL
    pub api_endpoint: String,

    pub fallback: SoilFallback,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapsConfig {
    /// Browser map key exposed through `/config.js`
    pub api_key: String,
}

/// Plain, unprefixed variables honoured for compatibility with existing `.env` files
#[derive(Debug, Default, Clone)]
pub struct WellKnownVars {
    pub port: Option<String>,
    pub openweather_api_key: Option<String>,
    pub gmaps_api_key: Option<String>,
}

impl WellKnownVars {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            port: var("PORT"),
            openweather_api_key: var("OPENWEATHER_API_KEY"),
            gmaps_api_key: var("GMAPS_API_KEY").or_else(|| var("VITE_GOOGLE_MAPS_API_KEY")),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROP_ADVISOR_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        Self::load_with(&environment, WellKnownVars::from_env())
    }

    /// Load configuration for an environment with explicit plain-variable overrides
    pub fn load_with(environment: &str, vars: WellKnownVars) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "static")?
            .set_default("upstream.timeout_secs", 10)?
            .set_default("weather.provider", "openweathermap")?
            .set_default("soil.api_endpoint", DEFAULT_SOILGRIDS_ENDPOINT)?
            .set_default("soil.fallback", "latitude_estimate")?
            .set_default("maps.api_key", "")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROP_ADVISOR_ prefix)
            .add_source(
                Environment::with_prefix("CROP_ADVISOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", vars.port)?
            .set_override_option("weather.api_key", vars.openweather_api_key)?
            .set_override_option("maps.api_key", vars.gmaps_api_key)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            upstream: UpstreamConfig { timeout_secs: 10 },
            weather: WeatherConfig {
                provider: WeatherProviderKind::OpenWeatherMap,
                api_endpoint: None,
                api_key: None,
            },
            soil: SoilConfig {
                api_endpoint: DEFAULT_SOILGRIDS_ENDPOINT.to_string(),
                fallback: SoilFallback::LatitudeEstimate,
            },
            maps: MapsConfig {
                api_key: String::new(),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}
