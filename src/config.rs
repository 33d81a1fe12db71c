//! Application configuration

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_with::serde_as;

use crate::errors::UpdaterError;

pub const ENV_PREFIX: &str = "TRAINUPDATER";

pub const DEFAULT_ENDPOINT: &str =
    "https://emma.mav.hu/otp2-backend/otp/routers/default/index/graphql";

/// Route long names shorter than this many characters are treated as a line label
/// (e.g. "S60") and prefixed to the trip short name. Longer values are free text.
pub const DEFAULT_SHORT_LABEL_MAX_LEN: usize = 6;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub graphql: GraphQlConfig,
    pub region: RegionConfig,
    pub output: OutputConfig,
    pub naming: NamingConfig,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct GraphQlConfig {
    pub endpoint: String,
    /// Per-request timeout; expiry counts as an HTTP failure
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub timeout: Duration,
    /// Language requested for `route.longName`
    pub language: String,
}

/// Bounding box and vehicle modes for the position query
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RegionConfig {
    pub sw_lat: f64,
    pub sw_lon: f64,
    pub ne_lat: f64,
    pub ne_lon: f64,
    pub modes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Scratch file the snapshot is written to first
    pub temp_path: PathBuf,
    /// Location served to the front end
    pub static_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NamingConfig {
    pub short_label_max_len: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    pub fn load_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("graphql.endpoint", DEFAULT_ENDPOINT)?
            .set_default("graphql.timeout", 30)?
            .set_default("graphql.language", "hu")?
            .set_default("region.sw_lat", 45.5)?
            .set_default("region.sw_lon", 16.1)?
            .set_default("region.ne_lat", 48.7)?
            .set_default("region.ne_lon", 22.8)?
            .set_default("region.modes", vec!["RAIL", "RAIL_REPLACEMENT_BUS"])?
            .set_default("output.temp_path", "/tmp/train_data.json")?
            .set_default("output.static_path", "train_data.json")?
            .set_default(
                "naming.short_label_max_len",
                DEFAULT_SHORT_LABEL_MAX_LEN as u64,
            )?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("region.modes"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), UpdaterError> {
        self.graphql.validate()?;
        self.region.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> UpdaterError {
    UpdaterError::ConfigurationError {
        message: message.into(),
    }
}

impl GraphQlConfig {
    fn validate(&self) -> Result<(), UpdaterError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| invalid(format!("Invalid GraphQL endpoint: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("GraphQL endpoint must be an http(s) URL"));
        }
        if self.timeout.is_zero() {
            return Err(invalid("Request timeout must be greater than zero"));
        }
        Ok(())
    }
}

impl RegionConfig {
    fn validate(&self) -> Result<(), UpdaterError> {
        if self.sw_lat >= self.ne_lat || self.sw_lon >= self.ne_lon {
            return Err(invalid(
                "Bounding box south-west corner must lie below and left of north-east corner",
            ));
        }
        if self.modes.is_empty() {
            return Err(invalid("At least one vehicle mode is required"));
        }
        Ok(())
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<(), UpdaterError> {
        if self.temp_path.as_os_str().is_empty() || self.static_path.as_os_str().is_empty() {
            return Err(invalid("Output paths cannot be empty"));
        }
        if self.temp_path == self.static_path {
            return Err(invalid("Temporary and published output paths must differ"));
        }
        Ok(())
    }
}
