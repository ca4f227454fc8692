use figment::providers::Env;
use figment::Figment;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use super::logging::LoggingConfig;

/// Errors that prevent the process from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The authorize redirect would fail silently on a non-http(s) host,
    /// so startup refuses it outright.
    #[error("the gitter host URL needs to have http(s) protocol")]
    InvalidHost,
    #[error("error reading configuration: {0}")]
    Extract(#[from] figment::Error),
}

/// Process configuration, read once at startup from environment variables.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Base URL of the identity provider and its REST API.
    #[serde(alias = "HOST")]
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(alias = "PORT")]
    #[serde(default = "default_port")]
    pub port: u16,
    /// OAuth client id issued by the provider.
    #[serde(alias = "GITTER_KEY")]
    pub gitter_key: Option<String>,
    /// OAuth client secret issued by the provider.
    #[serde(alias = "GITTER_SECRET")]
    pub gitter_secret: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_host() -> String {
    "https://gitter.im".to_string()
}

fn default_port() -> u16 {
    7000
}

/// Load config from the process environment
/// (`HOST`, `PORT`, `GITTER_KEY`, `GITTER_SECRET`).
pub fn load_config() -> Result<Config, ConfigError> {
    from_figment(Figment::new().merge(Env::raw()))
}

/// Extracts and validates a [`Config`] from the given figment.
pub fn from_figment(figment: Figment) -> Result<Config, ConfigError> {
    let mut config: Config = figment.extract()?;

    // Credentials pasted into env files tend to carry stray whitespace.
    config.gitter_key = config.gitter_key.map(|k| k.trim().to_string());
    config.gitter_secret = config.gitter_secret.map(|s| s.trim().to_string());

    config.host_url()?;

    Ok(config)
}

impl Config {
    /// The provider host as a parsed URL. Fails unless the scheme is http(s).
    pub fn host_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.host).map_err(|_| ConfigError::InvalidHost)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidHost),
        }
    }
}
