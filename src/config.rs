//! Configuration
//!
//! Values are layered in this order, later layers winning:
//!
//! 1. built-in defaults (the published document locations),
//! 2. a TOML or JSON file (`--config`, or `hotel-xml.toml` / `hotel-xml.json`
//!    in the working directory, then in the user config directory),
//! 3. `HOTEL_XML_*` environment variables,
//! 4. command line flags.

use crate::cli::{Cli, VerbosityLevel};
use crate::document_loader::DocumentSource;
use crate::http_client::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Published location of the conformant hotel listing
pub const DEFAULT_XML_URL: &str = "https://jrrahma1.github.io/cse445_a4/Hotels.xml";

/// Published location of the hotel listing with schema errors
pub const DEFAULT_XML_ERROR_URL: &str = "https://jrrahma1.github.io/cse445_a4/HotelsErrors.xml";

/// Published location of the hotel listing schema
pub const DEFAULT_XSD_URL: &str = "https://jrrahma1.github.io/cse445_a4/Hotels.xsd";

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub endpoints: EndpointConfig,
    pub network: NetworkConfig,
    pub output: OutputConfig,
}

/// The three document locators the program works on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    #[serde(rename = "xmlURL")]
    pub xml_url: String,
    #[serde(rename = "xmlErrorURL")]
    pub xml_error_url: String,
    #[serde(rename = "xsdURL")]
    pub xsd_url: String,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent override
    pub user_agent: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub verbose: bool,
    pub quiet: bool,
    pub debug: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            xml_url: DEFAULT_XML_URL.to_string(),
            xml_error_url: DEFAULT_XML_ERROR_URL.to_string(),
            xsd_url: DEFAULT_XSD_URL.to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: None,
        }
    }
}

impl From<&NetworkConfig> for HttpClientConfig {
    fn from(network: &NetworkConfig) -> Self {
        let defaults = HttpClientConfig::default();
        Self {
            timeout_seconds: network.timeout_seconds,
            user_agent: network.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }
}

impl Config {
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.output.quiet {
            VerbosityLevel::Quiet
        } else if self.output.debug {
            VerbosityLevel::Debug
        } else if self.output.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    const CONFIG_NAMES: [&'static str; 4] = [
        "hotel-xml.toml",
        "hotel-xml.json",
        ".hotel-xml.toml",
        ".hotel-xml.json",
    ];

    /// Load configuration with precedence: defaults -> file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        Self::load_config_with(cli, &SystemEnvProvider).await
    }

    /// Load configuration with a custom environment provider
    pub async fn load_config_with(cli: &Cli, env: &impl EnvProvider) -> Result<Config> {
        let config = if let Some(config_path) = &cli.config {
            Self::load_from_file(config_path).await?
        } else if let Some(found_config) = Self::find_config_file().await? {
            found_config
        } else {
            Config::default()
        };

        let config = Self::apply_environment_overrides_with(env, config)?;
        let config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub async fn find_config_file() -> Result<Option<Config>> {
        // Check current directory first
        for name in &Self::CONFIG_NAMES {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("hotel-xml");
            for name in &Self::CONFIG_NAMES {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(url) = env.get("HOTEL_XML_XML_URL") {
            config.endpoints.xml_url = url;
        }

        if let Some(url) = env.get("HOTEL_XML_XML_ERROR_URL") {
            config.endpoints.xml_error_url = url;
        }

        if let Some(url) = env.get("HOTEL_XML_XSD_URL") {
            config.endpoints.xsd_url = url;
        }

        if let Some(timeout) = env.get("HOTEL_XML_TIMEOUT") {
            config.network.timeout_seconds = timeout.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid HOTEL_XML_TIMEOUT value: {}", timeout))
            })?;
        }

        if let Some(verbose) = env.get("HOTEL_XML_VERBOSE") {
            config.output.verbose = verbose.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid HOTEL_XML_VERBOSE value: {}", verbose))
            })?;
        }

        if let Some(quiet) = env.get("HOTEL_XML_QUIET") {
            config.output.quiet = quiet.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid HOTEL_XML_QUIET value: {}", quiet))
            })?;
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if let Some(url) = &cli.xml_url {
            config.endpoints.xml_url = url.clone();
        }
        if let Some(url) = &cli.xml_error_url {
            config.endpoints.xml_error_url = url.clone();
        }
        if let Some(url) = &cli.xsd_url {
            config.endpoints.xsd_url = url.clone();
        }

        if let Some(timeout) = cli.timeout {
            config.network.timeout_seconds = timeout;
        }

        if cli.verbose {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
            config.output.debug = false;
        }
        if cli.debug {
            config.output.debug = true;
            config.output.quiet = false;
        }

        config
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        Self::validate_locator("xmlURL", &config.endpoints.xml_url)?;
        Self::validate_locator("xmlErrorURL", &config.endpoints.xml_error_url)?;
        Self::validate_locator("xsdURL", &config.endpoints.xsd_url)?;

        if config.network.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_locator(entry: &str, locator: &str) -> Result<()> {
        let source = DocumentSource::parse(locator).map_err(|_| {
            ConfigError::Validation(format!("{} must not be empty", entry))
        })?;

        if let DocumentSource::Remote(url) = source {
            reqwest::Url::parse(&url).map_err(|e| {
                ConfigError::Validation(format!("{} is not a valid URL ({}): {}", entry, url, e))
            })?;
        }

        Ok(())
    }
}
