use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use toml;
use tracing::{info, warn};

/// Configuration for the item sharing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address and port the HTTP server binds to
    pub bind_address: String,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    /// Optional update for database URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional update for bind address
    #[serde(default)]
    pub bind_address: Option<String>,
}

/// Command line arguments for the application
#[derive(Parser, Debug)]
#[clap(name = "shareit", about = "An item sharing service")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address and port to bind the HTTP server to
    #[clap(long, env = "SHAREIT_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Path to a TOML config file
    #[clap(long, env = "SHAREIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug mode
    #[clap(long, env = "SHAREIT_DEBUG", default_value_t = false)]
    pub debug: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            bind_address: update.bind_address.unwrap_or(self.bind_address),
        }
    }
}

/// Returns the base (default) configuration
pub fn base_config() -> Config {
    Config {
        database_url: "shareit.db".to_string(),
        bind_address: "127.0.0.1:8080".to_string(),
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: &CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url.clone(),
        bind_address: args.bind_address.clone(),
    }
}

/// Gets the complete configuration by combining defaults with values from
/// the config file, environment variables, and command line arguments in
/// order of increasing precedence
pub fn get_config(args: &CliArgs) -> Config {
    let base = base_config();

    let config = base
        .apply_update(config_from_file(args.config.clone()).unwrap_or_default())
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, bind_address={}",
        config.database_url, config.bind_address
    );

    config
}
