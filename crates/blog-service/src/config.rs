//! Configuration loading and management

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for the blog service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Site-wide presentation settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Visit-counter settings
    #[serde(default)]
    pub counter: CounterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Name shown in page titles and headers
    #[serde(default = "default_site_name")]
    pub name: String,

    /// How many posts the front page lists
    #[serde(default = "default_front_page_posts")]
    pub front_page_posts: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            front_page_posts: default_front_page_posts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Name of the cookie carrying the tamper-evident visit count
    #[serde(default = "default_counter_cookie")]
    pub cookie_name: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_counter_cookie(),
        }
    }
}

fn default_site_name() -> String {
    "Scribe".to_string()
}

fn default_front_page_posts() -> usize {
    10
}

fn default_counter_cookie() -> String {
    "visits".to_string()
}

impl Config {
    /// Load configuration from the data directory
    pub fn load(data_path: &str) -> Result<Self> {
        let config_file = Path::new(data_path).join("config.json");

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)
                .with_context(|| format!("Failed to read config file: {:?}", config_file))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| "Failed to parse config.json")?;
            tracing::info!("Loaded configuration from {:?}", config_file);
            Ok(config)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_file);
            let config = Config::default();

            // Create data directory if it doesn't exist
            std::fs::create_dir_all(data_path)
                .with_context(|| format!("Failed to create data directory: {}", data_path))?;

            // Write default config for reference
            let content = serde_json::to_string_pretty(&config)?;
            std::fs::write(&config_file, content)
                .with_context(|| format!("Failed to write default config: {:?}", config_file))?;
            tracing::info!("Created default config at {:?}", config_file);

            Ok(config)
        }
    }
}
