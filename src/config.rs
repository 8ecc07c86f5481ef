use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analytics::{TfIdfConfig, DEFAULT_HISTOGRAM_BINS, DEFAULT_TOP_N};

/// Configuration for the liked-videos analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Library export location
    pub input: InputConfig,

    /// Aggregation settings
    pub analytics: AnalyticsConfig,

    /// Output and logging settings
    pub output: OutputConfig,

    /// HTTP API settings
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the liked videos JSON export
    pub library_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Entries kept in ranked tables (channels, tags, title terms)
    pub top_n: usize,

    /// Number of equal-width duration histogram bins
    pub histogram_bins: usize,

    /// Plot histogram counts on a logarithmic axis
    pub log_count_axis: bool,

    /// Title term weighting
    pub tfidf: TfIdfConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format
    pub format: OutputFormat,

    /// Log level
    pub log_level: String,

    /// Include the filtered rows in the report
    pub show_rows: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow!("Unknown output format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bind address
    pub host: String,

    /// Listening port
    pub port: u16,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_paths = [
            "liked-analyzer.toml",
            "config/liked-analyzer.toml",
            "/etc/liked-analyzer/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("LIKED_ANALYZER_INPUT") {
            config.input.library_path = PathBuf::from(path);
        }

        if let Ok(top_n) = std::env::var("LIKED_ANALYZER_TOP_N") {
            config.analytics.top_n = top_n.parse().unwrap_or(DEFAULT_TOP_N);
        }

        if let Ok(log_level) = std::env::var("LIKED_ANALYZER_LOG_LEVEL") {
            config.output.log_level = log_level;
        }

        if let Ok(port) = std::env::var("LIKED_ANALYZER_PORT") {
            config.api.port = port.parse().unwrap_or(8080);
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.analytics.top_n == 0 {
            return Err(anyhow!("top_n must be greater than 0"));
        }

        if self.analytics.histogram_bins == 0 {
            return Err(anyhow!("histogram_bins must be greater than 0"));
        }

        if self.api.port == 0 {
            return Err(anyhow!("api port must be greater than 0"));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Liked Analyzer Configuration:\n\
            - Library: {}\n\
            - Top N: {}\n\
            - Histogram Bins: {}\n\
            - TF-IDF: smooth_idf={}, sublinear_tf={}, l2_normalize={}\n\
            - Output Format: {:?}",
            self.input.library_path.display(),
            self.analytics.top_n,
            self.analytics.histogram_bins,
            self.analytics.tfidf.smooth_idf,
            self.analytics.tfidf.sublinear_tf,
            self.analytics.tfidf.l2_normalize,
            self.output.format,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig {
                library_path: PathBuf::from("liked.json"),
            },
            analytics: AnalyticsConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Text,
                log_level: "info".to_string(),
                show_rows: false,
            },
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            log_count_axis: true, // durations are heavily right-skewed
            tfidf: TfIdfConfig::default(),
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_library_path(mut self, path: PathBuf) -> Self {
        self.config.input.library_path = path;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.config.analytics.top_n = top_n;
        self
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.config.analytics.histogram_bins = bins;
        self
    }

    pub fn with_tfidf(mut self, tfidf: TfIdfConfig) -> Self {
        self.config.analytics.tfidf = tfidf;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.api.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
