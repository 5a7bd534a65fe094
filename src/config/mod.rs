use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::formatters::FormatOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// How the transcript is chosen and rendered
    pub transcript: TranscriptSettings,

    /// How YouTube is contacted
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Preferred caption language
    pub language: String,

    /// Prefix every line with its timestamp
    pub include_timestamps: bool,

    /// Heading of the inserted section, also used to detect an existing one
    pub section_heading: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Scheme and host all requests are made against
    pub base_url: String,

    /// Browser User-Agent sent with every request
    pub user_agent: String,

    /// Accept-Language header sent with every request
    pub accept_language: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Innertube client the player request pretends to be
    pub client_name: String,

    /// Version of that client
    pub client_version: String,

    /// Patterns locating the innertube API key in the watch page, tried in order.
    /// Each must have exactly one capture group.
    pub api_key_patterns: Vec<String>,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            include_timestamps: false,
            section_heading: "## Transcript".to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            user_agent: concat!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
                "(KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
            )
            .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout_secs: 15,
            client_name: "ANDROID".to_string(),
            client_version: "20.10.38".to_string(),
            api_key_patterns: vec![
                r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#.to_string(),
                r#"INNERTUBE_API_KEY\\":\s*\\"([a-zA-Z0-9_-]+)\\""#.to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?).await
    }

    /// Load configuration from an explicit path, writing defaults if it is missing
    pub async fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs_err::read_to_string(path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path).await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // A file in the working directory wins, handy for per-vault settings
        let local_config = PathBuf::from("notescribe.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("notescribe").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.transcript.language.trim().is_empty() {
            anyhow::bail!("Transcript language must not be empty");
        }

        if self.transcript.section_heading.trim().is_empty() {
            anyhow::bail!("Section heading must not be empty");
        }

        if self.network.timeout_secs == 0 {
            anyhow::bail!("Network timeout must be at least one second");
        }

        self.network.compiled_key_patterns()?;

        Ok(())
    }

    /// Rendering options for the formatter
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            include_timestamps: self.transcript.include_timestamps,
            section_heading: self.transcript.section_heading.clone(),
        }
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Language: {}", self.transcript.language);
        println!("  Timestamps: {}", self.transcript.include_timestamps);
        println!("  Section Heading: {}", self.transcript.section_heading);
        println!("  Base URL: {}", self.network.base_url);
        println!("  Timeout: {}s", self.network.timeout_secs);
        println!(
            "  Player Client: {} {}",
            self.network.client_name, self.network.client_version
        );
        println!("  API Key Patterns: {}", self.network.api_key_patterns.len());
    }
}

impl NetworkConfig {
    /// Compile the API key patterns, rejecting ones without a single capture group
    pub fn compiled_key_patterns(&self) -> Result<Vec<Regex>> {
        if self.api_key_patterns.is_empty() {
            anyhow::bail!("At least one API key pattern must be configured");
        }

        self.api_key_patterns
            .iter()
            .map(|pattern| {
                let regex = Regex::new(pattern)
                    .with_context(|| format!("Invalid API key pattern: {pattern}"))?;
                if regex.captures_len() != 2 {
                    anyhow::bail!("API key pattern must have exactly one capture group: {pattern}");
                }
                Ok(regex)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.transcript.language, "en");
        assert!(!config.transcript.include_timestamps);
        assert_eq!(config.transcript.section_heading, "## Transcript");
        assert_eq!(config.network.timeout_secs, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_key_patterns_match_both_encodings() {
        let patterns = NetworkConfig::default().compiled_key_patterns().unwrap();
        let plain = r#"ytcfg.set({"INNERTUBE_API_KEY": "AIzaSyPlain_Key-1"});"#;
        let escaped = r#"var data = "{\"INNERTUBE_API_KEY\":\"AIzaSyEscaped_Key-2\"}";"#;

        assert_eq!(&patterns[0].captures(plain).unwrap()[1], "AIzaSyPlain_Key-1");
        assert!(patterns[0].captures(escaped).is_none());
        assert_eq!(&patterns[1].captures(escaped).unwrap()[1], "AIzaSyEscaped_Key-2");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.transcript.section_heading = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.network.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.network.api_key_patterns = vec!["no groups".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.network.api_key_patterns = vec!["(unclosed".to_string()];
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_writes_defaults_then_reads_them_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let created = Config::load_from(&path).await.unwrap();
        assert!(path.exists());

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded.transcript.language, created.transcript.language);
        assert_eq!(loaded.network.api_key_patterns, created.network.api_key_patterns);
    }

    #[tokio::test]
    async fn test_partial_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "transcript:\n  language: de\n  include_timestamps: true\n").unwrap();

        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config.transcript.language, "de");
        assert!(config.transcript.include_timestamps);
        assert_eq!(config.transcript.section_heading, "## Transcript");
        assert_eq!(config.network.base_url, "https://www.youtube.com");
    }
}
