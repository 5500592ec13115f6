use super::types::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File};

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    config_file: Option<String>,
    load_env: bool,
    endpoint_override: Option<String>,
    log_level_override: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            config_file: None,
            load_env: false,
            endpoint_override: None,
            log_level_override: None,
        }
    }

    /// Load configuration from file; an explicit path must exist
    pub fn load_from_file(mut self, path: Option<&str>) -> Self {
        self.config_file = path.map(String::from);
        self
    }

    /// Load configuration from `NL2SPARQL__SECTION__KEY` environment variables
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Override the endpoint URL (command line)
    pub fn with_endpoint(mut self, url: Option<&str>) -> Self {
        self.endpoint_override = url.map(String::from);
        self
    }

    /// Override the log level (command line)
    pub fn with_log_level(mut self, level: Option<&str>) -> Self {
        self.log_level_override = level.map(String::from);
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<AppConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(config_path) = &self.config_file {
            builder = builder.add_source(File::with_name(config_path).required(true));
        } else {
            builder = builder
                .add_source(File::with_name("nl2sparql").required(false))
                .add_source(File::with_name("config/nl2sparql").required(false));
        }

        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix("NL2SPARQL")
                    .prefix_separator("__")
                    .separator("__"),
            );
        }

        if let Some(url) = &self.endpoint_override {
            builder = builder.set_override("endpoint.url", url.as_str())?;
        }
        if let Some(level) = &self.log_level_override {
            builder = builder.set_override("logging.level", level.as_str())?;
        }

        let config: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_explicit_file_and_defaults() {
        let config = ConfigLoader::new()
            .load_from_file(Some("/nonexistent/ignored"))
            .build();
        assert!(config.is_err());

        let config = ConfigLoader::new().build().unwrap();
        assert_eq!(config.endpoint.url, "http://localhost:3030/firesat/sparql");
    }

    #[test]
    fn test_file_then_cli_override() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[endpoint]\nurl = \"http://fuseki.example.org:3030/ds/sparql\"\nmax_retries = 5\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = ConfigLoader::new()
            .load_from_file(Some(&path))
            .build()
            .unwrap();
        assert_eq!(config.endpoint.url, "http://fuseki.example.org:3030/ds/sparql");
        assert_eq!(config.endpoint.max_retries, 5);
        assert_eq!(config.endpoint.timeout_seconds, 30);
        assert_eq!(config.logging.level, "debug");

        let config = ConfigLoader::new()
            .load_from_file(Some(&path))
            .with_endpoint(Some("http://other.example.org/sparql"))
            .with_log_level(Some("warn"))
            .build()
            .unwrap();
        assert_eq!(config.endpoint.url, "http://other.example.org/sparql");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let result = ConfigLoader::new().with_endpoint(Some("not a url")).build();
        assert!(result.is_err());
    }
}
