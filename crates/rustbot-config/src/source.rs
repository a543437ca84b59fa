//! Configuration source loading and composition
//!
//! Sources are layered: each one receives the configuration produced by the
//! lower-priority sources and returns it with its own values applied.

use crate::validation::Validate;
use crate::{ApplicationConfig, ConfigResult};
use std::path::{Path, PathBuf};

/// Trait for loading configuration from different sources
pub trait ConfigurationSource {
    /// Apply this source on top of `base`
    ///
    /// # Errors
    /// Returns configuration loading errors
    fn load(&self, base: ApplicationConfig) -> ConfigResult<ApplicationConfig>;

    /// Get the name of this configuration source
    fn name(&self) -> &str;

    /// Get the priority of this source (higher number = higher priority)
    fn priority(&self) -> u8;
}

/// Load configuration from `RUSTBOT_*` environment variables
pub struct EnvironmentSource;

impl ConfigurationSource for EnvironmentSource {
    fn load(&self, mut base: ApplicationConfig) -> ConfigResult<ApplicationConfig> {
        base.apply_env_overrides();
        Ok(base)
    }

    fn name(&self) -> &'static str {
        "environment"
    }

    fn priority(&self) -> u8 {
        100 // env vars override everything
    }
}

/// Load configuration from a TOML file
///
/// Sections and fields missing from the file keep the values of `base`.
pub struct TomlFileSource {
    path: PathBuf,
}

impl TomlFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigurationSource for TomlFileSource {
    fn load(&self, base: ApplicationConfig) -> ConfigResult<ApplicationConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No configuration file, keeping defaults");
            return Ok(base);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let file: toml::Table = toml::from_str(&content)?;

        // Overlay the file onto the serialized base so partial files only
        // replace what they mention
        let mut merged = toml::Table::try_from(&base)?;
        merge_tables(&mut merged, file);
        Ok(merged.try_into()?)
    }

    fn name(&self) -> &'static str {
        "toml_file"
    }

    fn priority(&self) -> u8 {
        50
    }
}

/// Type alias for configuration sources
type ConfigSources = Vec<Box<dyn ConfigurationSource>>;

/// Configuration loader that combines multiple sources
pub struct ConfigurationLoader {
    sources: ConfigSources,
}

impl ConfigurationLoader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_source(mut self, source: Box<dyn ConfigurationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Load configuration from all sources with priority ordering
    ///
    /// # Errors
    /// Returns configuration loading or validation errors
    pub fn load(&self) -> ConfigResult<ApplicationConfig> {
        let mut config = ApplicationConfig::default();

        // Lowest priority first, so higher priorities overwrite
        let mut sorted_sources = self.sources.iter().collect::<Vec<_>>();
        sorted_sources.sort_by_key(|source| source.priority());

        for source in sorted_sources {
            config = source.load(config)?;
            tracing::debug!("Loaded configuration from source: {}", source.name());
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                merge_tables(existing, nested);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
