use std::path::Path;

use covidlens_parser::LoadOptions;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::schema::DEFAULT_CORRELATION_COLUMNS;

pub const DEFAULT_COUNTRIES: [&str; 3] = ["Austria", "India", "Angola"];
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Entity names or ISO codes to keep.
    pub countries: Vec<String>,
    pub top_n: usize,
    pub correlation_columns: Vec<String>,
    pub delimiter: char,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            top_n: DEFAULT_TOP_N,
            correlation_columns: DEFAULT_CORRELATION_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            delimiter: ',',
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig =
            toml::from_str(content).map_err(|err| PipelineError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.countries.iter().all(|c| c.trim().is_empty()) {
            return Err(PipelineError::Config(
                "at least one country must be listed".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(PipelineError::Config("top_n must be positive".to_string()));
        }
        if self.correlation_columns.len() < 2 {
            return Err(PipelineError::Config(
                "correlation_columns needs at least two columns".to_string(),
            ));
        }
        if !self.delimiter.is_ascii() {
            return Err(PipelineError::Config(format!(
                "delimiter '{}' must be a single ASCII character",
                self.delimiter
            )));
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_country_list() {
        let config = PipelineConfig::default();
        assert_eq!(config.countries, vec!["Austria", "India", "Angola"]);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.load_options().delimiter, b',');
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = PipelineConfig::from_toml_str("countries = [\"FRA\", \"Germany\"]\n")
            .expect("config parses");
        assert_eq!(config.countries, vec!["FRA", "Germany"]);
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert_eq!(config.correlation_columns.len(), 4);
    }

    #[test]
    fn rejects_empty_country_list() {
        let err = PipelineConfig::from_toml_str("countries = []\n").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = PipelineConfig::from_toml_str("countrys = [\"India\"]\n").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn semicolon_delimiter() {
        let config = PipelineConfig::from_toml_str("delimiter = \";\"\n").expect("config parses");
        assert_eq!(config.load_options().delimiter, b';');
    }
}
