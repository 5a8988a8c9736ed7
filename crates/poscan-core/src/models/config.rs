//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::PoError;

/// Main configuration for the poscan pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoConfig {
    /// Source file access configuration.
    pub source: SourceConfig,

    /// PDF tokenizer configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// How long to wait for an uploaded file to become readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Number of readability checks before giving up.
    pub max_attempts: u32,

    /// Delay between checks in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_delay_ms: 100,
        }
    }
}

impl SourceConfig {
    /// Delay between readability checks.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// PDF-to-rows tokenizer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum run of spaces that separates two cells on a text line.
    pub min_column_gap: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_column_gap: 2 }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Rows scanned by the multi-line resolver, starting at the label row.
    pub multiline_window: usize,

    /// Rows after `BRAND DESC:` considered by the last brand fallback.
    pub brand_lookahead: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            multiline_window: 3,
            brand_lookahead: 2,
        }
    }
}

impl PoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PoError> {
        if self.source.max_attempts == 0 {
            return Err(PoError::Config("source.max_attempts must be at least 1".to_string()));
        }
        if self.pdf.min_column_gap == 0 {
            return Err(PoError::Config("pdf.min_column_gap must be at least 1".to_string()));
        }
        if self.extraction.multiline_window == 0 {
            return Err(PoError::Config(
                "extraction.multiline_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: PoConfig =
            serde_json::from_str(r#"{ "source": { "max_attempts": 3 } }"#).unwrap();
        assert_eq!(config.source.max_attempts, 3);
        assert_eq!(config.source.retry_delay_ms, 100);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PoConfig::default();
        config.pdf.min_column_gap = 3;
        config.save(&path).unwrap();

        assert_eq!(PoConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_validate() {
        assert!(PoConfig::default().validate().is_ok());

        let mut config = PoConfig::default();
        config.pdf.min_column_gap = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_column_gap"));
    }
}
