//! Subcommands and the per-file pipeline they share.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use poscan_core::models::config::PoConfig;
use poscan_core::{tokenizer_for_path, DocumentOutcome, ExtractionResult, PurchaseOrderExtractor};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("poscan")
        .join("config.json")
}

/// Load the configuration from `path`, or from the default location when it
/// exists, or fall back to defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PoConfig> {
    let default_path = default_config_path();

    let config = match path {
        Some(path) => PoConfig::from_file(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config {}: {}", path.display(), e)
        })?,
        None if default_path.exists() => {
            debug!("Using config from {}", default_path.display());
            PoConfig::from_file(&default_path)?
        }
        None => PoConfig::default(),
    };

    config.validate()?;
    Ok(config)
}

/// File name used in reports and messages.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run one file through tokenizer selection and extraction.
///
/// Never fails: unsupported or unreadable files come back as failed
/// outcomes so one bad file does not stop a batch.
pub fn process_file(
    path: &Path,
    extractor: &PurchaseOrderExtractor,
    config: &PoConfig,
) -> DocumentOutcome {
    let result = match tokenizer_for_path(path, &config.pdf) {
        Ok(tokenizer) => extractor.extract_path(path, tokenizer.as_ref(), &config.source),
        Err(e) => ExtractionResult::failure(&e),
    };

    DocumentOutcome::new(display_name(path), result)
}
