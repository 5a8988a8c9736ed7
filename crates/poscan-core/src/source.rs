//! Reading source documents that may still be landing on disk.
//!
//! Uploaded files can show up a moment after the caller learns their path.
//! [`read_source`] polls for readability a bounded number of times before
//! giving up with [`PoError::SourceUnreadable`].

use std::fs::{self, File};
use std::path::Path;
use std::thread;

use tracing::{debug, trace};

use crate::error::{PoError, Result};
use crate::models::config::SourceConfig;

/// Poll `path` until it is a readable file.
///
/// Returns `false` once `config.max_attempts` checks have failed. At least
/// one check is always made.
pub fn wait_for_readable(path: &Path, config: &SourceConfig) -> bool {
    let attempts = config.max_attempts.max(1);

    for attempt in 1..=attempts {
        if path.is_file() {
            match File::open(path) {
                Ok(_) => return true,
                Err(e) => trace!("{} not readable yet: {}", path.display(), e),
            }
        }

        if attempt < attempts {
            thread::sleep(config.retry_delay());
        }
    }

    false
}

/// Read the bytes of `path`, waiting for it to become readable first.
pub fn read_source(path: &Path, config: &SourceConfig) -> Result<Vec<u8>> {
    if !wait_for_readable(path, config) {
        return Err(PoError::SourceUnreadable {
            path: path.to_path_buf(),
            attempts: config.max_attempts.max(1),
        });
    }

    let data = fs::read(path)?;
    debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> SourceConfig {
        SourceConfig {
            max_attempts: 3,
            retry_delay_ms: 1,
        }
    }

    #[test]
    fn test_existing_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("po.json");
        fs::write(&path, b"[]").unwrap();

        assert_eq!(read_source(&path, &quick()).unwrap(), b"[]");
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.pdf");

        let err = read_source(&path, &quick()).unwrap_err();
        assert!(matches!(err, PoError::SourceUnreadable { attempts: 3, .. }));
    }

    #[test]
    fn test_directory_is_not_readable_source() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!wait_for_readable(dir.path(), &quick()));
    }

    #[test]
    fn test_zero_attempts_still_checks_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("po.json");
        fs::write(&path, b"[]").unwrap();

        let config = SourceConfig {
            max_attempts: 0,
            retry_delay_ms: 1,
        };
        assert!(wait_for_readable(&path, &config));
    }
}
