//! # File I/O Module
//!
//! Loads catalogs and configuration, and writes exported artifacts:
//! - **Atomic saves**: write to a sibling temp file, sync, rename
//! - **Catalog files**: JSON arrays of product-sheet rows ([`PatternRecord`])
//! - **Config files**: JSON [`PreviewConfig`]; a missing file means defaults
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wall_core::file_io::{load_catalog, load_config, write_atomic};
//!
//! let config = load_config(Path::new("wallcast.json"))?;
//! let catalog = load_catalog(Path::new("patterns.json"), &config.defaults)?;
//! write_atomic(Path::new("preview.png"), b"...")?;
//! # Ok::<(), wall_core::errors::PreviewError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{CatalogDefaults, PreviewConfig};
use crate::errors::{PreviewError, PreviewResult};
use crate::pattern::{PatternCatalog, PatternRecord};

/// Write `bytes` to `path` so readers never observe a partial file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> PreviewResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        PreviewError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        PreviewError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        PreviewError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        PreviewError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "File written");
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn read_to_string(path: &Path) -> PreviewResult<String> {
    fs::read_to_string(path).map_err(|e| PreviewError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Read raw bytes, e.g. a pattern image.
pub fn read_bytes(path: &Path) -> PreviewResult<Vec<u8>> {
    fs::read(path).map_err(|e| PreviewError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Load a catalog from a JSON array of product-sheet rows. Rows that
/// cannot be normalized are skipped with a warning.
pub fn load_catalog(path: &Path, defaults: &CatalogDefaults) -> PreviewResult<PatternCatalog> {
    let contents = read_to_string(path)?;
    let records: Vec<PatternRecord> =
        serde_json::from_str(&contents).map_err(|e| PreviewError::SerializationError {
            reason: format!("Invalid catalog JSON in {}: {}", path.display(), e),
        })?;
    Ok(PatternCatalog::from_records(&records, defaults))
}

/// Load configuration. A missing file yields the defaults.
pub fn load_config(path: &Path) -> PreviewResult<PreviewConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No config file, using defaults");
        return Ok(PreviewConfig::default());
    }
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| PreviewError::SerializationError {
        reason: format!("Invalid config JSON in {}: {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_leaves_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preview.png");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!dir.path().join("preview.png.tmp").exists());
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.pdf");
        let err = write_atomic(&path, b"x").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, PreviewConfig::default());
    }

    #[test]
    fn test_partial_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallcast.json");
        fs::write(&path, r#"{"business": {"name": "Paper House"}}"#).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.business.name, "Paper House");
        assert_eq!(config.limits.max_panel_height_ft, 27.0);
    }

    #[test]
    fn test_invalid_config_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let err = load_config(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patterns.json");
        fs::write(
            &path,
            r#"[
                {"pattern_name": "Trellis", "sku": "TR-100", "repeat_width_inches": 27, "repeat_height_inches": 27,
                 "pattern_match": "half drop", "sale_type": "panel", "repeat_url": "trellis.jpg"},
                {"pattern_name": "", "sku": ""}
            ]"#,
        )
        .unwrap();
        let catalog = load_catalog(&path, &CatalogDefaults::default()).unwrap();
        assert_eq!(catalog.len(), 1);
        let trellis = catalog.get("tr-100").unwrap();
        assert!(trellis.is_half_drop());
        assert_eq!(trellis.repeats_per_panel(), 2.0);
    }
}
