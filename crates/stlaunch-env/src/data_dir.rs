//! Data directory provisioning.

use std::path::Path;

use crate::error::BootstrapError;

/// Create `path` if absent. Returns `true` when it was created.
pub fn ensure_data_dir(path: &Path) -> Result<bool, BootstrapError> {
    if path.is_dir() {
        return Ok(false);
    }
    if path.exists() {
        return Err(BootstrapError::DataDirectory {
            path: path.to_path_buf(),
            detail: "path exists and is not a directory".to_string(),
        });
    }
    std::fs::create_dir_all(path).map_err(|e| BootstrapError::DataDirectory {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_then_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("data");
        assert!(ensure_data_dir(&data).unwrap());
        assert!(data.is_dir());
        std::fs::write(data.join("extrato.csv"), "a,b\n").unwrap();
        assert!(!ensure_data_dir(&data).unwrap());
        assert!(data.join("extrato.csv").exists());
    }

    #[test]
    fn test_file_in_the_way() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("data");
        std::fs::write(&data, "").unwrap();
        let err = ensure_data_dir(&data).unwrap_err();
        assert!(matches!(err, BootstrapError::DataDirectory { .. }));
    }
}
