//! Calibration resource resolution.
//!
//! Identifiers are tried as given first, then relative to each directory listed
//! in `MUREWEIGHT_RESOURCES` (a platform path list, also read from `.env`).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::StageError;

pub const RESOURCES_ENV: &str = "MUREWEIGHT_RESOURCES";

/// Resolves resource identifiers to readable files.
#[derive(Debug, Clone, Default)]
pub struct ResourceLocator {
    search_dirs: Vec<PathBuf>,
}

impl ResourceLocator {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Build a locator from `MUREWEIGHT_RESOURCES`, loading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let dirs = std::env::var_os(RESOURCES_ENV)
            .map(|v| parse_search_path(&v))
            .unwrap_or_default();
        Self::new(dirs)
    }

    /// Find the file behind `identifier`.
    pub fn resolve(&self, identifier: &str) -> Result<PathBuf, StageError> {
        let direct = Path::new(identifier);
        if direct.is_file() {
            debug!("resource '{identifier}' resolved as given");
            return Ok(direct.to_path_buf());
        }

        if direct.is_relative() {
            for dir in &self.search_dirs {
                let candidate = dir.join(direct);
                if candidate.is_file() {
                    debug!("resource '{identifier}' resolved to {}", candidate.display());
                    return Ok(candidate);
                }
            }
        }

        Err(StageError::resource(format!(
            "Could not find resource '{identifier}' (searched {} director{} from `{RESOURCES_ENV}`).",
            self.search_dirs.len(),
            if self.search_dirs.len() == 1 { "y" } else { "ies" }
        )))
    }
}

fn parse_search_path(value: &OsString) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mureweight_resource_{name}_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn resolves_relative_to_search_dirs() {
        let dir = scratch_dir("search");
        fs::write(dir.join("muon_coszen_unc.txt"), "0.5 1.0\n").unwrap();

        let locator = ResourceLocator::new(vec![PathBuf::from("/nonexistent"), dir.clone()]);
        let path = locator.resolve("muon_coszen_unc.txt").unwrap();
        assert_eq!(path, dir.join("muon_coszen_unc.txt"));
    }

    #[test]
    fn missing_resource_is_resource_error() {
        let locator = ResourceLocator::new(Vec::new());
        let err = locator.resolve("no_such_coszen_file.txt").unwrap_err();
        assert!(matches!(err, StageError::Resource(_)));
    }
}
