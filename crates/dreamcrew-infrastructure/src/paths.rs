//! Centralized path management for local persistence.

use dreamcrew_core::error::{DreamCrewError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "dreamcrew";
const PROJECTS_FILE: &str = "projects.json";

/// Resolves the on-disk locations the application reads and writes.
///
/// A base-directory override redirects everything under one root, which is
/// how tests isolate themselves from the real user profile.
#[derive(Debug, Clone, Default)]
pub struct DreamCrewPaths {
    base_dir: Option<PathBuf>,
}

impl DreamCrewPaths {
    /// Creates a path resolver, optionally rooted at `base_dir`.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Directory holding application data files.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no platform data directory can be
    /// determined and no override is set.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| DreamCrewError::config("Could not determine platform data directory"))
    }

    /// The single file holding the whole project collection.
    pub fn projects_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(PROJECTS_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_redirects_the_projects_file() {
        let paths = DreamCrewPaths::new(Some(PathBuf::from("/tmp/dreamcrew-test")));
        let file = paths.projects_file().unwrap();
        assert_eq!(file, PathBuf::from("/tmp/dreamcrew-test/projects.json"));
    }
}
