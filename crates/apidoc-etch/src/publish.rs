//! Output publishing
//!
//! A run writes into a staging directory next to the target. Only a run that
//! got through both audience passes replaces the target; a failed run leaves
//! the previous output untouched.

use crate::diagnostics::{DocError, DocResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Staging directory of a target output directory
#[derive(Debug)]
pub struct StagingDir {
    target: PathBuf,
    staging: PathBuf,
    published: bool,
}

impl StagingDir {
    /// Create a fresh, empty staging directory beside `target`
    pub fn create(target: &Path) -> DocResult<Self> {
        let name = target
            .file_name()
            .ok_or_else(|| DocError::config(format!("Invalid output directory: {}", target.display())))?;
        let mut staging_name = name.to_os_string();
        staging_name.push(format!(".staging-{}", std::process::id()));
        let staging = target.with_file_name(staging_name);

        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;
        tracing::debug!(staging = %staging.display(), "created staging directory");

        Ok(Self {
            target: target.to_path_buf(),
            staging,
            published: false,
        })
    }

    /// Directory the run writes into
    pub fn path(&self) -> &Path {
        &self.staging
    }

    /// Replace the target with the staged tree
    pub fn publish(mut self) -> DocResult<PathBuf> {
        if self.target.exists() {
            fs::remove_dir_all(&self.target)?;
        }
        fs::rename(&self.staging, &self.target)?;
        self.published = true;
        tracing::info!(output = %self.target.display(), "published documentation");
        Ok(self.target.clone())
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.published {
            let _ = fs::remove_dir_all(&self.staging);
        }
    }
}

/// Empty the target directory for a direct (non-staged) run
pub fn prepare_direct(target: &Path) -> DocResult<()> {
    if target.exists() {
        fs::remove_dir_all(target)?;
    }
    fs::create_dir_all(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("docs");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.md"), "old").unwrap();

        let staging = StagingDir::create(&target).unwrap();
        fs::write(staging.path().join("index.md"), "new").unwrap();
        let staging_path = staging.path().to_path_buf();
        staging.publish().unwrap();

        assert!(!staging_path.exists());
        assert!(!target.join("stale.md").exists());
        assert_eq!(fs::read_to_string(target.join("index.md")).unwrap(), "new");
    }

    #[test]
    fn test_dropped_staging_keeps_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("docs");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("index.md"), "old").unwrap();

        let staging_path = {
            let staging = StagingDir::create(&target).unwrap();
            fs::write(staging.path().join("index.md"), "partial").unwrap();
            staging.path().to_path_buf()
        };

        assert!(!staging_path.exists());
        assert_eq!(fs::read_to_string(target.join("index.md")).unwrap(), "old");
    }

    #[test]
    fn test_prepare_direct() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        prepare_direct(&target).unwrap();
        fs::write(target.join("a.md"), "a").unwrap();
        prepare_direct(&target).unwrap();
        assert!(target.exists());
        assert!(!target.join("a.md").exists());
    }
}
