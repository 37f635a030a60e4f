//! Per-notification scratch directory.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};
use tracing::{debug, warn};

use crate::filter::result_filename;

/// An exclusively owned scratch directory holding the staged source file
/// and its result.
///
/// The directory and everything in it is removed when the workspace is
/// released or dropped, whichever comes first.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    source_path: PathBuf,
    result_path: PathBuf,
}

impl Workspace {
    /// Create a workspace for a source object with the given base filename.
    ///
    /// The directory is created under `parent` when given, otherwise under
    /// the system temp directory.
    pub fn acquire(parent: Option<&Path>, basename: &str) -> io::Result<Self> {
        let mut builder = Builder::new();
        builder.prefix("fft-ws-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };

        let source_path = dir.path().join(basename);
        let result_path = dir.path().join(result_filename(basename));
        debug!(path = %dir.path().display(), "Acquired workspace");

        Ok(Self {
            dir,
            source_path,
            result_path,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the downloaded source object is staged.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Where the transform writes its result.
    pub fn result_path(&self) -> &Path {
        &self.result_path
    }

    /// Remove the workspace now, logging (not returning) removal failures.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(path = %path.display(), "Released workspace"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove workspace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_live_inside_workspace() {
        let parent = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire(Some(parent.path()), "scan.png").unwrap();

        assert!(workspace.path().starts_with(parent.path()));
        assert_eq!(workspace.source_path(), workspace.path().join("scan.png"));
        assert_eq!(workspace.result_path(), workspace.path().join("fft-scan.png"));
    }

    #[test]
    fn test_release_removes_contents() {
        let workspace = Workspace::acquire(None, "a.png").unwrap();
        std::fs::write(workspace.source_path(), b"src").unwrap();
        std::fs::write(workspace.result_path(), b"dst").unwrap();
        let path = workspace.path().to_path_buf();

        workspace.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let path = {
            let workspace = Workspace::acquire(None, "a.png").unwrap();
            std::fs::write(workspace.source_path(), b"src").unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_workspaces_are_distinct() {
        let first = Workspace::acquire(None, "a.png").unwrap();
        let second = Workspace::acquire(None, "a.png").unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_missing_parent_fails() {
        let parent = tempfile::tempdir().unwrap();
        let missing = parent.path().join("does-not-exist");
        assert!(Workspace::acquire(Some(&missing), "a.png").is_err());
    }
}
