//! Request-scoped scratch workspaces.
//!
//! A [`Workspace`] is a uniquely named directory under the manager's root that
//! belongs to exactly one in-flight request. Everything written inside it is
//! removed when the workspace is released or dropped, so every exit path of a
//! request (success, `?` early return, panic unwinding, a dropped future)
//! cleans up after itself.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WORKSPACE_PREFIX: &str = "audex-";

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace under {root}: {source}")]
    Create {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove workspace {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Hands out fresh workspaces under a fixed scratch root.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a new, uniquely named workspace directory.
    ///
    /// Failures (missing root, permission denied, disk full) are returned to the
    /// caller as-is; nothing is retried.
    pub fn acquire(&self) -> Result<Workspace, WorkspaceError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&self.root)
            .map_err(|source| WorkspaceError::Create {
                root: self.root.clone(),
                source,
            })?;

        let path = dir.path().to_path_buf();
        tracing::debug!(workspace = %path.display(), "Workspace acquired");

        Ok(Workspace {
            dir: Some(dir),
            path,
        })
    }
}

/// Exclusive scratch directory for one request.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file directly inside the workspace. `name` must be a single
    /// path component.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Create (if needed) a subdirectory of the workspace and return its path.
    pub async fn subdir(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        let path = self.path.join(name);
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| WorkspaceError::CreateDir {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Remove the workspace and everything in it, reporting removal errors.
    /// Dropping a workspace does the same but can only log failures.
    pub fn release(mut self) -> Result<(), WorkspaceError> {
        match self.dir.take() {
            Some(dir) => {
                dir.close().map_err(|source| WorkspaceError::Remove {
                    path: self.path.clone(),
                    source,
                })?;
                tracing::debug!(workspace = %self.path.display(), "Workspace released");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => {
                    tracing::debug!(workspace = %self.path.display(), "Workspace released")
                }
                Err(e) => tracing::warn!(
                    workspace = %self.path.display(),
                    error = %e,
                    "Failed to remove workspace"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(root: &Path) -> usize {
        std::fs::read_dir(root).unwrap().count()
    }

    #[test]
    fn test_acquire_creates_directory_under_root() {
        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path());

        let workspace = manager.acquire().unwrap();
        assert!(workspace.path().is_dir());
        assert_eq!(workspace.path().parent(), Some(root.path()));
        assert!(workspace
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(WORKSPACE_PREFIX)));
    }

    #[test]
    fn test_workspaces_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path());

        let a = manager.acquire().unwrap();
        let b = manager.acquire().unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_drop_removes_all_contents() {
        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path());

        let workspace = manager.acquire().unwrap();
        std::fs::write(workspace.file_path("clip.mov"), b"video").unwrap();
        std::fs::create_dir(workspace.path().join("output")).unwrap();
        std::fs::write(workspace.path().join("output/clip.mp3"), b"audio").unwrap();
        let path = workspace.path().to_path_buf();

        drop(workspace);
        assert!(!path.exists());
        assert_eq!(entries(root.path()), 0);
    }

    #[test]
    fn test_release_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path());

        let workspace = manager.acquire().unwrap();
        std::fs::write(workspace.file_path("a.bin"), b"x").unwrap();
        let path = workspace.path().to_path_buf();

        workspace.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_early_return_releases_workspace() {
        fn failing_step(manager: &WorkspaceManager) -> Result<(), std::io::Error> {
            let workspace = manager.acquire().map_err(std::io::Error::other)?;
            std::fs::write(workspace.file_path("input.mp4"), b"data")?;
            Err(std::io::Error::other("decode failed"))
        }

        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path());

        assert!(failing_step(&manager).is_err());
        assert_eq!(entries(root.path()), 0);
    }

    #[test]
    fn test_panic_releases_workspace() {
        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path());

        let result = std::panic::catch_unwind(|| {
            let workspace = manager.acquire().unwrap();
            std::fs::write(workspace.file_path("input.mp4"), b"data").unwrap();
            panic!("unrelated failure");
        });

        assert!(result.is_err());
        assert_eq!(entries(root.path()), 0);
    }

    #[test]
    fn test_acquire_fails_when_root_missing() {
        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path().join("does-not-exist"));

        let err = manager.acquire().unwrap_err();
        assert!(matches!(err, WorkspaceError::Create { .. }));
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[tokio::test]
    async fn test_subdir_is_created_inside_workspace() {
        let root = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(root.path());
        let workspace = manager.acquire().unwrap();

        let output = workspace.subdir("output").await.unwrap();
        assert!(output.is_dir());
        assert!(output.starts_with(workspace.path()));
    }
}
