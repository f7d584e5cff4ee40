// Per-document scratch directory
use log::{debug, warn};
use std::io;
use std::path::Path;
use tempfile::{Builder, TempDir};

use crate::config::WORKSPACE_PREFIX;

/// Uniquely named directory owned by one document run. Everything the
/// extraction tools write lives here and is removed with it.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create(root: &Path) -> io::Result<Self> {
        let dir = Builder::new().prefix(WORKSPACE_PREFIX).tempdir_in(root)?;
        debug!("created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory tree. Failures are logged, never returned.
    /// Dropping a workspace without calling this still removes it.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("removed workspace {}", path.display()),
            Err(e) => warn!("could not remove workspace {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_close_removes_tree() {
        let root = TempDir::new().unwrap();
        let workspace = Workspace::create(root.path()).unwrap();
        let path = workspace.path().to_path_buf();

        assert!(path.file_name().unwrap().to_string_lossy().starts_with(WORKSPACE_PREFIX));
        fs::create_dir(path.join("images-1")).unwrap();
        fs::write(path.join("images-1").join("output-1_1.png"), b"png").unwrap();
        fs::write(path.join("split_1.pdf"), b"%PDF").unwrap();

        workspace.close();
        assert!(!path.exists());
    }

    #[test]
    fn test_workspaces_are_distinct() {
        let root = TempDir::new().unwrap();
        let a = Workspace::create(root.path()).unwrap();
        let b = Workspace::create(root.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_drop_removes_tree() {
        let root = TempDir::new().unwrap();
        let path = {
            let workspace = Workspace::create(root.path()).unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_root_fails() {
        let root = TempDir::new().unwrap();
        assert!(Workspace::create(&root.path().join("absent")).is_err());
    }
}
