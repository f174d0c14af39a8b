// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// The watcher only needs to check that the target directory exists, stat a
/// freshly detected marker file and delete it afterwards.
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Confirm a file is still present. Errors if it is gone or unreadable.
    fn stat(&self, path: &Path) -> Result<u64>;

    fn remove_file(&self, path: &Path) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn stat(&self, path: &Path) -> Result<u64> {
        let meta = fs::metadata(path).with_context(|| format!("stat {:?}", path))?;
        Ok(meta.len())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("removing file {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_fs_stat_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.tga");
        std::fs::write(&path, b"tga").unwrap();

        let fs = RealFileSystem;
        assert!(fs.is_dir(dir.path()));
        assert_eq!(fs.stat(&path).unwrap(), 3);

        fs.remove_file(&path).unwrap();
        assert!(!fs.exists(&path));
        assert!(fs.stat(&path).is_err());
        assert!(fs.remove_file(&path).is_err());
    }
}
