//! Per-group test folders.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Error;
use crate::Result;

/// A `test-<uuid>` directory owned by one test group.
///
/// The folder is removed by [`TestFolder::remove`], or on drop if the group
/// never got that far.
#[derive(Debug)]
pub struct TestFolder {
    path: PathBuf,
    removed: bool,
}

impl TestFolder {
    /// Create a fresh folder directly under `base_dir`.
    pub fn create(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(format!("test-{}", Uuid::new_v4()));
        fs::create_dir(&path).map_err(|error| Error::Folder {
            path: path.clone(),
            error,
        })?;
        debug!("Test folder {}", path.display());
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the folder and everything the tests left in it.
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        fs::remove_dir_all(&self.path).map_err(|error| Error::Folder {
            path: self.path.clone(),
            error,
        })?;
        debug!("Removed test folder {}", self.path.display());
        Ok(())
    }
}

impl Drop for TestFolder {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.path) {
            warn!("Failed to remove test folder {}: {}", self.path.display(), e);
        }
    }
}
