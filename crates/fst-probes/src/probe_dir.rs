//! Probe operations scoped to a single directory.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use nix::errno::Errno;
use nix::unistd::{access, AccessFlags};
use tracing::debug;

use crate::error::ProbeError;
use crate::Result;

const EXEC_BUSY_RETRIES: u32 = 5;

/// Access modes checked with `access(2)`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    Read,
    Write,
    Execute,
}

impl Access {
    fn flags(self) -> AccessFlags {
        match self {
            Access::Read => AccessFlags::R_OK,
            Access::Write => AccessFlags::W_OK,
            Access::Execute => AccessFlags::X_OK,
        }
    }
}

/// Filesystem probes rooted at a directory. Names are relative to the root.
#[derive(Clone, Debug)]
pub struct ProbeDir {
    root: PathBuf,
}

impl ProbeDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute path of `name` inside the root.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Create an empty file, failing if it already exists.
    pub fn create_new(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| ProbeError::io(&path, e))?;
        debug!("File created: {}", path.display());
        Ok(())
    }

    /// Open `name` for writing (create + truncate) and write `content`.
    pub fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.path(name);
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| ProbeError::io(&path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| ProbeError::io(&path, e))?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    pub fn read_to_string(&self, name: &str) -> Result<String> {
        let path = self.path(name);
        let mut file = fs::File::open(&path).map_err(|e| ProbeError::io(&path, e))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| ProbeError::io(&path, e))?;
        debug!("Read string: {}", content);
        Ok(content)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        fs::remove_file(&path).map_err(|e| ProbeError::io(&path, e))?;
        debug!("File removed: {}", path.display());
        Ok(())
    }

    pub fn rename(&self, from: &str, to: &str) -> Result<()> {
        let source = self.path(from);
        let target = self.path(to);
        fs::rename(&source, &target).map_err(|e| ProbeError::io(&source, e))?;
        debug!("Renamed {} -> {}", source.display(), target.display());
        Ok(())
    }

    /// Whether `name` exists and is a regular file.
    pub fn is_file(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Names of all entries in the root.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| ProbeError::io(&self.root, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ProbeError::io(&self.root, e))?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }

    /// Replace the permission bits of `name` with `mode`.
    pub fn set_mode(&self, name: &str, mode: u32) -> Result<()> {
        let path = self.path(name);
        fs::set_permissions(&path, fs::Permissions::from_mode(mode))
            .map_err(|e| ProbeError::io(&path, e))?;
        debug!("Mode of {} set to {:o}", path.display(), mode);
        Ok(())
    }

    /// Capability check through `access(2)` for the real uid.
    pub fn can_access(&self, name: &str, mode: Access) -> bool {
        let path = self.path(name);
        let allowed = access(path.as_path(), mode.flags()).is_ok();
        debug!("{:?} access to {}: {}", mode, path.display(), allowed);
        allowed
    }

    /// Start `name` as a program and wait for it.
    pub fn spawn(&self, name: &str) -> Result<ExitStatus> {
        let path = self.path(name);
        let mut child = retry_busy(|| {
            Command::new(&path)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
        })
        .map_err(|e| ProbeError::io(&path, e))?;
        let status = child.wait().map_err(|e| ProbeError::io(&path, e))?;
        debug!("{} exited with {}", path.display(), status);
        Ok(status)
    }

    /// Run `name` and return its stdout with surrounding whitespace trimmed.
    pub fn run(&self, name: &str) -> Result<String> {
        let path = self.path(name);
        let output = retry_busy(|| Command::new(&path).stdin(Stdio::null()).output())
            .map_err(|e| ProbeError::io(&path, e))?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Output string: {}", stdout);
        Ok(stdout)
    }
}

// ETXTBSY: a concurrent fork elsewhere in the process may still hold the
// write handle of a freshly written script.
fn retry_busy<T>(mut f: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let mut attempt = 0;
    loop {
        match f() {
            Err(e)
                if e.raw_os_error() == Some(Errno::ETXTBSY as i32)
                    && attempt < EXEC_BUSY_RETRIES =>
            {
                attempt += 1;
                thread::sleep(Duration::from_millis(20 * u64::from(attempt)));
            }
            result => return result,
        }
    }
}
