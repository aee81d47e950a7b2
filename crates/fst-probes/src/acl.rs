//! NFSv4 ACL support through the `nfs4_getfacl` / `nfs4_setfacl` tools.
//!
//! ACEs use the textual form understood by the tools:
//! `type:flags:principal:permissions`, e.g. `D::OWNER@:R`.

use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::str::FromStr;

use tracing::debug;

use crate::error::ProbeError;
use crate::Result;

const GETFACL: &str = "nfs4_getfacl";
const SETFACL: &str = "nfs4_setfacl";

// Single-letter permissions plus the R/W/X shorthands accepted by nfs4_setfacl.
const PERMISSION_CHARS: &str = "rwaxtTnNcCoydDRWX";
const FLAG_CHARS: &str = "fdnigSFOIA";

/// ACE type
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AceType {
    Allow,
    Deny,
    Audit,
    Alarm,
}

impl AceType {
    fn letter(self) -> char {
        match self {
            AceType::Allow => 'A',
            AceType::Deny => 'D',
            AceType::Audit => 'U',
            AceType::Alarm => 'L',
        }
    }

    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" => Some(AceType::Allow),
            "D" => Some(AceType::Deny),
            "U" => Some(AceType::Audit),
            "L" => Some(AceType::Alarm),
            _ => None,
        }
    }
}

/// A single NFSv4 access control entry
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Nfs4Ace {
    pub ace_type: AceType,
    pub flags: String,
    pub principal: String,
    pub permissions: String,
}

impl Nfs4Ace {
    pub fn new(ace_type: AceType, principal: &str, permissions: &str) -> Self {
        Self {
            ace_type,
            flags: String::new(),
            principal: principal.to_string(),
            permissions: permissions.to_string(),
        }
    }

    /// Deny `permissions` to the file owner (`OWNER@`).
    pub fn deny_owner(permissions: &str) -> Self {
        Self::new(AceType::Deny, "OWNER@", permissions)
    }

    /// Whether this entry names permission `p` (case-sensitive, as the tools are).
    pub fn grants_or_denies(&self, p: char) -> bool {
        self.permissions.contains(p)
    }
}

impl fmt::Display for Nfs4Ace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.ace_type.letter(),
            self.flags,
            self.principal,
            self.permissions
        )
    }
}

impl FromStr for Nfs4Ace {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = |reason: &str| ProbeError::InvalidAce {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = text.splitn(4, ':').collect();
        let [kind, flags, principal, permissions] = parts[..] else {
            return Err(invalid("expected type:flags:principal:permissions"));
        };

        let ace_type = AceType::from_letter(kind).ok_or_else(|| invalid("unknown ACE type"))?;
        if !flags.chars().all(|c| FLAG_CHARS.contains(c)) {
            return Err(invalid("unknown flag"));
        }
        if principal.is_empty() {
            return Err(invalid("empty principal"));
        }
        if permissions.is_empty() || !permissions.chars().all(|c| PERMISSION_CHARS.contains(c)) {
            return Err(invalid("unknown permission"));
        }

        Ok(Self {
            ace_type,
            flags: flags.to_string(),
            principal: principal.to_string(),
            permissions: permissions.to_string(),
        })
    }
}

/// Parse `nfs4_getfacl` output, skipping comment and blank lines.
pub fn parse_acl(text: &str) -> Result<Vec<Nfs4Ace>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Nfs4Ace::from_str)
        .collect()
}

/// Wrapper around the external NFSv4 ACL tools
#[derive(Clone, Debug)]
pub struct Nfs4AclTool {
    getfacl: PathBuf,
    setfacl: PathBuf,
}

impl Default for Nfs4AclTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Nfs4AclTool {
    /// Use `nfs4_getfacl` and `nfs4_setfacl` from `PATH`.
    pub fn new() -> Self {
        Self::with_commands(GETFACL, SETFACL)
    }

    /// Use custom programs in place of the standard tools.
    pub fn with_commands(getfacl: impl Into<PathBuf>, setfacl: impl Into<PathBuf>) -> Self {
        Self {
            getfacl: getfacl.into(),
            setfacl: setfacl.into(),
        }
    }

    /// Whether both tools can be found.
    pub fn is_available(&self) -> bool {
        is_executable(&self.getfacl) && is_executable(&self.setfacl)
    }

    /// Raw `nfs4_getfacl` output for `path`.
    pub fn get_raw(&self, path: &Path) -> Result<String> {
        let output = run_tool(Command::new(&self.getfacl).arg(path), &self.getfacl)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Parsed ACL of `path`.
    pub fn get(&self, path: &Path) -> Result<Vec<Nfs4Ace>> {
        parse_acl(&self.get_raw(path)?)
    }

    /// Add `ace` to the ACL of `path` (`nfs4_setfacl -a`).
    pub fn add(&self, path: &Path, ace: &Nfs4Ace) -> Result<()> {
        let ace_text = ace.to_string();
        run_tool(
            Command::new(&self.setfacl).arg("-a").arg(&ace_text).arg(path),
            &self.setfacl,
        )?;
        debug!("Added ACE {} to {}", ace_text, path.display());
        Ok(())
    }
}

fn run_tool(command: &mut Command, tool: &Path) -> Result<Output> {
    debug!("Running {:?}", command);
    let output = command.output().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ProbeError::ToolMissing {
            tool: tool.display().to_string(),
        },
        _ => ProbeError::io(tool, e),
    })?;

    if !output.status.success() {
        return Err(ProbeError::ToolFailed {
            tool: tool.display().to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

fn is_executable(program: &Path) -> bool {
    if program.components().count() > 1 {
        return program.is_file();
    }
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
