//! Source enumeration from the git index.
//!
//! Only tracked files with a supported extension are scanned. Paths stay
//! relative to the scan root, which is how they appear in findings.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Result, ScanError};
use crate::parser::SupportedLanguage;

/// A tracked file selected for scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the scan root.
    pub path: PathBuf,
    pub language: SupportedLanguage,
}

/// List tracked source files under `root`, in index order.
pub fn tracked_files(root: &Path) -> Result<Vec<SourceFile>> {
    ensure_toplevel(root)?;

    let mut args = vec!["ls-files", "-z", "--"];
    args.extend(SupportedLanguage::ALL.iter().map(|l| l.pathspec()));
    let stdout = run_git(root, &args)?;

    let files: Vec<SourceFile> = String::from_utf8_lossy(&stdout)
        .split('\0')
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let path = PathBuf::from(entry);
            let language = SupportedLanguage::from_path(&path)?;
            Some(SourceFile { path, language })
        })
        .collect();

    debug!(root = %root.display(), count = files.len(), "tracked source files");
    Ok(files)
}

/// Require `root` to be the top of a git work tree, not a directory inside one.
fn ensure_toplevel(root: &Path) -> Result<()> {
    let stdout = run_git(root, &["rev-parse", "--show-toplevel"])?;
    let toplevel = PathBuf::from(String::from_utf8_lossy(&stdout).trim());

    let same = match (fs::canonicalize(&toplevel), fs::canonicalize(root)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if !same {
        return Err(ScanError::RepositoryAccess {
            root: root.to_path_buf(),
            reason: format!("not the work tree root ({})", toplevel.display()),
        });
    }
    Ok(())
}

/// Run git in `root` and return its stdout; failures name the root.
fn run_git(root: &Path, args: &[&str]) -> Result<Vec<u8>> {
    let repository_error = |reason: String| ScanError::RepositoryAccess {
        root: root.to_path_buf(),
        reason,
    };

    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .map_err(|e| repository_error(format!("failed to run git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(repository_error(stderr.trim().to_string()));
    }
    Ok(output.stdout)
}

/// Read `relative` under `root` as UTF-8.
///
/// Errors name the relative path, matching the findings.
pub fn read_source(root: &Path, relative: &Path) -> Result<String> {
    let bytes = fs::read(root.join(relative)).map_err(|source| ScanError::FileRead {
        path: relative.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| ScanError::Decode {
        path: relative.to_path_buf(),
    })
}
