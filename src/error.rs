//! Error types for depscan.
//!
//! Every variant is recoverable from the scanner's point of view: errors are
//! recorded in the run statistics and the scan moves on to the next file.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while enumerating, reading or analyzing source files.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root is not a git work tree, or the index could not be listed.
    #[error("Invalid Git repository: {}: {reason}", root.display())]
    RepositoryAccess { root: PathBuf, reason: String },

    /// A tracked file could not be opened.
    #[error("Error in {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tracked file is not valid UTF-8.
    #[error("Error in {}: file is not valid UTF-8", path.display())]
    Decode { path: PathBuf },

    /// The structured parser rejected the file.
    #[error("Error in {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// The compiled grammar is incompatible with the linked tree-sitter runtime.
    #[error("Error in {}: grammar unavailable: {source}", path.display())]
    Grammar {
        path: PathBuf,
        #[source]
        source: tree_sitter::LanguageError,
    },

    /// No analyzer is registered for the file's language.
    #[error("Error in {}: no analyzer for {language}", path.display())]
    UnsupportedLanguage { path: PathBuf, language: String },
}

/// Result type alias for depscan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = ScanError::Parse {
            path: PathBuf::from("src/app.py"),
            reason: "syntax error at line 3".to_string(),
        };
        assert_eq!(err.to_string(), "Error in src/app.py: syntax error at line 3");

        let err = ScanError::RepositoryAccess {
            root: PathBuf::from("/tmp/nowhere"),
            reason: "not a git repository".to_string(),
        };
        assert!(err.to_string().starts_with("Invalid Git repository: /tmp/nowhere"));
    }
}
