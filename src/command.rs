//! Interpretation of embedded `lftp` command strings.
//!
//! The command is free-form shell text. Only token positions are used:
//! no shell parsing, no flag handling.

use std::path::Path;

use crate::types::{TransferPayload, UNKNOWN};

/// Parse an `lftp` command line into transfer parameters.
///
/// Total: every input yields a payload, with `unknown` for whatever
/// could not be found.
///
/// ```
/// let t = depscan::parse_command("lftp -c 'put /srv/out.csv ftp://backup.example.com/in'");
/// assert_eq!(t.filename, "/srv/out.csv");
/// assert_eq!(t.source, "/srv");
/// assert_eq!(t.destination, "ftp://backup.example.com/in");
/// ```
pub fn parse_command(cmd: &str) -> TransferPayload {
    let tokens: Vec<&str> = cmd
        .split_whitespace()
        .map(|t| t.trim_matches(|c| c == '\'' || c == '"'))
        .collect();

    if tokens.is_empty() {
        return TransferPayload::unknown();
    }

    let filename = tokens
        .iter()
        .position(|t| *t == "put")
        .and_then(|i| tokens.get(i + 1))
        .filter(|t| !t.is_empty())
        .map_or_else(|| UNKNOWN.to_string(), |t| t.to_string());

    // Index 0 is the program itself, and "lftp" contains "ftp".
    let destination = tokens
        .iter()
        .skip(1)
        .find(|t| is_ftp_token(t))
        .map_or_else(|| UNKNOWN.to_string(), |t| t.to_string());

    TransferPayload {
        source: source_dir(&filename),
        filename,
        destination,
    }
}

fn is_ftp_token(token: &str) -> bool {
    token.starts_with("ftp://") || token.to_ascii_lowercase().contains("ftp")
}

/// Directory component of `filename`, or `local` when it has none.
fn source_dir(filename: &str) -> String {
    if filename == UNKNOWN {
        return "local".to_string();
    }
    Path::new(filename)
        .parent()
        .map(|p| p.to_string_lossy())
        .filter(|p| !p.is_empty())
        .map_or_else(|| "local".to_string(), |p| p.into_owned())
}
