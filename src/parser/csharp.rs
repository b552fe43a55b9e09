//! C# detection by lexical pattern search.
//!
//! There is no C# grammar in the build, so this analyzer runs two regex
//! scans over the raw text. It can miss calls split across unusual
//! formatting and can match look-alike text (a string merely mentioning
//! `lftp` inside `Process.Start(...)`).

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{Analyzer, SupportedLanguage};
use crate::command::parse_command;
use crate::error::Result;
use crate::types::{Finding, HttpMethod};

/// `Process.Start(...)` whose argument list mentions lftp.
static SPAWN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Process\.Start\([^)]*(?i:lftp)[^)]*\)")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// First double-quoted string mentioning lftp.
static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*(?i:lftp)[^"]*)""#).unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// `HttpClient().GetAsync("url")` / `HttpClient().PostAsync("url", ...)`.
static HTTP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"HttpClient\(\)\s*\.\s*(Get|Post)Async\(\s*"([^"]+)""#)
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Regex-based analyzer for C# sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct CSharpScanner;

impl Analyzer for CSharpScanner {
    fn language(&self) -> SupportedLanguage {
        SupportedLanguage::CSharp
    }

    fn analyze(&self, content: &str, path: &Path) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for m in SPAWN_RE.find_iter(content) {
            let Some(command) = COMMAND_RE.captures(m.as_str()).and_then(|c| c.get(1)) else {
                continue;
            };
            let line = line_at(content, m.start());
            debug!(file = %path.display(), line, "lftp invocation");
            findings.push(Finding::transfer(
                path.to_path_buf(),
                line,
                SupportedLanguage::CSharp,
                parse_command(command.as_str()),
            ));
        }

        for caps in HTTP_RE.captures_iter(content) {
            let (Some(whole), Some(verb), Some(url)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            let Some(method) = HttpMethod::from_name(verb.as_str()) else {
                continue;
            };
            let line = line_at(content, whole.start());
            debug!(file = %path.display(), line, %method, "api call");
            findings.push(Finding::api(
                path.to_path_buf(),
                line,
                SupportedLanguage::CSharp,
                url.as_str().to_string(),
                method,
            ));
        }

        Ok(findings)
    }
}

/// 1-indexed line containing byte `offset`.
fn line_at(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
