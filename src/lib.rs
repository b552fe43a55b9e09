//! # depscan
//!
//! Inventory of `lftp` transfers and outbound HTTP calls in a polyglot
//! git repository.
//!
//! depscan reads every tracked Python, Java and C# file, recognizes a small
//! set of call shapes, and reports them as a line-oriented DSL plus a JSON
//! summary.
//!
//! ## Key Features
//!
//! - **Syntax-aware**: Python and Java are parsed with tree-sitter
//! - **Lexical fallback**: C# is matched with regular expressions
//! - **Never aborts**: unreadable or unparsable files become `errors` entries
//! - **Deterministic**: output order follows the git index, even in parallel
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use depscan::{render_dsl, Scanner};
//! use std::path::Path;
//!
//! let mut scanner = Scanner::default();
//! scanner.scan_repository(Path::new("."));
//! let report = scanner.finish();
//! println!("{}", render_dsl(&report.findings));
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod parser;
pub mod report;
pub mod repository;
pub mod scanner;
pub mod types;

// Re-exports for convenience
pub use command::parse_command;
pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use parser::{Analyzer, AnalyzerRegistry, SupportedLanguage};
pub use report::{render_dsl, render_summary, DSL_HEADER};
pub use scanner::{ScanReport, Scanner};
pub use types::{
    ApiPayload, Finding, FindingKind, HttpMethod, Payload, ScanStatistics, TransferPayload,
};

/// Scan the repository at `root` with `config` in one call.
pub fn scan(root: &std::path::Path, config: &ScanConfig) -> ScanReport {
    let mut scanner = Scanner::new(config);
    scanner.scan_repository(root);
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_mixed_languages_end_to_end() {
        let python = r#"
import subprocess
import requests

def nightly():
    subprocess.run(["lftp", "-c", "put /data/report.csv ftp://example.com/up"])
    return requests.get("https://api.example.com/v1/items")
"#;
        let java = r#"
public class Export {
    public void run() throws Exception {
        Runtime.getRuntime().exec("lftp -e 'put exports/a.xml; bye' ftp://partner.example.com");
        HttpClient.post("https://partner.example.com/notify");
    }
}
"#;
        let csharp = "class C {\n  async Task Go() {\n    await new HttpClient().GetAsync(\"https://svc/x\");\n  }\n}\n";

        let mut scanner = Scanner::default();
        scanner.process_file(Path::new("jobs/nightly.py"), SupportedLanguage::Python, python);
        scanner.process_file(Path::new("src/Export.java"), SupportedLanguage::Java, java);
        scanner.process_file(Path::new("Client.cs"), SupportedLanguage::CSharp, csharp);
        let report = scanner.finish();

        assert_eq!(report.statistics.files_scanned, 3);
        assert!(report.statistics.errors.is_empty());
        assert_eq!(report.statistics.transfers.len(), 2);
        assert_eq!(report.statistics.api_calls.len(), 3);

        let dsl = render_dsl(&report.findings);
        let expected = [
            DSL_HEADER,
            "LFTP_TRANSFER /data/report.csv from /data to ftp://example.com/up at jobs/nightly.py:6 (python)",
            "API_CALL GET https://api.example.com/v1/items at jobs/nightly.py:7 (python)",
            "LFTP_TRANSFER exports/a.xml; from exports to ftp://partner.example.com at src/Export.java:4 (java)",
            "API_CALL POST https://partner.example.com/notify at src/Export.java:5 (java)",
            "API_CALL GET https://svc/x at Client.cs:3 (csharp)",
        ]
        .join("\n");
        assert_eq!(dsl, expected);

        let summary: serde_json::Value =
            serde_json::from_str(&render_summary(&report.statistics).unwrap()).unwrap();
        assert_eq!(summary["files_scanned"], 3);
        assert_eq!(summary["lftp_transfers"][0]["destination"], "ftp://example.com/up");
        assert_eq!(summary["api_calls"][2]["url"], "https://svc/x");
        assert!(summary.get("errors").is_none());
    }

    #[test]
    fn test_failed_file_keeps_run_going() {
        let mut scanner = Scanner::default();
        scanner.process_file(
            Path::new("a.py"),
            SupportedLanguage::Python,
            "requests.post(\"https://a\")\n",
        );
        scanner.process_file(Path::new("Bad.java"), SupportedLanguage::Java, "class {");
        scanner.process_file(
            Path::new("c.py"),
            SupportedLanguage::Python,
            "requests.get(\"https://c\")\n",
        );
        let report = scanner.finish();

        assert_eq!(report.statistics.files_scanned, 2);
        assert_eq!(report.statistics.errors.len(), 1);
        assert!(report.statistics.errors[0].contains("Bad.java"));
        let files: Vec<PathBuf> = report
            .findings
            .iter()
            .map(|f| f.source_file.clone())
            .collect();
        assert_eq!(files, vec![PathBuf::from("a.py"), PathBuf::from("c.py")]);

        let summary: serde_json::Value =
            serde_json::from_str(&render_summary(&report.statistics).unwrap()).unwrap();
        assert_eq!(summary["errors"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_scan_non_repository() {
        let dir = tempfile::tempdir().unwrap();
        let report = scan(dir.path(), &ScanConfig::default());
        assert!(report.findings.is_empty());
        assert_eq!(report.statistics.files_scanned, 0);
        assert_eq!(report.statistics.errors.len(), 1);
        assert_eq!(render_dsl(&report.findings), DSL_HEADER);
    }
}
