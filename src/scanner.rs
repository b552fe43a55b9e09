//! Detection coordinator — owns one scan run.
//!
//! Dispatches files to their analyzers, accumulates findings and statistics
//! in input order, and turns every failure into an `errors` entry instead
//! of stopping the run.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::parser::{AnalyzerRegistry, SupportedLanguage};
use crate::repository::{self, SourceFile};
use crate::types::{Finding, Payload, ScanStatistics};

/// Findings and statistics of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub findings: Vec<Finding>,
    pub statistics: ScanStatistics,
}

/// Run-scoped scan context.
pub struct Scanner {
    registry: AnalyzerRegistry,
    parallel: bool,
    findings: Vec<Finding>,
    stats: ScanStatistics,
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self::with_registry(AnalyzerRegistry::from_config(config), config.scan.parallel)
    }

    pub fn with_registry(registry: AnalyzerRegistry, parallel: bool) -> Self {
        Self {
            registry,
            parallel,
            findings: Vec::new(),
            stats: ScanStatistics::default(),
        }
    }

    /// Analyze one file's content and fold the outcome into the run.
    pub fn process_file(&mut self, path: &Path, language: SupportedLanguage, content: &str) {
        let outcome = self.registry.analyze(language, content, path);
        self.absorb(path, outcome);
    }

    /// Record a failure that happened outside analysis (unreadable file,
    /// inaccessible repository).
    pub fn record_error(&mut self, error: &ScanError) {
        warn!(error = %error, "scan error");
        self.stats.errors.push(error.to_string());
    }

    /// Scan every tracked source file under `root`.
    ///
    /// When parallel, files are analyzed on the rayon pool but merged in
    /// index order, so the result matches a sequential run.
    pub fn scan_repository(&mut self, root: &Path) {
        let files = match repository::tracked_files(root) {
            Ok(files) => files,
            Err(e) => {
                self.record_error(&e);
                return;
            }
        };
        info!(root = %root.display(), files = files.len(), parallel = self.parallel, "scanning");

        let registry = &self.registry;
        let analyze = |file: &SourceFile| -> Result<Vec<Finding>> {
            let content = repository::read_source(root, &file.path)?;
            registry.analyze(file.language, &content, &file.path)
        };
        let outcomes: Vec<Result<Vec<Finding>>> = if self.parallel {
            files.par_iter().map(analyze).collect()
        } else {
            files.iter().map(analyze).collect()
        };

        for (file, outcome) in files.iter().zip(outcomes) {
            self.absorb(&file.path, outcome);
        }
        info!(
            scanned = self.stats.files_scanned,
            findings = self.findings.len(),
            errors = self.stats.errors.len(),
            "scan complete"
        );
    }

    fn absorb(&mut self, path: &Path, outcome: Result<Vec<Finding>>) {
        let findings = match outcome {
            Ok(findings) => findings,
            Err(e) => {
                self.record_error(&e);
                return;
            }
        };
        debug!(file = %path.display(), findings = findings.len(), "analyzed");

        self.stats.files_scanned += 1;
        for finding in &findings {
            match &finding.payload {
                Payload::Transfer(t) => self.stats.transfers.push(t.clone()),
                Payload::Api(a) => self.stats.api_calls.push(a.clone()),
            }
        }
        self.findings.extend(findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn statistics(&self) -> &ScanStatistics {
        &self.stats
    }

    /// End the run.
    pub fn finish(self) -> ScanReport {
        ScanReport {
            findings: self.findings,
            statistics: self.stats,
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}
