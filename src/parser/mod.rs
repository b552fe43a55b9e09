//! Language analyzers.
//!
//! Python and Java are parsed with tree-sitter and walked for call shapes;
//! C# is scanned lexically. All three produce the same [`Finding`]s.

pub mod csharp;
pub mod language;
pub mod queries;
pub mod walker;

use std::collections::HashMap;
use std::path::Path;

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::types::Finding;

pub use csharp::CSharpScanner;
pub use language::SupportedLanguage;
pub use queries::{JavaGrammar, PythonGrammar};
pub use walker::TreeAnalyzer;

/// Detects transfers and API calls in one source file.
///
/// Implementations hold no per-file state. A file that cannot be analyzed
/// yields an error and no findings.
pub trait Analyzer: Send + Sync {
    /// Language this analyzer handles.
    fn language(&self) -> SupportedLanguage;

    /// Analyze `content`, attributing findings to `path`.
    fn analyze(&self, content: &str, path: &Path) -> Result<Vec<Finding>>;
}

/// Maps each language to its analyzer.
pub struct AnalyzerRegistry {
    analyzers: HashMap<SupportedLanguage, Box<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            analyzers: HashMap::new(),
        }
    }

    /// Registry with the built-in analyzer for every supported language.
    pub fn from_config(config: &ScanConfig) -> Self {
        let strict = config.scan.strict_syntax;
        let mut registry = Self::empty();
        registry.register(Box::new(TreeAnalyzer::new(
            PythonGrammar,
            &config.http_clients.python,
            strict,
        )));
        registry.register(Box::new(TreeAnalyzer::new(
            JavaGrammar,
            &config.http_clients.java,
            strict,
        )));
        registry.register(Box::new(CSharpScanner));
        registry
    }

    /// Register `analyzer`, replacing any analyzer for the same language.
    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.insert(analyzer.language(), analyzer);
    }

    pub fn get(&self, language: SupportedLanguage) -> Option<&dyn Analyzer> {
        self.analyzers.get(&language).map(|a| a.as_ref())
    }

    /// Run the analyzer for `language` over one file.
    pub fn analyze(
        &self,
        language: SupportedLanguage,
        content: &str,
        path: &Path,
    ) -> Result<Vec<Finding>> {
        let analyzer = self
            .get(language)
            .ok_or_else(|| ScanError::UnsupportedLanguage {
                path: path.to_path_buf(),
                language: language.to_string(),
            })?;
        analyzer.analyze(content, path)
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}
