//! Language detection and tree-sitter grammar loading.

use std::fmt;
use std::path::Path;
use tree_sitter::Language;

/// Supported programming languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedLanguage {
    Python,
    Java,
    CSharp,
}

impl SupportedLanguage {
    pub const ALL: [SupportedLanguage; 3] = [
        SupportedLanguage::Python,
        SupportedLanguage::Java,
        SupportedLanguage::CSharp,
    ];

    /// Detect language from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "py" => Some(SupportedLanguage::Python),
            "java" => Some(SupportedLanguage::Java),
            "cs" => Some(SupportedLanguage::CSharp),
            _ => None,
        }
    }

    /// Git pathspec selecting files of this language.
    pub fn pathspec(&self) -> &'static str {
        match self {
            SupportedLanguage::Python => "*.py",
            SupportedLanguage::Java => "*.java",
            SupportedLanguage::CSharp => "*.cs",
        }
    }

    /// Get the tree-sitter Language, if this language is parsed structurally.
    ///
    /// C# is matched lexically and has no grammar here.
    pub fn tree_sitter_language(&self) -> Option<Language> {
        match self {
            SupportedLanguage::Python => Some(tree_sitter_python::LANGUAGE.into()),
            SupportedLanguage::Java => Some(tree_sitter_java::LANGUAGE.into()),
            SupportedLanguage::CSharp => None,
        }
    }

    /// Tag used in DSL lines and reports.
    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::Python => "python",
            SupportedLanguage::Java => "java",
            SupportedLanguage::CSharp => "csharp",
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
