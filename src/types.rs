//! Core types for depscan findings.
//!
//! Defines the language-agnostic record model shared by every analyzer,
//! the run statistics, and their serialized forms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::parser::SupportedLanguage;

/// Placeholder for any payload field that could not be extracted.
pub const UNKNOWN: &str = "unknown";

/// The kind of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    /// An `lftp` invocation launched as a subprocess.
    TransferCall,
    /// An outbound HTTP call through a known client library.
    ApiCall,
}

/// HTTP verb of a detected API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Match a client method name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Parameters of an `lftp` transfer recovered from its command string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    /// The file handed to `put`.
    pub filename: String,
    /// Directory of `filename`, or `local`.
    pub source: String,
    /// First ftp-looking token after the program name.
    pub destination: String,
}

impl TransferPayload {
    /// A payload where nothing could be determined.
    pub fn unknown() -> Self {
        Self {
            filename: UNKNOWN.to_string(),
            source: UNKNOWN.to_string(),
            destination: UNKNOWN.to_string(),
        }
    }
}

/// Target of an outbound HTTP call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPayload {
    pub url: String,
    pub method: HttpMethod,
}

/// What a finding detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Transfer(TransferPayload),
    Api(ApiPayload),
}

/// A single detected behavior, tied to a source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// File the call was found in (as enumerated, usually repo-relative).
    pub source_file: PathBuf,
    /// 1-indexed line of the call, 0 when unknown.
    pub source_line: usize,
    pub language: SupportedLanguage,
    pub payload: Payload,
}

impl Finding {
    pub fn transfer(
        source_file: PathBuf,
        source_line: usize,
        language: SupportedLanguage,
        payload: TransferPayload,
    ) -> Self {
        Self {
            source_file,
            source_line,
            language,
            payload: Payload::Transfer(payload),
        }
    }

    pub fn api(
        source_file: PathBuf,
        source_line: usize,
        language: SupportedLanguage,
        url: String,
        method: HttpMethod,
    ) -> Self {
        Self {
            source_file,
            source_line,
            language,
            payload: Payload::Api(ApiPayload { url, method }),
        }
    }

    pub fn kind(&self) -> FindingKind {
        match self.payload {
            Payload::Transfer(_) => FindingKind::TransferCall,
            Payload::Api(_) => FindingKind::ApiCall,
        }
    }
}

/// Renders the finding as one DSL line.
impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Transfer(t) => write!(
                f,
                "LFTP_TRANSFER {} from {} to {} at {}:{} ({})",
                t.filename,
                t.source,
                t.destination,
                self.source_file.display(),
                self.source_line,
                self.language
            ),
            Payload::Api(a) => write!(
                f,
                "API_CALL {} {} at {}:{} ({})",
                a.method,
                a.url,
                self.source_file.display(),
                self.source_line,
                self.language
            ),
        }
    }
}

/// Per-run totals, serialized as the machine-readable summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatistics {
    /// Files analyzed without error.
    pub files_scanned: usize,
    #[serde(rename = "lftp_transfers")]
    pub transfers: Vec<TransferPayload>,
    pub api_calls: Vec<ApiPayload>,
    /// Only serialized when something went wrong.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}
