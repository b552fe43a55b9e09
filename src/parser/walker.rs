//! Grammar-independent syntax tree walk.
//!
//! A [`Grammar`] turns tree-sitter nodes into [`CallSite`]s; the
//! [`TreeAnalyzer`] parses a file, visits every node in source order and
//! matches call sites against the transfer and HTTP shapes.

use std::path::Path;

use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

use super::{Analyzer, SupportedLanguage};
use crate::command::parse_command;
use crate::error::{Result, ScanError};
use crate::types::{Finding, HttpMethod};

/// Whether a call site invokes something or constructs an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallForm {
    Invocation,
    Construction,
}

/// How a process-spawning call receives its command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnStyle {
    /// Each argument is a candidate command (a string, or an argv list).
    Command,
    /// The whole argument list is one argv vector.
    Argv,
}

/// A call argument, reduced to what the matchers care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A string literal, quotes removed.
    Literal(String),
    /// A list/tuple/array literal; only its string elements are kept.
    Strings(Vec<String>),
    Other,
}

/// A call expression as seen by the matchers.
#[derive(Debug, Clone)]
pub struct CallSite<'s> {
    pub form: CallForm,
    /// Receiver or qualifier text (`requests`, `Runtime.getRuntime()`).
    pub receiver: Option<&'s str>,
    /// Method name, or the constructed type for constructions.
    pub name: &'s str,
    pub arguments: Vec<Argument>,
    /// 1-indexed line of the call.
    pub line: usize,
}

impl CallSite<'_> {
    /// Strings that may hold the spawned command line, in argument order.
    pub fn command_candidates(&self, style: SpawnStyle) -> Vec<String> {
        match style {
            SpawnStyle::Command => self
                .arguments
                .iter()
                .filter_map(|arg| match arg {
                    Argument::Literal(s) => Some(s.clone()),
                    Argument::Strings(parts) if !parts.is_empty() => Some(parts.join(" ")),
                    _ => None,
                })
                .collect(),
            SpawnStyle::Argv => {
                let parts: Vec<&str> = self
                    .arguments
                    .iter()
                    .flat_map(|arg| match arg {
                        Argument::Literal(s) => vec![s.as_str()],
                        Argument::Strings(parts) => parts.iter().map(String::as_str).collect(),
                        Argument::Other => Vec::new(),
                    })
                    .collect();
                if parts.is_empty() {
                    Vec::new()
                } else {
                    vec![parts.join(" ")]
                }
            }
        }
    }

    fn first_literal(&self) -> Option<&str> {
        match self.arguments.first() {
            Some(Argument::Literal(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Language-specific view of a tree-sitter syntax tree.
pub trait Grammar: Send + Sync {
    /// Language this grammar handles.
    fn language(&self) -> SupportedLanguage;

    /// Receivers recognized as HTTP clients when nothing is configured.
    fn default_http_clients(&self) -> &'static [&'static str];

    /// View `node` as a call, if it is one.
    fn call_site<'s>(&self, node: Node<'_>, source: &'s [u8]) -> Option<CallSite<'s>>;

    /// How `call` spawns a process, if it does.
    fn spawn_style(&self, call: &CallSite<'_>) -> Option<SpawnStyle>;
}

/// Structured analyzer: tree-sitter parse plus call-shape matching.
pub struct TreeAnalyzer<G> {
    grammar: G,
    http_clients: Vec<String>,
    strict_syntax: bool,
}

impl<G: Grammar> TreeAnalyzer<G> {
    /// Create an analyzer recognizing the grammar's default HTTP clients
    /// plus `extra_clients`.
    pub fn new(grammar: G, extra_clients: &[String], strict_syntax: bool) -> Self {
        let mut http_clients: Vec<String> = grammar
            .default_http_clients()
            .iter()
            .map(|c| c.to_string())
            .collect();
        for client in extra_clients {
            if !http_clients.contains(client) {
                http_clients.push(client.clone());
            }
        }
        Self {
            grammar,
            http_clients,
            strict_syntax,
        }
    }

    fn parse(&self, content: &str, path: &Path) -> Result<Tree> {
        let language = self.grammar.language();
        let ts_language = language
            .tree_sitter_language()
            .ok_or_else(|| ScanError::UnsupportedLanguage {
                path: path.to_path_buf(),
                language: language.to_string(),
            })?;

        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|source| ScanError::Grammar {
                path: path.to_path_buf(),
                source,
            })?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ScanError::Parse {
                path: path.to_path_buf(),
                reason: "parser produced no syntax tree".to_string(),
            })?;

        if self.strict_syntax {
            if let Some(line) = first_error_line(tree.root_node()) {
                return Err(ScanError::Parse {
                    path: path.to_path_buf(),
                    reason: format!("invalid {} syntax at line {}", language, line),
                });
            }
        }

        Ok(tree)
    }

    fn inspect(&self, call: &CallSite<'_>, path: &Path, findings: &mut Vec<Finding>) {
        let language = self.grammar.language();

        if let Some(style) = self.grammar.spawn_style(call) {
            let command = call
                .command_candidates(style)
                .into_iter()
                .find(|c| c.to_ascii_lowercase().contains("lftp"));
            if let Some(command) = command {
                debug!(file = %path.display(), line = call.line, "lftp invocation");
                findings.push(Finding::transfer(
                    path.to_path_buf(),
                    call.line,
                    language,
                    parse_command(&command),
                ));
            }
        }

        if call.form != CallForm::Invocation {
            return;
        }
        let Some(receiver) = call.receiver else {
            return;
        };
        if !self.http_clients.iter().any(|c| c == receiver) {
            return;
        }
        if let (Some(method), Some(url)) = (HttpMethod::from_name(call.name), call.first_literal()) {
            debug!(file = %path.display(), line = call.line, %method, "api call");
            findings.push(Finding::api(
                path.to_path_buf(),
                call.line,
                language,
                url.to_string(),
                method,
            ));
        }
    }
}

impl<G: Grammar> Analyzer for TreeAnalyzer<G> {
    fn language(&self) -> SupportedLanguage {
        self.grammar.language()
    }

    fn analyze(&self, content: &str, path: &Path) -> Result<Vec<Finding>> {
        let tree = self.parse(content, path)?;
        let source = content.as_bytes();

        let mut findings = Vec::new();
        walk(tree.root_node(), |node| {
            if let Some(call) = self.grammar.call_site(node, source) {
                self.inspect(&call, path, &mut findings);
            }
        });
        Ok(findings)
    }
}

/// Pre-order traversal with a tree cursor.
fn walk<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Line of the first ERROR or MISSING node, if the tree has any.
fn first_error_line(root: Node<'_>) -> Option<usize> {
    if !root.has_error() {
        return None;
    }
    let mut line = None;
    walk(root, |node| {
        if line.is_none() && (node.is_error() || node.is_missing()) {
            line = Some(node.start_position().row + 1);
        }
    });
    // has_error() without a located node still counts as a failure.
    Some(line.unwrap_or(0))
}

/// Node text, or `None` for non-UTF-8 spans.
pub(crate) fn text<'s>(node: Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    node.utf8_text(source).ok()
}

/// Strip quotes (and Python string prefixes such as `f`, `rb`) from a literal.
pub(crate) fn strip_quotes(s: &str) -> String {
    let s = s.trim();

    let body_start = s
        .char_indices()
        .take(3)
        .find(|(_, c)| *c == '"' || *c == '\'')
        .map(|(i, _)| i);
    let s = match body_start {
        Some(i) if s[..i].chars().all(|c| "rRbBuUfF".contains(c)) => &s[i..],
        _ => s,
    };

    for quote in ["\"\"\"", "'''"] {
        if s.len() >= 6 && s.starts_with(quote) && s.ends_with(quote) {
            return s[3..s.len() - 3].to_string();
        }
    }
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"/api/users\""), "/api/users");
        assert_eq!(strip_quotes("'/api/users'"), "/api/users");
        assert_eq!(strip_quotes("f\"/api/users/{id}\""), "/api/users/{id}");
        assert_eq!(strip_quotes("rb'raw'"), "raw");
        assert_eq!(strip_quotes("\"\"\"lftp -c put a ftp://h\"\"\""), "lftp -c put a ftp://h");
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn test_command_candidates() {
        let call = CallSite {
            form: CallForm::Construction,
            receiver: None,
            name: "ProcessBuilder",
            arguments: vec![
                Argument::Literal("lftp".to_string()),
                Argument::Other,
                Argument::Strings(vec!["-c".to_string(), "put a ftp://h".to_string()]),
            ],
            line: 1,
        };
        assert_eq!(
            call.command_candidates(SpawnStyle::Argv),
            vec!["lftp -c put a ftp://h".to_string()]
        );
        assert_eq!(
            call.command_candidates(SpawnStyle::Command),
            vec!["lftp".to_string(), "-c put a ftp://h".to_string()]
        );
        assert_eq!(call.first_literal(), Some("lftp"));
    }
}
