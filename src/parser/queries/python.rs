//! Python call-site extraction via AST traversal.
//!
//! Recognizes:
//!   subprocess.run(["lftp", "-c", "put /data/a.csv ftp://host/in"])
//!   os.system("lftp -c 'put a.csv ftp://host/in'")
//!   requests.get("https://api.example.com/items")

use tree_sitter::Node;

use crate::parser::walker::{
    strip_quotes, text, Argument, CallForm, CallSite, Grammar, SpawnStyle,
};
use crate::parser::SupportedLanguage;

/// `(module, function)` pairs that start a process from a command.
const SPAWN_FUNCTIONS: &[(&str, &str)] = &[
    ("subprocess", "run"),
    ("subprocess", "call"),
    ("subprocess", "check_call"),
    ("subprocess", "check_output"),
    ("subprocess", "Popen"),
    ("os", "system"),
    ("os", "popen"),
];

/// Python grammar for the tree walker.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonGrammar;

impl Grammar for PythonGrammar {
    fn language(&self) -> SupportedLanguage {
        SupportedLanguage::Python
    }

    fn default_http_clients(&self) -> &'static [&'static str] {
        &["requests"]
    }

    fn call_site<'s>(&self, node: Node<'_>, source: &'s [u8]) -> Option<CallSite<'s>> {
        if node.kind() != "call" {
            return None;
        }

        // Only qualified calls (subprocess.run, requests.get) can match;
        // imported names are not resolved.
        let function = node.child_by_field_name("function")?;
        if function.kind() != "attribute" {
            return None;
        }
        let receiver = text(function.child_by_field_name("object")?, source)?;
        let name = text(function.child_by_field_name("attribute")?, source)?;

        // generator_expression arguments carry no literals worth reading
        let arguments = node
            .child_by_field_name("arguments")
            .filter(|args| args.kind() == "argument_list")
            .map(|args| {
                let mut cursor = args.walk();
                args.named_children(&mut cursor)
                    .filter(|child| child.kind() != "comment")
                    .map(|child| argument(child, source))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Some(CallSite {
            form: CallForm::Invocation,
            receiver: Some(receiver),
            name,
            arguments,
            line: node.start_position().row + 1,
        })
    }

    fn spawn_style(&self, call: &CallSite<'_>) -> Option<SpawnStyle> {
        let receiver = call.receiver?;
        SPAWN_FUNCTIONS
            .iter()
            .any(|(module, function)| *module == receiver && *function == call.name)
            .then_some(SpawnStyle::Command)
    }
}

fn argument(node: Node<'_>, source: &[u8]) -> Argument {
    match node.kind() {
        "string" | "concatenated_string" => {
            string_value(node, source).map_or(Argument::Other, Argument::Literal)
        }
        "list" | "tuple" => {
            let mut cursor = node.walk();
            let parts: Vec<String> = node
                .named_children(&mut cursor)
                .filter_map(|element| string_value(element, source))
                .collect();
            if parts.is_empty() {
                Argument::Other
            } else {
                Argument::Strings(parts)
            }
        }
        _ => Argument::Other,
    }
}

/// Value of a string literal; implicit concatenation is joined.
fn string_value(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string" => text(node, source).map(strip_quotes),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let parts: Option<Vec<String>> = node
                .named_children(&mut cursor)
                .filter(|child| child.kind() != "comment")
                .map(|child| string_value(child, source))
                .collect();
            parts.map(|p| p.concat())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::walker::TreeAnalyzer;
    use crate::parser::Analyzer;
    use crate::types::{HttpMethod, Payload};
    use std::path::Path;

    fn analyze(source: &str) -> Vec<crate::types::Finding> {
        TreeAnalyzer::new(PythonGrammar, &[], true)
            .analyze(source, Path::new("jobs/sync.py"))
            .unwrap()
    }

    #[test]
    fn test_subprocess_list_form() {
        let mut source = "import subprocess\n".repeat(9);
        source.push_str(
            "subprocess.run([\"lftp\", \"-c\", \"put /data/report.csv ftp://example.com/up\"])\n",
        );
        let findings = analyze(&source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].source_line, 10);
        assert_eq!(findings[0].language, SupportedLanguage::Python);
        match &findings[0].payload {
            Payload::Transfer(t) => {
                assert_eq!(t.filename, "/data/report.csv");
                assert_eq!(t.source, "/data");
                assert_eq!(t.destination, "ftp://example.com/up");
            }
            other => panic!("expected transfer, got {:?}", other),
        }
    }

    #[test]
    fn test_shell_string_form() {
        let source = r#"
import os

def push():
    os.system("lftp -c 'put out/x.zip ftp://backup.local/in'")
"#;
        let findings = analyze(source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].source_line, 5);
        match &findings[0].payload {
            Payload::Transfer(t) => {
                assert_eq!(t.filename, "out/x.zip");
                assert_eq!(t.source, "out");
                assert_eq!(t.destination, "ftp://backup.local/in");
            }
            other => panic!("expected transfer, got {:?}", other),
        }
    }

    #[test]
    fn test_requests_calls() {
        let source = r#"
import requests

items = requests.get("https://api.example.com/v1/items")
requests.post('https://api.example.com/v1/items', json={"a": 1})
requests.delete("https://api.example.com/v1/items/1")
session.get("https://not-tracked.example.com")
requests.get(url)
"#;
        let findings = analyze(source);
        assert_eq!(findings.len(), 2);
        assert_eq!(
            findings[0].payload,
            Payload::Api(crate::types::ApiPayload {
                url: "https://api.example.com/v1/items".to_string(),
                method: HttpMethod::Get,
            })
        );
        assert_eq!(findings[0].source_line, 4);
        match &findings[1].payload {
            Payload::Api(a) => assert_eq!(a.method, HttpMethod::Post),
            other => panic!("expected api call, got {:?}", other),
        }
    }

    #[test]
    fn test_non_spawn_calls_ignored() {
        let source = r#"
print("lftp -c put a.csv ftp://host")
subprocess.run(["ls", "-l"])
logger.run("lftp put b.csv ftp://host")
"#;
        assert!(analyze(source).is_empty());
    }

    #[test]
    fn test_bare_calls_are_not_call_sites() {
        let source = r#"
from subprocess import run
from requests import get

run(["lftp", "-c", "put a.csv ftp://host/in"])
get("https://api.example.com/v1/items")
"#;
        let tree = {
            let mut parser = tree_sitter::Parser::new();
            parser
                .set_language(&tree_sitter_python::LANGUAGE.into())
                .unwrap();
            parser.parse(source, None).unwrap()
        };
        let root = tree.root_node();
        let mut cursor = root.walk();
        let calls: Vec<_> = root
            .named_children(&mut cursor)
            .filter_map(|stmt| stmt.named_child(0))
            .filter(|expr| expr.kind() == "call")
            .collect();
        assert_eq!(calls.len(), 2);
        for call in calls {
            assert!(PythonGrammar.call_site(call, source.as_bytes()).is_none());
        }
        assert!(analyze(source).is_empty());
    }

    #[test]
    fn test_configured_client() {
        let analyzer = TreeAnalyzer::new(PythonGrammar, &["httpx".to_string()], true);
        let findings = analyzer
            .analyze("httpx.get(\"https://svc/health\")\n", Path::new("a.py"))
            .unwrap();
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_syntax_error_strict_and_lenient() {
        let source = "def broken(:\n    requests.get(\"https://x\")\n";
        let strict = TreeAnalyzer::new(PythonGrammar, &[], true);
        assert!(strict.analyze(source, Path::new("bad.py")).is_err());

        let lenient = TreeAnalyzer::new(PythonGrammar, &[], false);
        assert!(lenient.analyze(source, Path::new("bad.py")).is_ok());
    }

    #[test]
    fn test_empty_source() {
        assert!(analyze("").is_empty());
    }
}
