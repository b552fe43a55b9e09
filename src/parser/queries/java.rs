//! Java call-site extraction via AST traversal.
//!
//! Recognizes:
//!   Runtime.getRuntime().exec("lftp -c put a.csv ftp://host/in")
//!   new ProcessBuilder("lftp", "-c", "put a.csv ftp://host/in")
//!   ProcessBuilder.start("lftp -c put a.csv ftp://host/in")
//!   HttpClient.get("https://api.example.com/items")

use tree_sitter::Node;

use crate::parser::walker::{
    strip_quotes, text, Argument, CallForm, CallSite, Grammar, SpawnStyle,
};
use crate::parser::SupportedLanguage;

/// Java grammar for the tree walker.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaGrammar;

impl Grammar for JavaGrammar {
    fn language(&self) -> SupportedLanguage {
        SupportedLanguage::Java
    }

    fn default_http_clients(&self) -> &'static [&'static str] {
        &["HttpClient", "HttpURLConnection"]
    }

    fn call_site<'s>(&self, node: Node<'_>, source: &'s [u8]) -> Option<CallSite<'s>> {
        let (form, receiver, name) = match node.kind() {
            "method_invocation" => {
                let name = text(node.child_by_field_name("name")?, source)?;
                let receiver = node
                    .child_by_field_name("object")
                    .and_then(|object| text(object, source));
                (CallForm::Invocation, receiver, name)
            }
            "object_creation_expression" => {
                let ty = text(node.child_by_field_name("type")?, source)?;
                (CallForm::Construction, None, simple_type_name(ty))
            }
            _ => return None,
        };

        let arguments = node
            .child_by_field_name("arguments")
            .map(|args| {
                let mut cursor = args.walk();
                args.named_children(&mut cursor)
                    .filter(|child| !child.kind().ends_with("comment"))
                    .map(|child| argument(child, source))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Some(CallSite {
            form,
            receiver,
            name,
            arguments,
            line: node.start_position().row + 1,
        })
    }

    fn spawn_style(&self, call: &CallSite<'_>) -> Option<SpawnStyle> {
        match (call.form, call.receiver, call.name) {
            (CallForm::Construction, _, "ProcessBuilder") => Some(SpawnStyle::Argv),
            (CallForm::Invocation, Some("ProcessBuilder"), "start") => Some(SpawnStyle::Command),
            (CallForm::Invocation, Some(receiver), "exec")
                if receiver.trim_end().ends_with("getRuntime()") =>
            {
                Some(SpawnStyle::Command)
            }
            _ => None,
        }
    }
}

/// `java.lang.ProcessBuilder` -> `ProcessBuilder`, `List<String>` -> `List`.
fn simple_type_name(ty: &str) -> &str {
    let base = ty.split('<').next().unwrap_or(ty).trim();
    base.rsplit('.').next().unwrap_or(base)
}

fn argument(node: Node<'_>, source: &[u8]) -> Argument {
    match node.kind() {
        "string_literal" => text(node, source)
            .map(strip_quotes)
            .map_or(Argument::Other, Argument::Literal),
        // new String[] {"lftp", "-c", "..."}
        "array_creation_expression" => node
            .child_by_field_name("value")
            .map_or(Argument::Other, |init| array_strings(init, source)),
        "array_initializer" => array_strings(node, source),
        _ => Argument::Other,
    }
}

fn array_strings(init: Node<'_>, source: &[u8]) -> Argument {
    let mut cursor = init.walk();
    let parts: Vec<String> = init
        .named_children(&mut cursor)
        .filter(|element| element.kind() == "string_literal")
        .filter_map(|element| text(element, source).map(strip_quotes))
        .collect();
    if parts.is_empty() {
        Argument::Other
    } else {
        Argument::Strings(parts)
    }
}
