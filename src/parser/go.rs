//! Tree-sitter adapter for Go source files.
//!
//! Parses one file at a time and lowers the syntax tree into the
//! intermediate representation from the parent module: top-level type
//! declarations with resolved field types, function and method
//! declarations, the call expressions inside their bodies, and the import
//! list. No name binding happens here; qualifier tokens are kept verbatim.

use std::path::Path;

use tree_sitter::{Node, Parser};

use super::{CallSite, FieldDecl, FuncDecl, ImportSpec, ParsedFile, TypeDecl, TypeKind, TypeRef};
use crate::error::{ArchError, Result};

/// Go intrinsic operations that never produce call sites.
const BUILTINS: &[&str] = &[
    "make", "new", "len", "cap", "append", "copy", "delete", "close", "panic", "recover", "print",
    "println", "complex", "real", "imag",
];

/// Wraps a `tree_sitter::Parser` configured with the Go grammar.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .expect("Go grammar is compatible with the linked tree-sitter");
        Self { parser }
    }

    /// Parse one file and lower it to a `ParsedFile`.
    ///
    /// A file the grammar cannot produce a clean tree for is a fatal
    /// `Parse` error: the engine is fail-fast and never emits a graph
    /// derived from broken syntax.
    pub fn parse_file(&mut self, path: &Path, source: &str) -> Result<ParsedFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ArchError::Parse {
                file: path.to_path_buf(),
                message: "parser produced no syntax tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ArchError::Parse {
                file: path.to_path_buf(),
                message: "syntax errors in source".to_string(),
            });
        }

        let mut file = ParsedFile::default();

        for child in root.named_children(&mut root.walk()) {
            match child.kind() {
                "package_clause" => {
                    if let Some(ident) = child.named_child(0) {
                        file.package_name = text(ident, source).to_string();
                    }
                }
                "import_declaration" => collect_imports(child, source, &mut file.imports),
                "type_declaration" => collect_types(child, source, &mut file.types),
                "function_declaration" => {
                    if let Some(decl) = lower_function(child, source) {
                        file.functions.push(decl);
                    }
                }
                "method_declaration" => {
                    if let Some(decl) = lower_method(child, source) {
                        file.functions.push(decl);
                    }
                }
                _ => {}
            }
        }

        Ok(file)
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

fn text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

// ─── Imports ────────────────────────────────────────────────────────────

/// Single import: import_declaration → import_spec.
/// Grouped import: import_declaration → import_spec_list → import_spec*.
fn collect_imports(node: Node, source: &str, out: &mut Vec<ImportSpec>) {
    for child in node.named_children(&mut node.walk()) {
        match child.kind() {
            "import_spec" => lower_import_spec(child, source, out),
            "import_spec_list" => collect_imports(child, source, out),
            _ => {}
        }
    }
}

fn lower_import_spec(node: Node, source: &str, out: &mut Vec<ImportSpec>) {
    let Some(path_node) = node.child_by_field_name("path") else {
        return;
    };
    let path = text(path_node, source)
        .trim_matches('"')
        .trim_matches('`')
        .to_string();
    if !path.is_empty() {
        out.push(ImportSpec {
            path,
            line: node.start_position().row + 1,
        });
    }
}

// ─── Type declarations ──────────────────────────────────────────────────

fn collect_types(node: Node, source: &str, out: &mut Vec<TypeDecl>) {
    // type_declaration holds one or more type_spec (and type_alias) nodes
    for child in node.named_children(&mut node.walk()) {
        if let "type_spec" | "type_alias" = child.kind() {
            if let Some(decl) = lower_type_spec(child, source) {
                out.push(decl);
            }
        }
    }
}

fn lower_type_spec(node: Node, source: &str) -> Option<TypeDecl> {
    let name = text(node.child_by_field_name("name")?, source).to_string();
    let type_node = node.child_by_field_name("type")?;

    let mut decl = TypeDecl {
        name,
        kind: match type_node.kind() {
            "interface_type" => TypeKind::Interface,
            _ => TypeKind::Record,
        },
        line: node.start_position().row + 1,
        fields: Vec::new(),
        embeds: Vec::new(),
    };

    if type_node.kind() == "struct_type" {
        if let Some(list) = type_node
            .named_children(&mut type_node.walk())
            .find(|c| c.kind() == "field_declaration_list")
        {
            for field in list.named_children(&mut list.walk()) {
                if field.kind() == "field_declaration" {
                    lower_struct_field(field, source, &mut decl);
                }
            }
        }
    }

    Some(decl)
}

/// A field_declaration with no `name` children is an embedded type.
/// Fields whose type expression the resolver cannot unwrap are omitted.
fn lower_struct_field(node: Node, source: &str, decl: &mut TypeDecl) {
    let Some(type_node) = node.child_by_field_name("type") else {
        return;
    };
    let Some(ty) = resolve_type_ref(type_node, source) else {
        return;
    };

    let mut cursor = node.walk();
    let names: Vec<String> = node
        .children_by_field_name("name", &mut cursor)
        .map(|n| text(n, source).to_string())
        .collect();

    if names.is_empty() {
        decl.embeds.push(ty.name);
        return;
    }

    for name in names {
        decl.fields.push(FieldDecl {
            name,
            ty: ty.clone(),
        });
    }
}

/// Unwrap a type expression to its short name and owning package.
///
/// Pointers, slices, arrays, and map values unwrap recursively; the
/// qualifier of a `pkg.Name` expression is kept as the literal token.
/// Channel, function, and generic shapes are not handled and yield `None`.
pub(crate) fn resolve_type_ref(node: Node, source: &str) -> Option<TypeRef> {
    match node.kind() {
        "type_identifier" => Some(TypeRef {
            name: text(node, source).to_string(),
            package: None,
        }),
        "qualified_type" => {
            let package = node.child_by_field_name("package")?;
            let name = node.child_by_field_name("name")?;
            Some(TypeRef {
                name: text(name, source).to_string(),
                package: Some(text(package, source).to_string()),
            })
        }
        "pointer_type" => resolve_type_ref(node.named_child(0)?, source),
        "slice_type" | "array_type" => {
            resolve_type_ref(node.child_by_field_name("element")?, source)
        }
        "map_type" => resolve_type_ref(node.child_by_field_name("value")?, source),
        _ => None,
    }
}

// ─── Functions and methods ──────────────────────────────────────────────

fn lower_function(node: Node, source: &str) -> Option<FuncDecl> {
    let name = text(node.child_by_field_name("name")?, source).to_string();
    Some(FuncDecl {
        name,
        receiver: None,
        line: node.start_position().row + 1,
        calls: body_calls(node, source),
    })
}

fn lower_method(node: Node, source: &str) -> Option<FuncDecl> {
    let name = text(node.child_by_field_name("name")?, source).to_string();
    let receiver = node
        .child_by_field_name("receiver")
        .map(|r| receiver_type_name(r, source))
        .unwrap_or_default();
    Some(FuncDecl {
        name,
        receiver: Some(receiver),
        line: node.start_position().row + 1,
        calls: body_calls(node, source),
    })
}

/// `func (s *Server) Start()` → "Server". Receiver shapes beyond a plain
/// or pointered identifier resolve to an empty name.
fn receiver_type_name(receiver: Node, source: &str) -> String {
    for child in receiver.named_children(&mut receiver.walk()) {
        if child.kind() == "parameter_declaration" {
            if let Some(type_node) = child.child_by_field_name("type") {
                return match type_node.kind() {
                    "type_identifier" => text(type_node, source).to_string(),
                    "pointer_type" => type_node
                        .named_child(0)
                        .filter(|c| c.kind() == "type_identifier")
                        .map(|c| text(c, source).to_string())
                        .unwrap_or_default(),
                    _ => String::new(),
                };
            }
        }
    }
    String::new()
}

fn body_calls(decl: Node, source: &str) -> Vec<CallSite> {
    let mut calls = Vec::new();
    if let Some(body) = decl.child_by_field_name("body") {
        collect_calls(body, source, &mut calls);
    }
    calls
}

/// Walk every node in a body, recording call expressions.
///
/// The walk descends into nested blocks and into function literals, so
/// calls inside closures attribute to the enclosing named declaration.
/// Call arguments are walked too: `f(g())` records both f and g.
fn collect_calls(node: Node, source: &str, calls: &mut Vec<CallSite>) {
    if node.kind() == "call_expression" {
        if let Some(site) = classify_call(node, source) {
            calls.push(site);
        }
    }
    for child in node.named_children(&mut node.walk()) {
        collect_calls(child, source, calls);
    }
}

/// Classify one call expression.
///
/// Bare identifiers that are not builtins become free-function call
/// sites. Selector callees with a simple-identifier base become
/// method-style call sites. Deeper selector chains and other callee
/// shapes are not recorded.
fn classify_call(call: Node, source: &str) -> Option<CallSite> {
    let callee = call.child_by_field_name("function")?;
    let line = call.start_position().row + 1;

    match callee.kind() {
        "identifier" => {
            let name = text(callee, source);
            if BUILTINS.contains(&name) {
                return None;
            }
            Some(CallSite {
                target: name.to_string(),
                receiver: None,
                line,
            })
        }
        "selector_expression" => {
            let operand = callee.child_by_field_name("operand")?;
            if operand.kind() != "identifier" {
                return None;
            }
            let field = callee.child_by_field_name("field")?;
            Some(CallSite {
                target: text(field, source).to_string(),
                receiver: Some(text(operand, source).to_string()),
                line,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = GoParser::new();
        parser.parse_file(&PathBuf::from("test.go"), source).unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse(
            r#"package server

import (
    "fmt"
    "example.com/app/store"
)

import "os"
"#,
        );

        assert_eq!(file.package_name, "server");
        let paths: Vec<&str> = file.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["fmt", "example.com/app/store", "os"]);
    }

    #[test]
    fn test_struct_fields_and_embeds() {
        let file = parse(
            r#"package main

type Base struct{}

type Server struct {
    Base
    addr string
    store store.Cache
    peers []Peer
    index map[string]*Entry
}
"#,
        );

        assert_eq!(file.types.len(), 2);
        let server = &file.types[1];
        assert_eq!(server.name, "Server");
        assert_eq!(server.kind, TypeKind::Record);
        assert_eq!(server.embeds, vec!["Base"]);

        let fields: Vec<(&str, &str, Option<&str>)> = server
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.name.as_str(), f.ty.package.as_deref()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("addr", "string", None),
                ("store", "Cache", Some("store")),
                ("peers", "Peer", None),
                ("index", "Entry", None),
            ]
        );
    }

    #[test]
    fn test_unhandled_type_shapes_are_dropped() {
        let file = parse(
            r#"package main

type Worker struct {
    jobs chan Job
    fn func(int) int
    name string
}
"#,
        );

        let worker = &file.types[0];
        // channel and function fields resolve to nothing
        assert_eq!(worker.fields.len(), 1);
        assert_eq!(worker.fields[0].name, "name");
    }

    #[test]
    fn test_interface_kind() {
        let file = parse(
            r#"package main

type Reader interface {
    Read(p []byte) (int, error)
}
"#,
        );

        assert_eq!(file.types[0].kind, TypeKind::Interface);
        assert!(file.types[0].fields.is_empty());
    }

    #[test]
    fn test_functions_and_methods() {
        let file = parse(
            r#"package main

func Run() {
    setup()
}

func (s *Server) Start() error {
    return nil
}

func (s Server) Addr() string {
    return s.addr
}
"#,
        );

        assert_eq!(file.functions.len(), 3);
        assert_eq!(file.functions[0].name, "Run");
        assert_eq!(file.functions[0].receiver, None);
        assert_eq!(file.functions[1].receiver.as_deref(), Some("Server"));
        assert_eq!(file.functions[2].receiver.as_deref(), Some("Server"));
    }

    #[test]
    fn test_call_classification() {
        let file = parse(
            r#"package main

func process(s *Server) {
    data := fetch()
    out := make([]byte, 0, len(data))
    out = append(out, data...)
    s.validate(data)
    fmt.Println(transform(data))
    s.conn.flush()
}
"#,
        );

        let calls = &file.functions[0].calls;
        let rendered: Vec<(String, Option<String>)> = calls
            .iter()
            .map(|c| (c.target.clone(), c.receiver.clone()))
            .collect();

        // builtins filtered; deep selector chain s.conn.flush() not recorded
        assert_eq!(
            rendered,
            vec![
                ("fetch".to_string(), None),
                ("validate".to_string(), Some("s".to_string())),
                ("Println".to_string(), Some("fmt".to_string())),
                ("transform".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_closure_calls_attribute_to_enclosing_declaration() {
        let file = parse(
            r#"package main

func outer() {
    go func() {
        inner()
    }()
    defer func() { cleanup() }()
}
"#,
        );

        let targets: Vec<&str> = file.functions[0]
            .calls
            .iter()
            .map(|c| c.target.as_str())
            .collect();
        assert!(targets.contains(&"inner"));
        assert!(targets.contains(&"cleanup"));
    }

    #[test]
    fn test_bodyless_declaration_has_no_calls() {
        let file = parse(
            r#"package main

func Asm() int
"#,
        );

        assert_eq!(file.functions.len(), 1);
        assert!(file.functions[0].calls.is_empty());
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let mut parser = GoParser::new();
        let result = parser.parse_file(&PathBuf::from("bad.go"), "package main\n\nfunc broken( {\n");
        assert!(matches!(result, Err(ArchError::Parse { .. })));
    }

    #[test]
    fn test_line_numbers_are_one_indexed() {
        let file = parse("package main\n\nfunc First() {}\n");
        assert_eq!(file.functions[0].line, 3);
    }
}
