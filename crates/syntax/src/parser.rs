use crate::comment::doc_text;
use crate::error::{Result, SyntaxError};
use crate::types::{Decl, FuncDecl, ImportSpec, LineSpan, SourceFile, TypeSpec};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// AST-based parser for Go compilation units
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a parser bound to the Go grammar
    pub fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| SyntaxError::tree_sitter(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Read and parse a file from disk
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<SourceFile> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SyntaxError::io(path, e))?;
        self.parse_str(&content, path)
    }

    /// Parse source text; `path` is only recorded, never read
    pub fn parse_str(&mut self, content: &str, path: impl AsRef<Path>) -> Result<SourceFile> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| SyntaxError::parse(&display, "Failed to parse source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = first_error(root).map_or_else(
                || "syntax error".to_string(),
                |node| {
                    format!(
                        "syntax error at line {}, column {}",
                        node.start_position().row + 1,
                        node.start_position().column + 1
                    )
                },
            );
            return Err(SyntaxError::parse(display, message));
        }

        let mut package = None;
        let mut imports = Vec::new();
        let mut decls = Vec::new();

        let mut comments: Vec<Node> = Vec::new();
        let mut prev_end_row: Option<usize> = None;

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            // statement terminators
            if !child.is_named() {
                continue;
            }
            let kind = child.kind();
            if kind == "comment" {
                // trailing comment on the same line as the previous declaration
                if prev_end_row == Some(child.start_position().row) {
                    comments.clear();
                    continue;
                }
                if let Some(last) = comments.last() {
                    if child.start_position().row > last.end_position().row + 1 {
                        comments.clear();
                    }
                }
                comments.push(child);
                continue;
            }

            let doc = take_doc(content, &mut comments, child);
            prev_end_row = Some(child.end_position().row);

            match kind {
                "package_clause" => {
                    package = child
                        .named_child(0)
                        .map(|name| node_text(content, name).to_string());
                }
                "import_declaration" => extract_imports(content, child, &mut imports),
                "function_declaration" | "method_declaration" => {
                    if let Some(func) = extract_func(content, child, doc) {
                        decls.push(Decl::Func(func));
                    }
                }
                "type_declaration" => extract_types(content, child, &mut decls),
                _ => {}
            }
        }

        let package = package
            .ok_or_else(|| SyntaxError::parse(&display, "missing package clause"))?;

        log::debug!(
            "Parsed {display}: package {package}, {} imports, {} declarations",
            imports.len(),
            decls.len()
        );

        Ok(SourceFile {
            path: path.to_path_buf(),
            package,
            imports,
            decls,
        })
    }
}

/// Doc text of the comment group ending on the line right above `node`
fn take_doc(content: &str, comments: &mut Vec<Node>, node: Node) -> String {
    let attached = comments
        .last()
        .is_some_and(|last| last.end_position().row + 1 == node.start_position().row);
    let doc = if attached {
        let texts: Vec<&str> = comments.iter().map(|c| node_text(content, *c)).collect();
        doc_text(&texts)
    } else {
        String::new()
    };
    comments.clear();
    doc
}

fn extract_func(content: &str, node: Node, doc: String) -> Option<FuncDecl> {
    let name = node.child_by_field_name("name")?;
    let receiver = node
        .child_by_field_name("receiver")
        .and_then(|params| receiver_type(content, params));

    Some(FuncDecl {
        name: node_text(content, name).to_string(),
        receiver,
        doc,
        span: span_of(node),
    })
}

/// Receiver base type: `(b *Blaer)` -> `Blaer`, `(l List[T])` -> `List`
fn receiver_type(content: &str, params: Node) -> Option<String> {
    let mut cursor = params.walk();
    let param = params
        .named_children(&mut cursor)
        .find(|child| child.kind() == "parameter_declaration")?;
    let ty = param.child_by_field_name("type")?;
    let text = node_text(content, ty).trim_start_matches('*');
    let base = text.split('[').next().unwrap_or(text).trim();
    (!base.is_empty()).then(|| base.to_string())
}

fn extract_types(content: &str, node: Node, decls: &mut Vec<Decl>) {
    let mut cursor = node.walk();
    for spec in node.named_children(&mut cursor) {
        if !matches!(spec.kind(), "type_spec" | "type_alias") {
            continue;
        }
        if let Some(name) = spec.child_by_field_name("name") {
            decls.push(Decl::Type(TypeSpec {
                name: node_text(content, name).to_string(),
                span: span_of(spec),
            }));
        }
    }
}

fn extract_imports(content: &str, node: Node, imports: &mut Vec<ImportSpec>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                if let Some(spec) = import_spec(content, child) {
                    imports.push(spec);
                }
            }
            "import_spec_list" => extract_imports(content, child, imports),
            _ => {}
        }
    }
}

fn import_spec(content: &str, node: Node) -> Option<ImportSpec> {
    let path = node.child_by_field_name("path")?;
    let path = node_text(content, path)
        .trim_matches(|c| c == '"' || c == '`')
        .to_string();
    let name = node
        .child_by_field_name("name")
        .map(|name| node_text(content, name).to_string());
    Some(ImportSpec { name, path })
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

fn span_of(node: Node) -> LineSpan {
    LineSpan::new(node.start_position().row + 1, node.end_position().row + 1)
}

fn node_text<'a>(content: &'a str, node: Node) -> &'a str {
    &content[node.start_byte()..node.end_byte()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"package sample

import (
	"fmt"
	str "strings"
	_ "embed"
)

//go:generate ../go2md

// Comment for all types.
type (
	// t1 is an int.
	t1 int
	t2 string
)

// Bla is a simple filter.
//
// flow:
//     in (int)-> [foo1] -> out
func Bla(i int) int {
	return foo1(i)
}

func foo1(i int) int {
	fmt.Println(str.TrimSpace("x"))
	return i + 1
}

// DoBla is the input port.
func (b *Blaer) DoBla(j int) int {
	return j
}
"#;

    fn parse(code: &str) -> SourceFile {
        let mut parser = GoParser::new().unwrap();
        parser.parse_str(code, "sample.go").unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse(SAMPLE);
        assert_eq!(file.package, "sample");
        assert_eq!(
            file.imports,
            vec![
                ImportSpec {
                    name: None,
                    path: "fmt".to_string()
                },
                ImportSpec {
                    name: Some("str".to_string()),
                    path: "strings".to_string()
                },
                ImportSpec {
                    name: Some("_".to_string()),
                    path: "embed".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_declarations_in_order() {
        let file = parse(SAMPLE);
        let names: Vec<_> = file.decls.iter().map(Decl::name).collect();
        assert_eq!(names, vec!["t1", "t2", "Bla", "foo1", "DoBla"]);
    }

    #[test]
    fn test_doc_comments() {
        let file = parse(SAMPLE);
        let Some(Decl::Func(bla)) = file.decls.iter().find(|d| d.name() == "Bla") else {
            panic!("Bla not found");
        };
        assert_eq!(
            bla.doc,
            "Bla is a simple filter.\n\nflow:\n    in (int)-> [foo1] -> out\n"
        );
        assert_eq!(bla.span, LineSpan::new(22, 24));

        let Some(Decl::Func(foo)) = file.decls.iter().find(|d| d.name() == "foo1") else {
            panic!("foo1 not found");
        };
        assert_eq!(foo.doc, "");
    }

    #[test]
    fn test_method_receiver() {
        let file = parse(SAMPLE);
        let Some(Decl::Func(method)) = file.decls.iter().find(|d| d.name() == "DoBla") else {
            panic!("DoBla not found");
        };
        assert_eq!(method.receiver.as_deref(), Some("Blaer"));
        assert_eq!(method.doc, "DoBla is the input port.\n");
    }

    #[test]
    fn test_detached_comment_is_not_doc() {
        let code = "package p\n\n// Detached.\n\nfunc F() {}\n";
        let file = parse(code);
        let Some(Decl::Func(func)) = file.decls.first() else {
            panic!("F not found");
        };
        assert_eq!(func.doc, "");
        assert_eq!(func.span, LineSpan::new(5, 5));
    }

    #[test]
    fn test_syntax_error() {
        let mut parser = GoParser::new().unwrap();
        let result = parser.parse_str("package p\n\nfunc {\n", "broken.go");
        assert!(matches!(result, Err(SyntaxError::ParseError { .. })));
    }
}
