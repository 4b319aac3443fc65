//! Go source parser built on tree-sitter.
//!
//! Only the structural facts needed for flattening are extracted: the package
//! clause, import specs, and exported struct declarations with their exported,
//! tagged fields. Struct declarations are collected at any depth, including
//! types declared inside function bodies.

use std::path::Path;

use tree_sitter::{Node, Parser};

use crate::core::{
    annotation::unquote,
    data::{Field, Import, is_exported},
    error::{AnalysisError, Result},
};

/// Raw facts extracted from one Go file, before a package identity is assigned.
#[derive(Debug, Default)]
pub struct ParsedGoFile {
    pub package_name: String,
    pub imports: Vec<Import>,
    pub records: Vec<ParsedRecord>,
}

#[derive(Debug)]
pub struct ParsedRecord {
    pub name: String,
    pub fields: Vec<Field>,
}

/// Parse Go source code.
///
/// Any syntax error in the tree fails the whole file.
pub fn parse_go_source(code: &str, file_path: &Path) -> Result<ParsedGoFile> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into())?;

    let tree = parser.parse(code, None).ok_or_else(|| AnalysisError::Parse {
        path: file_path.to_path_buf(),
        message: "parser produced no tree".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let message = first_error(root)
            .map(|node| {
                let pos = node.start_position();
                format!("syntax error at {}:{}", pos.row + 1, pos.column + 1)
            })
            .unwrap_or_else(|| "syntax error".to_string());
        return Err(AnalysisError::Parse {
            path: file_path.to_path_buf(),
            message,
        });
    }

    let mut parsed = ParsedGoFile::default();
    let source = code.as_bytes();
    visit(root, source, &mut parsed);
    Ok(parsed)
}

/// Depth-first walk in source order.
fn visit(node: Node, source: &[u8], out: &mut ParsedGoFile) {
    match node.kind() {
        "package_clause" => {
            let mut cursor = node.walk();
            if let Some(ident) = node
                .named_children(&mut cursor)
                .find(|child| child.kind() == "package_identifier")
            {
                out.package_name = text(ident, source).to_string();
            }
            return;
        }
        "import_spec" => {
            if let Some(import) = extract_import(node, source) {
                out.imports.push(import);
            }
            return;
        }
        "type_spec" => {
            if let Some(record) = extract_record(node, source) {
                out.records.push(record);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, source, out);
    }
}

fn extract_import(node: Node, source: &[u8]) -> Option<Import> {
    let path = string_literal_value(node.child_by_field_name("path")?, source)?;
    let alias = node
        .child_by_field_name("name")
        .map(|n| text(n, source))
        .filter(|name| *name != "_" && *name != ".")
        .map(str::to_string);

    Some(Import { path, alias })
}

/// Exported `type X struct { ... }` with at least one retained field.
fn extract_record(node: Node, source: &[u8]) -> Option<ParsedRecord> {
    let name = text(node.child_by_field_name("name")?, source);
    if !is_exported(name) {
        return None;
    }

    let struct_type = node.child_by_field_name("type")?;
    if struct_type.kind() != "struct_type" {
        return None;
    }

    let mut cursor = struct_type.walk();
    let field_list = struct_type
        .named_children(&mut cursor)
        .find(|child| child.kind() == "field_declaration_list")?;

    let mut fields = Vec::new();
    let mut cursor = field_list.walk();
    for decl in field_list.named_children(&mut cursor) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        if let Some(field) = extract_field(decl, source) {
            fields.push(field);
        }
    }

    if fields.is_empty() {
        return None;
    }

    Some(ParsedRecord {
        name: name.to_string(),
        fields,
    })
}

/// Named, exported field with a non-empty tag. Embedded fields have no
/// `name` child and are skipped; for `A, B T` only `A` is kept.
fn extract_field(decl: Node, source: &[u8]) -> Option<Field> {
    let name = text(decl.child_by_field_name("name")?, source);
    if !is_exported(name) {
        return None;
    }

    let type_text = text(decl.child_by_field_name("type")?, source);
    let tag = string_literal_value(decl.child_by_field_name("tag")?, source)?;
    if tag.is_empty() {
        return None;
    }

    Some(Field::new(name, type_text, tag))
}

/// Content of a raw (backtick) or interpreted (double-quoted) string literal.
fn string_literal_value(node: Node, source: &[u8]) -> Option<String> {
    let raw = text(node, source);
    match node.kind() {
        "raw_string_literal" => Some(raw.trim_matches('`').to_string()),
        "interpreted_string_literal" => {
            let body = raw.strip_prefix('"')?.strip_suffix('"')?;
            unquote(body)
        }
        _ => None,
    }
}

fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}
