//! Conversion of a parsed Go file into the editable syntax tree.

use std::path::Path;

use tree_sitter::Node;

use super::ast::{Decl, Expr, File, FuncDecl, ImportDecl, ImportSpec, Stmt};
use crate::core::{
    error::EmitError,
    parsers::go::{find_child_by_kind, parse_go_tree},
};

/// Parse `source` and lower it into a [`File`].
///
/// Only import declarations and function bodies get structure; everything
/// else is carried as source text.
pub fn lower_source(source: &str, name: &str) -> Result<File, EmitError> {
    let tree = parse_go_tree(source, Path::new(name))?;
    let root = tree.root_node();

    let mut comments = Vec::new();
    let mut package = None;
    let mut decls = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "comment" if package.is_none() => {
                comments.push(node_text(child, source).to_string());
            }
            "package_clause" => {
                package = find_child_by_kind(child, "package_identifier")
                    .map(|ident| node_text(ident, source).to_string());
            }
            "import_declaration" => decls.push(Decl::Import(lower_import(child, source))),
            "function_declaration" | "method_declaration" => {
                decls.push(Decl::Func(lower_func(child, source)?));
            }
            _ if child.is_named() => {
                decls.push(Decl::Verbatim(node_text(child, source).to_string()));
            }
            _ => {}
        }
    }

    Ok(File {
        comments,
        package: package.ok_or(EmitError::Skeleton("a package clause"))?,
        decls,
    })
}

fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

fn lower_import(node: Node, source: &str) -> ImportDecl {
    let mut specs = Vec::new();
    collect_import_specs(node, source, &mut specs);
    ImportDecl { specs }
}

/// Import specs sit directly under the declaration or inside an `import_spec_list`.
fn collect_import_specs(node: Node, source: &str, out: &mut Vec<ImportSpec>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                let field = |name: &str| {
                    child
                        .child_by_field_name(name)
                        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                };
                if let Some(path) = field("path") {
                    out.push(ImportSpec {
                        name: field("name").map(str::to_string),
                        path: path.trim_matches(|c: char| c == '"' || c == '`').to_string(),
                    });
                }
            }
            "import_spec_list" => collect_import_specs(child, source, out),
            _ => {}
        }
    }
}

fn lower_func(node: Node, source: &str) -> Result<FuncDecl, EmitError> {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
        .ok_or(EmitError::Skeleton("a function name"))?
        .to_string();

    let Some(body) = node.child_by_field_name("body") else {
        return Err(EmitError::Skeleton("a function body"));
    };

    let signature = source[node.start_byte()..body.start_byte()]
        .trim_end()
        .to_string();

    let mut stmts = Vec::new();
    collect_statements(body, source, &mut stmts);

    Ok(FuncDecl {
        name,
        signature,
        body: stmts,
    })
}

/// Block statements, flattening the `statement_list` wrapper newer grammars emit.
fn collect_statements(block: Node, source: &str, out: &mut Vec<Stmt>) {
    let mut cursor = block.walk();
    for child in block.named_children(&mut cursor) {
        let text = node_text(child, source);
        match child.kind() {
            "statement_list" => collect_statements(child, source, out),
            "return_statement" => {
                let value = text.trim_start_matches("return").trim();
                out.push(Stmt::Return(
                    (!value.is_empty()).then(|| Expr::Raw(value.to_string())),
                ));
            }
            _ => out.push(Stmt::Verbatim(text.to_string())),
        }
    }
}
