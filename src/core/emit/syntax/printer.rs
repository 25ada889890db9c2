//! gofmt-style rendering of the syntax tree: tabs for indentation, one blank
//! line between top-level declarations.

use std::fmt::{self, Display, Formatter, Write as _};

use super::ast::{Decl, Expr, File, FuncDecl, ImportDecl, ImportSpec, Stmt};
use crate::core::{emit::go_string_literal, error::EmitError};

/// Render `file` to source text. A file needs its package clause.
pub fn print(file: &File) -> Result<String, EmitError> {
    if file.package.is_empty() {
        return Err(EmitError::MissingPackage);
    }
    let mut out = String::new();
    write!(out, "{}", file)?;
    Ok(out)
}

impl Display for File {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for comment in &self.comments {
            writeln!(f, "{}", comment)?;
        }
        if !self.comments.is_empty() {
            writeln!(f)?;
        }
        writeln!(f, "package {}", self.package)?;
        for decl in &self.decls {
            writeln!(f)?;
            write!(f, "{}", decl)?;
        }
        Ok(())
    }
}

impl Display for Decl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Decl::Import(import) => write!(f, "{}", import),
            Decl::Func(func) => write!(f, "{}", func),
            Decl::Verbatim(text) => writeln!(f, "{}", text),
        }
    }
}

impl Display for ImportDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "import (")?;
        for spec in &self.specs {
            writeln!(f, "\t{}", spec)?;
        }
        writeln!(f, ")")
    }
}

impl Display for ImportSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{} ", name)?;
        }
        write!(f, "{}", go_string_literal(&self.path))
    }
}

impl Display for FuncDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.signature)?;
        for stmt in &self.body {
            writeln!(f, "\t{}", stmt)?;
        }
        writeln!(f, "}}")
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Assign { lhs, rhs } => write!(f, "{} = {}", lhs, rhs),
            Stmt::Return(Some(expr)) => write!(f, "return {}", expr),
            Stmt::Return(None) => write!(f, "return"),
            Stmt::Verbatim(text) => write!(f, "{}", text),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Str(value) => write!(f, "{}", go_string_literal(value)),
            Expr::Index { x, index } => write!(f, "{}[{}]", x, index),
            Expr::Selector { x, sel } => write!(f, "{}.{}", x, sel),
            Expr::Call { fun, args } => {
                write!(f, "{}(", fun)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Raw(text) => write!(f, "{}", text),
        }
    }
}
