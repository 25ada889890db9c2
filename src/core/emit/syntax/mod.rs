//! Registry emission by syntax-tree mutation.
//!
//! The layout's skeleton is parsed once per builder, then imports and
//! registration statements are inserted as nodes and the tree is printed.

pub mod ast;
mod lower;
mod printer;

pub use lower::lower_source;
pub use printer::print;

use ast::{Expr, File, ImportSpec, Stmt};

use super::{FACTORY_VAR, Import, Layout, Registration, RegistryBuilder};
use crate::core::error::EmitError;

/// Builds the registry file by editing the syntax tree of [`Layout::skeleton`].
#[derive(Debug)]
pub struct SyntaxTreeBuilder {
    layout: Layout,
    file: File,
}

impl SyntaxTreeBuilder {
    pub fn new(layout: Layout) -> Result<Self, EmitError> {
        Self::from_skeleton(layout, layout.skeleton())
    }

    /// Start from a custom skeleton; it must have an import declaration and
    /// the layout's init function.
    pub fn from_skeleton(layout: Layout, skeleton: &str) -> Result<Self, EmitError> {
        let mut file = lower_source(skeleton, "skeleton.go")?;
        if file.import_decl_mut().is_none() {
            return Err(EmitError::Skeleton("an import declaration"));
        }
        if file.func_mut(layout.init_func()).is_none() {
            return Err(EmitError::Skeleton("the init function"));
        }
        Ok(Self { layout, file })
    }

    pub fn file(&self) -> &File {
        &self.file
    }
}

impl RegistryBuilder for SyntaxTreeBuilder {
    fn package(&mut self, name: &str) -> Result<(), EmitError> {
        self.file.package = name.to_string();
        Ok(())
    }

    fn import(&mut self, import: &Import) -> Result<(), EmitError> {
        let decl = self
            .file
            .import_decl_mut()
            .ok_or(EmitError::Skeleton("an import declaration"))?;
        decl.specs.push(ImportSpec {
            name: import.alias.clone(),
            path: import.path.clone(),
        });
        Ok(())
    }

    fn register(&mut self, registration: &Registration) -> Result<(), EmitError> {
        let init = self
            .file
            .func_mut(self.layout.init_func())
            .ok_or(EmitError::Skeleton("the init function"))?;
        init.push_stmt(assign_new(registration));
        Ok(())
    }

    fn finish(self) -> Result<String, EmitError> {
        print(&self.file)
    }
}

/// `beanFactory["<key>"] = new(<qualifier>.<Type>)`
fn assign_new(registration: &Registration) -> Stmt {
    let type_name = registration.type_name.as_str();
    let target = match &registration.qualifier {
        Some(qualifier) => Expr::selector(Expr::ident(qualifier.as_str()), type_name),
        None => Expr::ident(type_name),
    };
    Stmt::Assign {
        lhs: Expr::index(
            Expr::ident(FACTORY_VAR),
            Expr::Str(registration.key.clone()),
        ),
        rhs: Expr::call(
            Expr::ident("new"),
            vec![target],
        ),
    }
}
