//! A small Go syntax tree: enough structure to splice imports and statements
//! into a skeleton file. Skeleton constructs the generator never edits are
//! kept as source text.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Comment lines before the package clause.
    pub comments: Vec<String>,
    pub package: String,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Import(ImportDecl),
    Func(FuncDecl),
    /// A top-level declaration or comment, printed as written.
    Verbatim(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDecl {
    pub specs: Vec<ImportSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: Option<String>,
    /// Import path without quotes.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,
    /// Everything before the body: `func (r T) Name(params) results`.
    pub signature: String,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Assign { lhs: Expr, rhs: Expr },
    Return(Option<Expr>),
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    /// String literal value, unquoted.
    Str(String),
    Index { x: Box<Expr>, index: Box<Expr> },
    Selector { x: Box<Expr>, sel: String },
    Call { fun: Box<Expr>, args: Vec<Expr> },
    /// Expression text taken from the skeleton.
    Raw(String),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn index(x: Expr, index: Expr) -> Self {
        Expr::Index {
            x: Box::new(x),
            index: Box::new(index),
        }
    }

    pub fn selector(x: Expr, sel: impl Into<String>) -> Self {
        Expr::Selector {
            x: Box::new(x),
            sel: sel.into(),
        }
    }

    pub fn call(fun: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            fun: Box::new(fun),
            args,
        }
    }
}

impl File {
    pub fn import_decl_mut(&mut self) -> Option<&mut ImportDecl> {
        self.decls.iter_mut().find_map(|decl| match decl {
            Decl::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn func_mut(&mut self, name: &str) -> Option<&mut FuncDecl> {
        self.decls.iter_mut().find_map(|decl| match decl {
            Decl::Func(func) if func.name == name => Some(func),
            _ => None,
        })
    }
}

impl FuncDecl {
    /// Insert `stmt` ahead of a trailing `return`, or append it.
    pub fn push_stmt(&mut self, stmt: Stmt) {
        match self.body.last() {
            Some(Stmt::Return(_)) => {
                let at = self.body.len() - 1;
                self.body.insert(at, stmt);
            }
            _ => self.body.push(stmt),
        }
    }
}
