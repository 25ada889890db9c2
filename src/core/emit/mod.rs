//! Generated Go source for a [`Registry`].
//!
//! The registry walk lives in [`emit_registry`] and is independent of how the
//! output is built. Builders implement [`RegistryBuilder`]:
//!
//! - `text`: composes the file directly as formatted text
//! - `syntax`: parses a skeleton file, splices nodes into its syntax tree and
//!   prints the tree
//!
//! Both produce the same bytes for the same registry and [`Layout`].

mod layout;
pub mod syntax;
pub mod text;

use std::collections::HashSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use layout::{FACTORY_VAR, GENERATED_HEADER, Layout};
pub use syntax::SyntaxTreeBuilder;
pub use text::TextBuilder;

use crate::core::{
    error::EmitError,
    registry::{Registry, make_registry_key},
};

/// How the generated file is put together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Write the source text directly.
    #[default]
    Text,
    /// Mutate the syntax tree of a parsed skeleton, then print it.
    Syntax,
}

/// One entry of the generated import block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    /// Set when the package name is already taken by an earlier import.
    pub alias: Option<String>,
}

/// One `beanFactory["<key>"] = new(<qualifier>.<type_name>)` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub key: String,
    /// `None` for types of the package the generated file itself joins.
    pub qualifier: Option<String>,
    pub type_name: String,
}

/// Receives the pieces of a generated registry in output order:
/// `package`, every `import`, every `register`, then `finish`.
pub trait RegistryBuilder {
    fn package(&mut self, name: &str) -> Result<(), EmitError>;

    fn import(&mut self, import: &Import) -> Result<(), EmitError>;

    fn register(&mut self, registration: &Registration) -> Result<(), EmitError>;

    fn finish(self) -> Result<String, EmitError>;
}

/// Feed `registry` to `builder` in a stable order: import paths sorted, and
/// type names sorted within each package.
pub fn emit_registry<B: RegistryBuilder>(
    registry: &Registry,
    package: &str,
    builder: B,
) -> Result<String, EmitError> {
    emit_registry_in(registry, package, None, builder)
}

/// Like [`emit_registry`], for a file written into the scanned package at
/// `home`. Go forbids a package importing itself, so that package's types are
/// registered unqualified and it gets no import.
pub fn emit_registry_in<B: RegistryBuilder>(
    registry: &Registry,
    package: &str,
    home: Option<&str>,
    mut builder: B,
) -> Result<String, EmitError> {
    if package.is_empty() {
        return Err(EmitError::MissingPackage);
    }
    if !is_go_identifier(package) {
        return Err(EmitError::InvalidIdentifier(package.to_string()));
    }
    builder.package(package)?;

    let mut taken: HashSet<String> = RESERVED_NAMES.iter().map(|s| s.to_string()).collect();
    let mut qualifiers = Vec::with_capacity(registry.len());
    for (path, unit) in registry.iter() {
        if home == Some(path) {
            if unit.package != package {
                return Err(EmitError::PackageMismatch {
                    dir: unit.dir.clone(),
                    found: unit.package.clone(),
                    expected: package.to_string(),
                });
            }
            qualifiers.push(None);
            continue;
        }
        if !is_go_identifier(&unit.package) {
            return Err(EmitError::InvalidIdentifier(unit.package.clone()));
        }
        let qualifier = unique_qualifier(&unit.package, &taken);
        let alias = (qualifier != unit.package).then(|| qualifier.clone());
        taken.insert(qualifier.clone());

        builder.import(&Import {
            path: path.to_string(),
            alias,
        })?;
        qualifiers.push(Some(qualifier));
    }

    for ((path, unit), qualifier) in registry.iter().zip(&qualifiers) {
        let mut types = unit.types.clone();
        types.sort();
        types.dedup();
        for type_name in types {
            builder.register(&Registration {
                key: make_registry_key(path, &type_name),
                qualifier: qualifier.clone(),
                type_name,
            })?;
        }
    }

    builder.finish()
}

/// Generate the registry source with the chosen strategy.
pub fn emit(
    registry: &Registry,
    package: &str,
    strategy: Strategy,
    layout: Layout,
) -> Result<String, EmitError> {
    emit_in(registry, package, None, strategy, layout)
}

/// [`emit`] for a file that joins the scanned package at `home`.
pub fn emit_in(
    registry: &Registry,
    package: &str,
    home: Option<&str>,
    strategy: Strategy,
    layout: Layout,
) -> Result<String, EmitError> {
    match strategy {
        Strategy::Text => emit_registry_in(registry, package, home, TextBuilder::new(layout)),
        Strategy::Syntax => {
            emit_registry_in(registry, package, home, SyntaxTreeBuilder::new(layout)?)
        }
    }
}

fn unique_qualifier(package: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(package) {
        return package.to_string();
    }
    (2..)
        .map(|n| format!("{}{}", package, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| package.to_string())
}

/// Names the generated file declares or calls; an import may not shadow them.
const RESERVED_NAMES: &[&str] = &[
    FACTORY_VAR,
    "new",
    "make",
    "Init",
    "GetObject",
    "BeanFactory",
    "NewBeanFactory",
];

const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Go identifier that can name a package: letter or `_` first, then letters,
/// digits or `_`; not a keyword and not the blank identifier.
pub fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && name != "_"
        && !GO_KEYWORDS.contains(&name)
}

/// Double-quoted Go string literal for `value`.
pub fn go_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
