//! Selection of the declarations a bean factory can construct.

use crate::core::{error::ParseError, parsers::go::Declaration, source_file::SourceFile};

/// Whether `new(pkg.Name)` is valid for this declaration from outside its package:
/// an exported, non-generic struct type.
pub fn is_registrable(decl: &Declaration) -> bool {
    decl.is_struct() && decl.is_exported() && !decl.generic
}

/// Names of the exported struct types declared at the top level of `file`, in source order.
pub fn exported_struct_names(file: &SourceFile) -> Result<Vec<String>, ParseError> {
    Ok(file
        .declarations()?
        .iter()
        .filter(|decl| is_registrable(decl))
        .map(|decl| decl.name.clone())
        .collect())
}
