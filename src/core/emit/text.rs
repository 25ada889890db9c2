use std::fmt::Write as _;

use super::{
    FACTORY_VAR, GENERATED_HEADER, Import, Layout, Registration, RegistryBuilder,
    go_string_literal,
};
use crate::core::error::EmitError;

/// Builds the registry file by writing formatted text.
pub struct TextBuilder {
    layout: Layout,
    package: String,
    imports: Vec<Import>,
    registrations: Vec<Registration>,
}

impl TextBuilder {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            package: String::new(),
            imports: Vec::new(),
            registrations: Vec::new(),
        }
    }
}

impl RegistryBuilder for TextBuilder {
    fn package(&mut self, name: &str) -> Result<(), EmitError> {
        self.package = name.to_string();
        Ok(())
    }

    fn import(&mut self, import: &Import) -> Result<(), EmitError> {
        self.imports.push(import.clone());
        Ok(())
    }

    fn register(&mut self, registration: &Registration) -> Result<(), EmitError> {
        self.registrations.push(registration.clone());
        Ok(())
    }

    fn finish(self) -> Result<String, EmitError> {
        let mut out = String::new();

        writeln!(out, "{}", GENERATED_HEADER)?;
        writeln!(out)?;
        writeln!(out, "package {}", self.package)?;
        writeln!(out)?;

        writeln!(out, "import (")?;
        for import in &self.imports {
            match &import.alias {
                Some(alias) => writeln!(out, "\t{} {}", alias, go_string_literal(&import.path))?,
                None => writeln!(out, "\t{}", go_string_literal(&import.path))?,
            }
        }
        writeln!(out, ")")?;
        writeln!(out)?;

        out.push_str(self.layout.factory_decl());
        writeln!(out)?;

        out.push_str(self.layout.init_open());
        for r in &self.registrations {
            let key = go_string_literal(&r.key);
            match &r.qualifier {
                Some(qualifier) => writeln!(
                    out,
                    "\t{}[{}] = new({}.{})",
                    FACTORY_VAR, key, qualifier, r.type_name
                )?,
                None => writeln!(out, "\t{}[{}] = new({})", FACTORY_VAR, key, r.type_name)?,
            }
        }
        out.push_str(self.layout.init_close());
        writeln!(out)?;

        out.push_str(self.layout.lookup_func());
        Ok(out)
    }
}
