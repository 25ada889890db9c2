use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const GENERATED_HEADER: &str = "// Code generated by beangen; DO NOT EDIT.";

/// Name of the map that registrations are written into.
pub const FACTORY_VAR: &str = "beanFactory";

const GLOBAL_SKELETON: &str = r#"// Code generated by beangen; DO NOT EDIT.

package skeleton

import (
)

var beanFactory = make(map[string]interface{})

func Init() {
}

func GetObject(structName string) interface{} {
	return beanFactory[structName]
}
"#;

const INJECTED_SKELETON: &str = r#"// Code generated by beangen; DO NOT EDIT.

package skeleton

import (
)

type BeanFactory map[string]interface{}

func NewBeanFactory() BeanFactory {
	beanFactory := make(BeanFactory)
	return beanFactory
}

func (f BeanFactory) GetObject(structName string) interface{} {
	return f[structName]
}
"#;

/// Shape of the generated Go API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Package-level `beanFactory` map filled by `Init()`, read by `GetObject`.
    #[default]
    Global,
    /// No package state: `NewBeanFactory()` returns a filled `BeanFactory`
    /// value with a `GetObject` method.
    Injected,
}

impl Layout {
    /// Source the syntax strategy starts from.
    pub fn skeleton(self) -> &'static str {
        match self {
            Layout::Global => GLOBAL_SKELETON,
            Layout::Injected => INJECTED_SKELETON,
        }
    }

    /// Function whose body receives the registration statements.
    pub fn init_func(self) -> &'static str {
        match self {
            Layout::Global => "Init",
            Layout::Injected => "NewBeanFactory",
        }
    }

    /// Declaration between the import block and the init function.
    pub(crate) fn factory_decl(self) -> &'static str {
        match self {
            Layout::Global => "var beanFactory = make(map[string]interface{})\n",
            Layout::Injected => "type BeanFactory map[string]interface{}\n",
        }
    }

    /// Init function up to and including the first statement line, if any.
    pub(crate) fn init_open(self) -> &'static str {
        match self {
            Layout::Global => "func Init() {\n",
            Layout::Injected => "func NewBeanFactory() BeanFactory {\n\tbeanFactory := make(BeanFactory)\n",
        }
    }

    pub(crate) fn init_close(self) -> &'static str {
        match self {
            Layout::Global => "}\n",
            Layout::Injected => "\treturn beanFactory\n}\n",
        }
    }

    pub(crate) fn lookup_func(self) -> &'static str {
        match self {
            Layout::Global => {
                "func GetObject(structName string) interface{} {\n\treturn beanFactory[structName]\n}\n"
            }
            Layout::Injected => {
                "func (f BeanFactory) GetObject(structName string) interface{} {\n\treturn f[structName]\n}\n"
            }
        }
    }
}
