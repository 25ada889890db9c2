use std::{
    cell::OnceCell,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use colored::Colorize;

use crate::{
    cli::args::GenerateArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        emit::{Layout, Strategy, emit_in},
        error::{EmitError, Error},
        registry::{CollisionPolicy, Registry, aggregate, is_main_package},
        unit::{SourceTree, UnitResolver, canonical_file_path},
    },
};

/// Everything one `generate` run needs, with settings merged from the command
/// line, the environment, `.beangen.json` and defaults (in that priority).
///
/// The unit tree is resolved eagerly so directory and package errors surface
/// before any file is parsed. The registry is built on first use.
pub struct GenerateContext {
    /// Merged configuration.
    pub config: Config,

    /// Directory the unit tree was resolved from.
    pub root_dir: PathBuf,

    /// Package clause of the generated file.
    pub package: String,

    pub verbose: bool,

    tree: SourceTree,

    /// Import path of the scanned package the output file lands in.
    home: Option<String>,

    registry: OnceCell<Registry>,
}

impl GenerateContext {
    /// Create a context from command line arguments.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Config file is invalid
    /// - No target package is given anywhere
    /// - The scan root does not resolve (missing, no module path, several
    ///   packages in one directory, unparsable package clause)
    pub fn new(args: &GenerateArgs) -> Result<Self> {
        let verbose = args.common.verbose;

        // Priority: CLI --root > current directory
        let search_dir = args
            .common
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&search_dir)?;
        if verbose && !config_result.from_file {
            eprintln!(
                "{} No {} found, using default configuration",
                "note:".bold().cyan(),
                CONFIG_FILE_NAME
            );
        }

        let config = merge_args(config_result.config, args);

        let Some(package) = config.package.clone().filter(|p| !p.is_empty()) else {
            return Err(Error::from(EmitError::MissingPackage).into());
        };

        let root_dir = match &args.common.root {
            Some(root) => root.clone(),
            None => PathBuf::from(&config.source_root),
        };

        let mut resolver = UnitResolver::new()
            .with_module_path(config.module_path.clone())
            .with_ignores(config.ignore_patterns()?)
            .parallel(config.parallel)
            .verbose(verbose);
        // A previous run's output must not feed back into the scan.
        if !args.stdout {
            resolver = resolver.excluding(Path::new(&config.output));
        }
        let tree = resolver.resolve(&root_dir)?;

        if verbose {
            eprintln!(
                "{} Found {} package director{} with {} Go file{} under {}",
                "note:".bold().cyan(),
                tree.unit_count(),
                if tree.unit_count() == 1 { "y" } else { "ies" },
                tree.file_count(),
                if tree.file_count() == 1 { "" } else { "s" },
                tree.root().dir().display()
            );
        }

        let home = if args.stdout {
            None
        } else {
            home_import_path(&tree, Path::new(&config.output))
        };

        Ok(Self {
            config,
            root_dir,
            package,
            verbose,
            tree,
            home,
            registry: OnceCell::new(),
        })
    }

    pub fn tree(&self) -> &SourceTree {
        &self.tree
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    pub fn layout(&self) -> Layout {
        self.config.layout
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.config.on_collision
    }

    /// Where the generated file goes, relative to the working directory.
    pub fn output_path(&self) -> &Path {
        Path::new(&self.config.output)
    }

    /// Aggregate the unit tree; files were parsed during resolution.
    pub fn registry(&self) -> Result<&Registry> {
        if let Some(registry) = self.registry.get() {
            return Ok(registry);
        }

        let registry = aggregate(self.tree.root(), self.collision_policy())?;

        if self.verbose {
            for unit in self.tree.units().filter(|unit| is_main_package(unit)) {
                eprintln!(
                    "{} Skipping {}: package main cannot be imported",
                    "note:".bold().cyan(),
                    unit.import_path()
                );
            }
            eprintln!(
                "{} Registered {} type{} from {} package{}",
                "note:".bold().cyan(),
                registry.type_count(),
                if registry.type_count() == 1 { "" } else { "s" },
                registry.len(),
                if registry.len() == 1 { "" } else { "s" }
            );
        }

        Ok(self.registry.get_or_init(|| registry))
    }

    /// Render the registry as Go source.
    pub fn emit(&self) -> Result<String> {
        let registry = self.registry()?;
        let source = emit_in(
            registry,
            &self.package,
            self.home.as_deref(),
            self.strategy(),
            self.layout(),
        )
        .map_err(Error::from)
        .with_context(|| format!("Failed to generate package {}", self.package))?;
        Ok(source)
    }
}

/// Import path of the unit whose directory will hold `output`.
fn home_import_path(tree: &SourceTree, output: &Path) -> Option<String> {
    let output = canonical_file_path(output)?;
    let dir = output.parent()?;
    tree.units()
        .find(|unit| unit.dir() == dir)
        .map(|unit| unit.import_path().to_string())
}

/// Apply command line overrides on top of the loaded configuration.
fn merge_args(mut config: Config, args: &GenerateArgs) -> Config {
    if let Some(ref package) = args.package {
        config.package = Some(package.clone());
    }
    if let Some(ref module_path) = args.common.module_path {
        config.module_path = Some(module_path.clone());
    }
    if let Some(ref output) = args.output {
        config.output = output.to_string_lossy().to_string();
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if let Some(policy) = args.on_collision {
        config.on_collision = policy;
    }
    if args.no_parallel {
        config.parallel = false;
    }
    config
}
