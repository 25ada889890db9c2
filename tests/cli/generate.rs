use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run, stderr, stdout};

const MODELS: &str = r#"package models

type User struct {
	Name string
}

type Order struct {
	ID int
}

type internalCache struct{}

type Status int

type Repository interface {
	Find(id int) error
}

type Page[T any] struct {
	Items []T
}
"#;

#[test]
fn test_generate_single_exported_struct() -> Result<()> {
    let test = CliTest::with_module("example.com/pkg")?;
    test.write_file(
        "types.go",
        "package pkg\n\ntype Foo struct{}\n\ntype bar struct{}\n",
    )?;

    let mut cmd = test.generate_command();
    cmd.args(["--package", "main", "--stdout"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "// Code generated by beangen; DO NOT EDIT.

package main

import (
\t\"example.com/pkg\"
)

var beanFactory = make(map[string]interface{})

func Init() {
\tbeanFactory[\"example.com/pkg.Foo\"] = new(pkg.Foo)
}

func GetObject(structName string) interface{} {
\treturn beanFactory[structName]
}
"
    );
    assert_eq!(stderr(&output), "");

    Ok(())
}

#[test]
fn test_generate_writes_output_file() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("internal/models/models.go", MODELS)?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "\u{2713} Wrote bean_factory.go (package beans): 2 types from 1 package, 1 Go file scanned\n"
    );

    let generated = test.read_file("bean_factory.go")?;
    assert!(generated.contains("import (\n\t\"example.com/app/internal/models\"\n)\n"));
    assert!(generated.contains(
        "func Init() {
\tbeanFactory[\"example.com/app/internal/models.Order\"] = new(models.Order)
\tbeanFactory[\"example.com/app/internal/models.User\"] = new(models.User)
}
"
    ));
    assert!(!generated.contains("internalCache"));
    assert!(!generated.contains("Status"));
    assert!(!generated.contains("Repository"));
    assert!(!generated.contains("Page"));

    Ok(())
}

#[test]
fn test_regeneration_is_byte_identical() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("b/b.go", "package b\n\ntype Zed struct{}\ntype Alpha struct{}\n")?;
    test.write_file("a/a.go", "package a\n\ntype X struct{}\n")?;
    test.write_file("a/more.go", "package a\n\ntype W struct{}\n")?;

    let mut first = test.generate_command();
    first.args(["-p", "app", "-o", "registry/bean_factory.go"]);
    assert_eq!(run(first)?.status.code(), Some(0));
    let first_output = test.read_file("registry/bean_factory.go")?;

    let mut second = test.generate_command();
    second.args(["-p", "app", "-o", "registry/bean_factory.go"]);
    let output = run(second)?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    assert_eq!(test.read_file("registry/bean_factory.go")?, first_output);
    assert!(first_output.contains(
        "\tbeanFactory[\"example.com/app/a.W\"] = new(a.W)
\tbeanFactory[\"example.com/app/a.X\"] = new(a.X)
\tbeanFactory[\"example.com/app/b.Alpha\"] = new(b.Alpha)
\tbeanFactory[\"example.com/app/b.Zed\"] = new(b.Zed)
"
    ));

    Ok(())
}

#[test]
fn test_strategies_produce_identical_output() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("internal/models/models.go", MODELS)?;
    test.write_file("api/models/dto.go", "package models\n\ntype Request struct{}\n")?;

    for layout in ["global", "injected"] {
        let mut outputs = Vec::new();
        for strategy in ["text", "syntax"] {
            let mut cmd = test.generate_command();
            cmd.args(["-p", "beans", "--stdout", "--strategy", strategy, "--layout", layout]);
            let output = run(cmd)?;
            assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
            outputs.push(stdout(&output));
        }
        assert_eq!(outputs[0], outputs[1], "layout {}", layout);
    }

    Ok(())
}

#[test]
fn test_duplicate_package_names_are_aliased() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("internal/models/models.go", MODELS)?;
    test.write_file("api/models/dto.go", "package models\n\ntype Request struct{}\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout"]);
    let output = run(cmd)?;

    let generated = stdout(&output);
    assert!(generated.contains(
        "import (
\t\"example.com/app/api/models\"
\tmodels2 \"example.com/app/internal/models\"
)
"
    ));
    assert!(
        generated.contains("beanFactory[\"example.com/app/internal/models.User\"] = new(models2.User)")
    );

    Ok(())
}

#[test]
fn test_injected_layout() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("a/a.go", "package a\n\ntype X struct{}\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout", "--layout", "injected"]);
    let output = run(cmd)?;

    let generated = stdout(&output);
    assert!(!generated.contains("func Init()"));
    assert!(generated.contains(
        "func NewBeanFactory() BeanFactory {
\tbeanFactory := make(BeanFactory)
\tbeanFactory[\"example.com/app/a.X\"] = new(a.X)
\treturn beanFactory
}
"
    ));

    Ok(())
}

#[test]
fn test_package_from_environment() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("a/a.go", "package a\n\ntype X struct{}\n")?;

    let mut cmd = test.generate_command();
    cmd.arg("--stdout").env("GOPACKAGE", "fromenv");
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("\npackage fromenv\n"));

    Ok(())
}

#[test]
fn test_config_file_settings() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("a/a.go", "package a\n\ntype X struct{}\n")?;
    test.write_file(
        ".beangen.json",
        r#"{ "package": "wiring", "output": "gen/wiring.go", "strategy": "syntax" }"#,
    )?;

    let output = run(test.generate_command())?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let generated = test.read_file("gen/wiring.go")?;
    assert!(generated.contains("\npackage wiring\n"));

    Ok(())
}

#[test]
fn test_missing_package_is_usage_error() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("a/a.go", "package a\n\ntype X struct{}\n")?;

    let output = run(test.generate_command())?;

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("no target package"), "{}", err);
    assert!(err.contains("Usage:"), "{}", err);
    assert!(!test.root().join("bean_factory.go").exists());

    Ok(())
}

#[test]
fn test_invalid_package_name() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "my-beans"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("'my-beans' is not a valid Go package identifier"));
    assert!(!test.root().join("bean_factory.go").exists());

    Ok(())
}

#[test]
fn test_syntax_error_aborts_without_output() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("a/a.go", "package a\n\ntype X struct{}\n")?;
    test.write_file("b/b.go", "package b\n\ntype Broken struct {\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.starts_with("Error: Syntax error in "), "{}", err);
    assert!(err.contains("b.go"), "{}", err);
    assert!(!test.root().join("bean_factory.go").exists());

    Ok(())
}

#[test]
fn test_multiple_packages_in_one_directory() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("a/one.go", "package one\n")?;
    test.write_file("a/two.go", "package two\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("2 packages found in"));
    assert_eq!(stdout(&output), "");

    Ok(())
}

#[test]
fn test_build_ignored_helper_is_not_part_of_package() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("models/user.go", "package models\n\ntype User struct{}\n")?;
    test.write_file(
        "models/gen.go",
        "//go:build ignore\n\npackage main\n\ntype Generator struct{}\n",
    )?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let generated = stdout(&output);
    assert!(generated.contains("beanFactory[\"example.com/app/models.User\"] = new(models.User)"));
    assert!(!generated.contains("Generator"));

    Ok(())
}

#[test]
fn test_output_inside_scanned_package() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("app.go", "package app\n\ntype Service struct{}\n")?;
    test.write_file("models/user.go", "package models\n\ntype User struct{}\n")?;

    for strategy in ["text", "syntax"] {
        let mut cmd = test.generate_command();
        cmd.args(["--strategy", strategy]).env("GOPACKAGE", "app");
        let output = run(cmd)?;
        assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

        let generated = test.read_file("bean_factory.go")?;
        assert!(generated.contains(
            "import (
\t\"example.com/app/models\"
)
"
        ));
        assert!(generated.contains("\tbeanFactory[\"example.com/app.Service\"] = new(Service)\n"));
    }

    Ok(())
}

#[test]
fn test_output_inside_other_package_fails() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("app.go", "package app\n\ntype Service struct{}\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("holds package 'app'"));
    assert!(!test.root().join("bean_factory.go").exists());

    Ok(())
}

#[test]
fn test_main_packages_are_skipped() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("cmd/server/main.go", "package main\n\ntype Options struct{}\n")?;
    test.write_file("a/a.go", "package a\n\ntype X struct{}\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout", "--verbose"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(!stdout(&output).contains("cmd/server"));
    assert!(stderr(&output).contains(
        "note: Skipping example.com/app/cmd/server: package main cannot be imported"
    ));

    Ok(())
}

#[test]
fn test_no_module() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a/a.go", "package a\n\ntype X struct{}\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("No go.mod found"));

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout", "--module-path", "example.com/flat"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("beanFactory[\"example.com/flat/a.X\"] = new(a.X)"));

    Ok(())
}

#[test]
fn test_nested_module_collision() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("x/x.go", "package x\n\ntype First struct{}\n")?;
    test.write_file("y/go.mod", "module example.com/app/x\n")?;
    test.write_file("y/y.go", "package x\n\ntype Second struct{}\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr(&output).contains("Package path 'example.com/app/x' is declared by both"),
        "{}",
        stderr(&output)
    );

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout", "--on-collision", "last-wins"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let generated = stdout(&output);
    assert!(generated.contains("beanFactory[\"example.com/app/x.Second\"] = new(x.Second)"));
    assert!(!generated.contains("First"));

    Ok(())
}

#[test]
fn test_ignored_directories_and_test_files() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;
    test.write_file("a/a.go", "package a\n\ntype X struct{}\n")?;
    test.write_file("a/a_test.go", "package a\n\ntype Fixture struct{}\n")?;
    test.write_file("a/testdata/t.go", "package broken {\n")?;
    test.write_file("_scratch/s.go", "package scratch\n\ntype Hidden struct{}\n")?;
    test.write_file(".cache/c.go", "package cache\n\ntype Hidden struct{}\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let generated = stdout(&output);
    assert!(generated.contains("new(a.X)"));
    assert!(!generated.contains("Fixture"));
    assert!(!generated.contains("Hidden"));

    Ok(())
}

#[test]
fn test_empty_tree() -> Result<()> {
    let test = CliTest::with_module("example.com/empty")?;
    test.write_file("docs/README.md", "# nothing here\n")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--stdout"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let generated = stdout(&output);
    assert!(generated.contains("import (\n)\n"));
    assert!(generated.contains("func Init() {\n}\n"));
    assert_eq!(
        stderr(&output),
        "warning: No exported struct types found in 2 directories\n"
    );

    Ok(())
}

#[test]
fn test_missing_root() -> Result<()> {
    let test = CliTest::with_module("example.com/app")?;

    let mut cmd = test.generate_command();
    cmd.args(["-p", "beans", "--root", "does/not/exist"]);
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Path not found"));

    Ok(())
}
