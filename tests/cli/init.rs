use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Created .beangen.json"));
    assert!(test.root().join(".beangen.json").exists());

    let content = test.read_file(".beangen.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["output"], "bean_factory.go");
    assert_eq!(parsed["strategy"], "text");
    assert_eq!(parsed["layout"], "global");
    assert_eq!(parsed["onCollision"], "reject");
    assert!(parsed.get("package").is_none());
    assert!(content.contains("  "), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".beangen.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    let output = run(cmd)?;

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "Error: .beangen.json already exists\n");
    assert_eq!(test.read_file(".beangen.json")?, "{}");

    Ok(())
}
