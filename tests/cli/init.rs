use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Created"));

    let content = test.read_file(".goprintenv.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["tagKey"], "env");
    assert_eq!(parsed["prefixFlag"], "prefix");
    assert_eq!(parsed["defaultFlag"], "default");
    assert_eq!(parsed["vendorDir"], "vendor");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".goprintenv.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("already exists"));

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::module()?;
    test.command().arg("init").output()?;
    test.write_file(
        "config.go",
        "package app\n\ntype Config struct {\n    Debug bool `env:\"DEBUG,default=false\"`\n}\n",
    )?;

    let output = test.command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "DEBUG=false\n");

    Ok(())
}
