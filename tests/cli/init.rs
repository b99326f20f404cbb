use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["documents", "locales", "defaultLanguage", "namespace", "outputDir"] {
        assert!(parsed.get(field).is_some(), "Config should have '{}' field", field);
    }
    assert_eq!(parsed["namespace"], "one");
    assert_eq!(parsed["resourceSuffix"], ".i18n");

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Created .localerc.json"));

    assert!(test.root().join(".localerc.json").exists());
    let content = test.read_file(".localerc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".localerc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("error: .localerc.json already exists"));
    assert_eq!(test.read_file(".localerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;

    let output = test.build_command().args(["--locale", "da"]).output()?;
    assert!(
        output.status.success(),
        "Build should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("No documents matched"));

    Ok(())
}
