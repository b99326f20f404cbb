use anyhow::Result;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_keys_lists_defined_locales() -> Result<()> {
    let test = CliTest::with_sample_project()?;

    let output = test.keys_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("index.html (1 key(s))"));
    assert!(out.contains("  greet  da, en"));
    Ok(())
}

#[test]
fn test_keys_for_locale_shows_values_and_missing() -> Result<()> {
    let test = CliTest::with_sample_project()?;
    test.write_file(
        "main.js",
        "one.include(\"main.i18n\");\nvar a = one.tr(\"greet\");\nvar b = one.tr(\"farewell\");\n",
    )?;
    test.write_file(
        "main.i18n",
        r#"{ "greet": { "da": "Hej" }, "legacy": { "da": "Gammel" } }"#,
    )?;

    let output = test.keys_command().args(["--locale", "da_DK"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("index.html (3 key(s))"), "{}", out);
    assert!(out.contains("  farewell  (missing)\n"), "{}", out);
    assert!(out.contains("  greet     \"Hej\"\n"), "{}", out);
    assert!(out.contains("  legacy    \"Gammel\"  (unused)\n"), "{}", out);
    assert!(out.contains("warning: 1 warning(s)"));
    Ok(())
}

#[test]
fn test_keys_reports_duplicate_keys_per_document() -> Result<()> {
    let test = CliTest::with_sample_project()?;
    test.write_file(
        "main.js",
        "one.include(\"main.i18n\");\none.include(\"other.i18n\");\none.tr(\"greet\");\n",
    )?;
    test.write_file("other.i18n", r#"{ "greet": { "en": "Hi" } }"#)?;

    let output = test.keys_command().args(["-l", "en"]).output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("error: The key 'greet' was found in multiple translation resources"));
    Ok(())
}

#[test]
fn test_keys_rejects_invalid_locale() -> Result<()> {
    let test = CliTest::with_sample_project()?;

    let output = test.keys_command().args(["--locale", "not a locale"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid locale id"));
    Ok(())
}
