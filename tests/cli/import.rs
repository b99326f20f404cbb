use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_import_dry_run_changes_nothing() -> Result<()> {
    let test = CliTest::with_sample_project()?;
    test.write_file("translations.json", r#"{ "greet": { "da": "Hej!", "en": "Hello" } }"#)?;
    let before = test.read_file("main.i18n")?;

    let output = test.import_command().arg("translations.json").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Would update 1 value(s) in 1 resource(s):\n  - main.i18n\n"), "{}", out);
    assert!(out.contains("Run with --apply to write these changes."));
    assert_eq!(test.read_file("main.i18n")?, before);
    Ok(())
}

#[test]
fn test_import_apply_updates_owning_resource() -> Result<()> {
    let test = CliTest::with_sample_project()?;
    test.write_file("translations.json", r#"{ "greet": { "de": "Hallo" } }"#)?;

    let output = test
        .import_command()
        .args(["translations.json", "--apply"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Wrote 1 file(s)."));

    let resource: Value = serde_json::from_str(&test.read_file("main.i18n")?)?;
    assert_eq!(resource["greet"]["de"], "Hallo");
    assert_eq!(resource["greet"]["da"], "Hej");
    // Scripts are left alone when their resource already exists.
    assert_eq!(
        test.read_file("main.js")?,
        "one.include(\"main.i18n\");\nvar msg = one.tr(\"greet\");\n"
    );
    Ok(())
}

#[test]
fn test_import_apply_creates_resource_next_to_script() -> Result<()> {
    let test = CliTest::with_file("index.html", r#"<script src="js/lib.js"></script>"#)?;
    test.write_file("js/lib.js", "var t = one.tr(\"title\");\n")?;
    test.write_file("t.json", r#"{ "title": { "en": "Title", "da": "Titel" } }"#)?;

    let output = test.import_command().args(["t.json", "--apply", "-v"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("  - js/lib.i18n (new)"), "{}", out);
    assert!(out.contains("resource-created"));

    let resource: Value = serde_json::from_str(&test.read_file("js/lib.i18n")?)?;
    assert_eq!(resource["title"]["da"], "Titel");
    assert_eq!(
        test.read_file("js/lib.js")?,
        "one.include(\"lib.i18n\");\nvar t = one.tr(\"title\");\n"
    );
    Ok(())
}

#[test]
fn test_import_up_to_date() -> Result<()> {
    let test = CliTest::with_sample_project()?;
    test.write_file("t.json", r#"{ "greet": { "da": "Hej" } }"#)?;

    let output = test.import_command().arg("t.json").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("All 1 key(s) are already up to date"));
    Ok(())
}

#[test]
fn test_import_unused_key_is_fatal() -> Result<()> {
    let test = CliTest::with_sample_project()?;
    test.write_file("t.json", r#"{ "nowhere": { "en": "x" } }"#)?;

    let output = test.import_command().args(["t.json", "--apply"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("The key 'nowhere' isn't used anywhere"));
    Ok(())
}

#[test]
fn test_import_missing_file() -> Result<()> {
    let test = CliTest::with_sample_project()?;

    let output = test.import_command().arg("missing.json").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to read translation file"));
    Ok(())
}
