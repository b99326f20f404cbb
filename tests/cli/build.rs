use anyhow::Result;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_build_writes_one_document_per_locale() -> Result<()> {
    let test = CliTest::with_sample_project()?;

    let output = test
        .build_command()
        .args(["--locale", "da", "--locale", "en"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let da = test.read_file("dist/index.da.html")?;
    assert!(da.contains(r#"<html lang="da">"#));
    assert!(da.contains(r#"src="main.da.js""#));
    assert!(da.contains(r#"src="boot.js""#));

    assert_eq!(
        test.read_file("dist/main.da.js")?,
        "one.include(\"main.i18n\");\nvar msg = \"Hej\";\n"
    );
    assert!(test.read_file("dist/main.en.js")?.contains(r#"var msg = "Hello";"#));
    assert_eq!(test.read_file("dist/boot.js")?, "window.one = {};\n");

    // The original document and its rewritten script are not part of the output.
    assert!(!test.exists("dist/index.html"));
    assert!(!test.exists("dist/main.js"));
    // Sources are untouched.
    assert!(test.read_file("main.js")?.contains(r#"one.tr("greet")"#));

    let out = stdout(&output);
    assert!(out.contains("Localized index.da.html"));
    assert!(out.contains("Built 2 document(s) into 2 locale(s) [da, en]"));
    Ok(())
}

#[test]
fn test_build_uses_config_locales_and_output_dir() -> Result<()> {
    let test = CliTest::with_file(
        ".localerc.json",
        r#"{ "locales": ["fr"], "outputDir": "out" }"#,
    )?;
    test.write_file(
        "pages/home.html",
        r#"<html><script src="../js/app.js"></script></html>"#,
    )?;
    test.write_file("js/app.js", r#"var title = one.tr("title", "Welcome");"#)?;

    let output = test.build_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let page = test.read_file("out/pages/home.fr.html")?;
    assert!(page.contains(r#"src="../js/app.fr.js""#));
    assert_eq!(
        test.read_file("out/js/app.fr.js")?,
        r#"var title = "Welcome";"#
    );

    // No value for fr, so the inline fallback is used and reported.
    let out = stdout(&output);
    assert!(out.contains("warning: 1 warning(s) (use -v for details)"));
    Ok(())
}

#[test]
fn test_build_verbose_lists_missing_keys() -> Result<()> {
    let test = CliTest::with_file("index.html", r#"<script src="main.js"></script>"#)?;
    test.write_file("main.js", r#"alert(one.tr("nope"));"#)?;

    let output = test.build_command().args(["-l", "da", "-v"]).output()?;
    assert!(output.status.success());
    assert_eq!(test.read_file("dist/main.da.js")?, r#"alert("[!nope!]");"#);

    let out = stdout(&output);
    assert!(out.contains("warning: Key 'nope' has no value for locale da  missing-key"));
    assert!(out.contains("--> main.da.js"));
    Ok(())
}

#[test]
fn test_build_compiles_pattern_calls() -> Result<()> {
    let test = CliTest::with_file("index.html", r#"<script src="app.js"></script>"#)?;
    test.write_file(
        "app.js",
        "one.include(\"app.i18n\");\nvar a = one.trPattern(\"hi\")(user.name);\nvar f = one.trPattern(\"pair\");\n",
    )?;
    test.write_file(
        "app.i18n",
        r#"{ "hi": { "en": "Hi {0}!" }, "pair": { "en": "{0} and {1}" } }"#,
    )?;

    let output = test.build_command().args(["-l", "en_US"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let script = test.read_file("dist/app.en_US.js")?;
    assert!(script.contains(r#""Hi " + user.name + "!""#), "{}", script);
    assert!(script.contains("function (a0, a1) { return a0 + \" and \" + a1; }"), "{}", script);
    assert!(!script.contains("trPattern"));
    Ok(())
}

#[test]
fn test_build_rewrites_accessed_calls_and_null_values() -> Result<()> {
    let test = CliTest::with_file("index.html", r#"<script src="main.js"></script>"#)?;
    test.write_file(
        "main.js",
        "one.include(\"main.i18n\");\nvar price = one.tr(\"price\").toFixed(2);\nvar title = one.tr(\"title\", \"Welcome\");\n",
    )?;
    test.write_file(
        "main.i18n",
        r#"{"price": {"fr": 5}, "title": {"fr": null}}"#,
    )?;

    let output = test.build_command().args(["-l", "fr", "-v"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let script = test.read_file("dist/main.fr.js")?;
    assert!(script.contains("var price = (5).toFixed(2);"));
    assert!(script.contains(r#"var title = "Welcome";"#));

    let out = stdout(&output);
    assert!(out.contains("warning: Key 'title' has no value for locale fr  missing-key"));
    Ok(())
}

#[test]
fn test_build_reports_unparsable_script() -> Result<()> {
    let test = CliTest::with_file("index.html", r#"<script src="main.js"></script>"#)?;
    test.write_file("main.js", "one.include(\"broken.js\");")?;
    test.write_file("broken.js", "var = ;")?;

    let output = test.build_command().args(["-l", "en", "-v"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("parse-failure"));
    assert!(out.contains("--> broken.js"));
    Ok(())
}

#[test]
fn test_build_failed_document_does_not_stop_others() -> Result<()> {
    let test = CliTest::with_file(
        "bad.html",
        r#"<script id="oneBootstrapper" src="a.js"></script><script id="oneBootstrapper" src="b.js"></script>"#,
    )?;
    test.write_file("a.js", "")?;
    test.write_file("b.js", "")?;
    test.write_file("good.html", r#"<script src="c.js"></script>"#)?;
    test.write_file("c.js", r#"one.tr("x", "X");"#)?;

    let output = test.build_command().args(["-l", "en"]).output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("error: Unexpected number of bootstrapper relations from bad.html: 2"));
    assert!(out.contains("--> bad.html"));
    assert!(test.exists("dist/good.en.html"));
    assert!(!test.exists("dist/bad.en.html"));
    Ok(())
}

#[test]
fn test_build_skips_previous_output() -> Result<()> {
    let test = CliTest::with_sample_project()?;
    test.write_file("dist/index.da.html", "<html lang=\"da\"></html>")?;

    let output = test.build_command().args(["-l", "da"]).output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Built 1 document(s) into 1 locale(s)"));
    assert!(!test.exists("dist/dist/index.da.da.html"));
    Ok(())
}

#[test]
fn test_build_without_locales_is_an_error() -> Result<()> {
    let test = CliTest::with_sample_project()?;

    let output = test.build_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("No locales to build"));
    Ok(())
}

#[test]
fn test_build_rejects_invalid_locale() -> Result<()> {
    let test = CliTest::with_sample_project()?;

    let output = test.build_command().args(["-l", "da__DK"]).output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("da__DK"));
    Ok(())
}

#[test]
fn test_build_with_root_argument() -> Result<()> {
    let test = CliTest::with_sample_project()?;
    let root = test.root().to_path_buf();

    let mut cmd = test.build_command();
    cmd.current_dir(std::env::temp_dir());
    let output = cmd.arg("--root").arg(&root).args(["-l", "da"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.exists("dist/index.da.html"));
    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    assert!(output.status.success());
    let out = stdout(&output);
    for command in ["build", "keys", "import", "init"] {
        assert!(out.contains(command), "missing {} in help", command);
    }
    Ok(())
}
