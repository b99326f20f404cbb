use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod build;
mod import;
mod init;
mod keys;

const BIN_NAME: &str = "localeclone";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stops the config lookup from walking above the project.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn build_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("build");
        cmd
    }

    pub fn keys_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("keys");
        cmd
    }

    pub fn import_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("import");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.project_dir.join(path).exists()
    }

    /// A one-page project: a bootstrapper, a script with translation calls
    /// and its translation resource.
    pub fn with_sample_project() -> Result<Self> {
        let test = Self::new()?;
        test.write_file(
            "index.html",
            r#"<!DOCTYPE html>
<html>
<head>
  <script id="oneBootstrapper" src="boot.js"></script>
  <script src="main.js"></script>
</head>
</html>
"#,
        )?;
        test.write_file("boot.js", "window.one = {};\n")?;
        test.write_file(
            "main.js",
            "one.include(\"main.i18n\");\nvar msg = one.tr(\"greet\");\n",
        )?;
        test.write_file(
            "main.i18n",
            r#"{
  "greet": {
    "en": "Hello",
    "da": "Hej"
  }
}
"#,
        )?;
        Ok(test)
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
