use std::{fs, path::Path};

use anyhow::Result;

use super::helper::finish;
use super::{CommandError, CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};
use crate::core::Diagnostics;

pub fn init() -> Result<CommandResult> {
    let config_path = Path::new(CONFIG_FILE_NAME);

    if config_path.exists() {
        return Ok(finish(
            CommandSummary::Init(InitSummary { created: false }),
            Diagnostics::new(),
            vec![CommandError {
                asset: None,
                message: format!("{} already exists", CONFIG_FILE_NAME),
            }],
            true,
        ));
    }

    fs::write(config_path, default_config_json()?)?;
    Ok(finish(
        CommandSummary::Init(InitSummary { created: true }),
        Diagnostics::new(),
        Vec::new(),
        true,
    ))
}
