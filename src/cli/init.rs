//! Init command implementation.
//!
//! Writes a `pixelpress.yaml` with every setting at its default value.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{PressConfig, CONFIG_FILENAME};
use crate::error::{PressError, Result};
use crate::output::{display_path, Printer};

/// Initialize a project by generating a pixelpress.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing pixelpress.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(PressError::Build {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let yaml = PressConfig::default().to_yaml()?;
    fs::write(&config_path, yaml).map_err(|e| PressError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.success("Created", &display_path(&config_path));
    Ok(())
}
