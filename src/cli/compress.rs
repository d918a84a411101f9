//! Compress command implementation.
//!
//! Runs the batch pipeline over a directory tree: background removal,
//! block compression, per-file output and per-directory spritesheets.

use std::path::PathBuf;

use clap::Args;

use crate::config::{PressConfig, RemoverKind};
use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::pipeline::{BatchPipeline, Report};

/// Pixelate every image under a directory and build spritesheets
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input directory containing images to process
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output directory for processed images
    #[arg(required = true)]
    pub output: PathBuf,

    /// Compression ratio (overrides config)
    #[arg(long, short)]
    pub ratio: Option<u32>,

    /// Keep partial transparency instead of binarizing alpha
    #[arg(long, short)]
    pub allow_transparent: bool,

    /// Spritesheet output directory (overrides config)
    #[arg(long)]
    pub spritesheets: Option<PathBuf>,

    /// Write TexturePacker JSON next to each spritesheet
    #[arg(long)]
    pub sheet_json: bool,

    /// Path to pixelpress.yaml (default: ./pixelpress.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Background remover to use (overrides config)
    #[arg(long, value_enum)]
    pub remover: Option<RemoverKind>,

    /// Removal service URL (overrides config)
    #[arg(long)]
    pub remover_url: Option<String>,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl CompressArgs {
    /// Merge command-line overrides into the loaded configuration.
    fn apply(&self, mut config: PressConfig) -> Result<PressConfig> {
        if let Some(ratio) = self.ratio {
            config.ratio = ratio;
        }
        if self.allow_transparent {
            config.allow_transparent = true;
        }
        if let Some(dir) = &self.spritesheets {
            config.spritesheets = dir.clone();
        }
        if let Some(kind) = self.remover {
            config.remover.kind = kind;
        }
        if let Some(url) = &self.remover_url {
            config.remover.url = url.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn run(args: CompressArgs, printer: &Printer) -> Result<Report> {
    let config = args.apply(PressConfig::discover(args.config.as_deref())?)?;
    let remover = config.remover.build()?;

    printer.info(
        "Settings",
        &format!(
            "ratio {}, {} alpha, remover {}, spritesheets in {}",
            config.ratio,
            if config.allow_transparent { "smooth" } else { "binary" },
            remover.name(),
            display_path(&config.spritesheets)
        ),
    );

    let report = BatchPipeline::new(&config, remover.as_ref())
        .with_sheet_metadata(args.sheet_json)
        .process(&args.input, &args.output, printer)?;

    if args.json {
        println!("{}", report.to_json()?);
    }

    Ok(report)
}
