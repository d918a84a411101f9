//! Fit command implementation.
//!
//! Re-centers the visible content of a single image on a canvas, then
//! optionally resizes the result to a target size.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{FitModeKind, PressConfig};
use crate::error::{PressError, Result};
use crate::output::{display_path, Printer};
use crate::render::{decode, resize, write_png, CanvasFitter};
use crate::types::PixelGrid;

/// Center and scale an image's content on a transparent canvas
#[derive(Args, Debug)]
pub struct FitArgs {
    /// Image to fit
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output PNG path
    #[arg(long, short)]
    pub output: PathBuf,

    /// Fitting mode (overrides config)
    #[arg(long, value_enum)]
    pub mode: Option<FitModeKind>,

    /// Border around content as a percentage of its longer side
    #[arg(long)]
    pub border: Option<u32>,

    /// Empty margin as a percentage of the canvas
    #[arg(long)]
    pub padding: Option<u32>,

    /// Target width after fitting
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height after fitting
    #[arg(long)]
    pub height: Option<u32>,

    /// Resize to exactly width x height, ignoring aspect ratio
    #[arg(long)]
    pub stretch: bool,

    /// Run the configured background remover first
    #[arg(long)]
    pub remove_background: bool,

    /// Path to pixelpress.yaml (default: ./pixelpress.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl FitArgs {
    fn apply(&self, mut config: PressConfig) -> Result<PressConfig> {
        let fit = &mut config.fit;
        if let Some(mode) = self.mode {
            fit.mode = mode;
        }
        if let Some(border) = self.border {
            fit.border_percent = border;
        }
        if let Some(padding) = self.padding {
            fit.padding_percent = padding;
        }
        if self.width.is_some() {
            fit.target_width = self.width;
        }
        if self.height.is_some() {
            fit.target_height = self.height;
        }
        if self.stretch {
            fit.maintain_aspect_ratio = false;
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn run(args: FitArgs, printer: &Printer) -> Result<PixelGrid> {
    let config = args.apply(PressConfig::discover(args.config.as_deref())?)?;

    let bytes = fs::read(&args.input).map_err(|e| PressError::Io {
        path: args.input.clone(),
        message: format!("Failed to read image: {}", e),
    })?;

    let bytes = if args.remove_background {
        let remover = config.remover.build()?;
        printer.status("Removing", &format!("background via {}", remover.name()));
        remover.remove_background(&bytes)?
    } else {
        bytes
    };

    let image = decode(&bytes)?;
    printer.status(
        "Fitting",
        &format!(
            "{} ({}x{})",
            display_path(&args.input),
            image.width(),
            image.height()
        ),
    );

    let fitted = CanvasFitter::new(config.fit.fit_mode()).fit(&image);
    let result = resize(&fitted, config.fit.resize_target())?;

    write_png(&result, &args.output)?;
    printer.success(
        "Wrote",
        &format!(
            "{} ({}x{})",
            display_path(&args.output),
            result.width(),
            result.height()
        ),
    );

    Ok(result)
}
