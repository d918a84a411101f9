//! Sheet command implementation.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::render::{
    assemble, load, upscale, write_png, write_sheet_json, AlphaPolicy, BlockCompressor, SheetMeta,
};
use crate::types::PixelGrid;

/// Concatenate same-height images into a horizontal spritesheet
#[derive(Args, Debug)]
pub struct SheetArgs {
    /// Images to assemble, left to right
    #[arg(required = true, num_args = 2..)]
    pub images: Vec<PathBuf>,

    /// Output PNG path
    #[arg(long, short)]
    pub output: PathBuf,

    /// Compress each image with this ratio before assembly
    #[arg(long, short)]
    pub ratio: Option<u32>,

    /// Keep partial transparency when compressing
    #[arg(long, short)]
    pub allow_transparent: bool,

    /// Nearest-neighbour upscale of the finished sheet (preview)
    #[arg(long, default_value = "1")]
    pub scale: u32,

    /// Write TexturePacker JSON next to the sheet
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SheetArgs, printer: &Printer) -> Result<PixelGrid> {
    let compressor = args.ratio.map(|ratio| {
        BlockCompressor::new(ratio).with_policy(AlphaPolicy::new(args.allow_transparent))
    });

    let mut frames = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let image = load(path)?;
        let image = match &compressor {
            Some(c) => c.compress(&image)?,
            None => image,
        };
        frames.push(image);
    }

    let sheet = assemble(&frames)?;
    let sheet = upscale(&sheet, args.scale);
    write_png(&sheet, &args.output)?;

    if args.json {
        let names: Vec<String> = args.images.iter().map(|p| frame_name(p)).collect();
        let scaled: Vec<PixelGrid> = frames.iter().map(|f| upscale(f, args.scale)).collect();
        let image_name = args
            .output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let meta = SheetMeta::for_strip(&image_name, &names, &scaled);
        write_sheet_json(&meta, &args.output.with_extension("json"))?;
    }

    printer.success(
        "Assembled",
        &format!(
            "{} ({}, {}x{})",
            display_path(&args.output),
            plural(frames.len(), "frame", "frames"),
            sheet.width(),
            sheet.height()
        ),
    );

    Ok(sheet)
}

fn frame_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
