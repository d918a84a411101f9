pub mod completions;
pub mod compress;
pub mod fit;
pub mod init;
pub mod sheet;

use clap::{Parser, Subcommand};

/// pixelpress - Pixelate sprites, fit them to a canvas and build spritesheets
#[derive(Parser, Debug)]
#[command(name = "pixelpress")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress every image under a directory and assemble spritesheets
    Compress(compress::CompressArgs),

    /// Re-center an image's content on a canvas, then resize
    Fit(fit::FitArgs),

    /// Assemble explicit images into a horizontal spritesheet
    Sheet(sheet::SheetArgs),

    /// Initialize a project (generates pixelpress.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
