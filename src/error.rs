use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pixelpress operations
#[derive(Error, Diagnostic, Debug)]
pub enum PressError {
    #[error("IO error: {0}")]
    #[diagnostic(code(pixelpress::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(pixelpress::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(pixelpress::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(pixelpress::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(pixelpress::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Image size {width}x{height} is not divisible by compression ratio {ratio}")]
    #[diagnostic(
        code(pixelpress::dimension_mismatch),
        help("Crop or pad the source so both sides are multiples of the ratio")
    )]
    DimensionMismatch { width: u32, height: u32, ratio: u32 },

    #[error("Image has {channels} colour channels, expected 3 or 4")]
    #[diagnostic(code(pixelpress::channels))]
    UnsupportedChannelLayout { channels: usize },

    #[error("Cannot create spritesheet with only {count} image(s), at least 2 required")]
    #[diagnostic(code(pixelpress::sheet))]
    InsufficientImages { count: usize },

    #[error("Image {index} has height {found}, expected {expected}")]
    #[diagnostic(
        code(pixelpress::sheet),
        help("All images in a spritesheet must share the same height")
    )]
    HeightMismatch {
        index: usize,
        expected: u32,
        found: u32,
    },

    #[error("Background removal failed: {message}")]
    #[diagnostic(code(pixelpress::removal))]
    BackgroundRemovalFailed { message: String },

    #[error("Failed to decode image: {message}")]
    #[diagnostic(code(pixelpress::decode))]
    DecodeFailed { message: String },
}

pub type Result<T> = std::result::Result<T, PressError>;
