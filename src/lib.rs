//! pixelpress - Pixelated sprite compression and spritesheet pipeline
//!
//! Block-median compression of background-removed images, content-aware
//! canvas fitting, and horizontal spritesheet assembly, plus a batch driver
//! that runs them over a directory tree.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod removal;
pub mod render;
pub mod types;

pub use config::{PressConfig, CONFIG_FILENAME};
pub use discovery::{scan_directory, ImageDir, ScanResult};
pub use error::{PressError, Result};
pub use pipeline::{BatchPipeline, Failure, Report, Stage};
pub use removal::{BackgroundRemover, HttpRemover, Passthrough, RemovalSettings};
pub use render::{
    assemble, compress, decode, encode_png, fit, resize, upscale, write_png, AlphaPolicy,
    BlockCompressor, CanvasFitter, FitMode, ResizeTarget, SheetMeta,
};
pub use types::{BoundingBox, ChannelLayout, PixelGrid};
