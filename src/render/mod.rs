//! Image transformation stages.
//!
//! Every stage reads a `PixelGrid` and returns a new one; sources are never
//! modified in place.

mod compress;
mod fit;
mod png;
mod resize;
mod sheet;

pub use compress::{
    compress, AlphaPolicy, BlockCompressor, ALPHA_THRESHOLD, DEFAULT_RATIO, VISIBILITY_RATIO,
};
pub use fit::{fit, CanvasFitter, FitMode};
pub use png::{decode, encode_png, load, upscale, write_png};
pub use resize::{resample, resize, ResizeTarget};
pub use sheet::{assemble, write_sheet_json, Frame, SheetMeta};
