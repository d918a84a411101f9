//! Block-median compression.
//!
//! Reduces an image by an integer ratio, replacing each R×R block with the
//! per-channel median of its samples. RGBA blocks only take colour from
//! their visible samples so background never bleeds into partial blocks.

use tracing::debug;

use crate::error::{PressError, Result};
use crate::types::{ChannelLayout, PixelGrid};

/// Alpha above which a sample counts as visible.
pub const ALPHA_THRESHOLD: u8 = 50;

/// Fraction of visible samples a block needs to become opaque when
/// transparency is not allowed.
pub const VISIBILITY_RATIO: f64 = 0.5;

/// Default compression ratio.
pub const DEFAULT_RATIO: u32 = 8;

/// How the alpha channel of a block is summarised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlphaPolicy {
    /// Keep the median alpha of the block instead of binarizing it.
    pub allow_transparent: bool,
}

impl AlphaPolicy {
    pub const fn new(allow_transparent: bool) -> Self {
        Self { allow_transparent }
    }
}

/// Block-median compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCompressor {
    ratio: u32,
    policy: AlphaPolicy,
}

impl Default for BlockCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_RATIO)
    }
}

impl BlockCompressor {
    pub fn new(ratio: u32) -> Self {
        Self {
            ratio,
            policy: AlphaPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AlphaPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn ratio(&self) -> u32 {
        self.ratio
    }

    pub fn policy(&self) -> AlphaPolicy {
        self.policy
    }

    /// Compress a grid into a new `(width / R) × (height / R)` grid.
    ///
    /// Both dimensions must be exact multiples of the ratio. The output
    /// keeps the input's channel layout.
    pub fn compress(&self, grid: &PixelGrid) -> Result<PixelGrid> {
        let r = self.ratio;
        if r == 0 {
            return Err(PressError::Config {
                message: "compression ratio must be positive".to_string(),
                help: None,
            });
        }
        let (width, height) = grid.size();
        if width % r != 0 || height % r != 0 {
            return Err(PressError::DimensionMismatch { width, height, ratio: r });
        }

        let (out_w, out_h) = (width / r, height / r);
        let mut out = PixelGrid::new(out_w, out_h, grid.layout());
        if out_w == 0 || out_h == 0 {
            return Ok(out);
        }
        let block_len = (r as usize)
            .checked_mul(r as usize)
            .ok_or(PressError::DimensionMismatch { width, height, ratio: r })?;
        let mut block = Block::with_capacity(block_len);
        let mut empty_blocks = 0usize;

        for by in 0..out_h {
            for bx in 0..out_w {
                block.clear();
                for y in by * r..(by + 1) * r {
                    for x in bx * r..(bx + 1) * r {
                        block.push(grid.pixel(x, y));
                    }
                }

                let pixel = match grid.layout() {
                    ChannelLayout::Rgb => Some(block.median_rgb()),
                    ChannelLayout::Rgba => block.summarise_rgba(self.policy),
                };
                match pixel {
                    Some(p) => out.put_pixel(bx, by, &p[..grid.channels()]),
                    None => empty_blocks += 1,
                }
            }
        }

        debug!(
            width,
            height,
            ratio = r,
            empty_blocks,
            "compressed {}x{} -> {}x{}",
            width,
            height,
            out_w,
            out_h
        );
        Ok(out)
    }
}

/// Compress with an explicit ratio and alpha policy.
pub fn compress(grid: &PixelGrid, ratio: u32, policy: AlphaPolicy) -> Result<PixelGrid> {
    BlockCompressor::new(ratio).with_policy(policy).compress(grid)
}

/// Per-channel sample buffers for one block, reused across blocks.
struct Block {
    channels: [Vec<u8>; 4],
    visible: [Vec<u8>; 3],
}

impl Block {
    fn with_capacity(n: usize) -> Self {
        Self {
            channels: std::array::from_fn(|_| Vec::with_capacity(n)),
            visible: std::array::from_fn(|_| Vec::with_capacity(n)),
        }
    }

    fn clear(&mut self) {
        self.channels.iter_mut().for_each(Vec::clear);
        self.visible.iter_mut().for_each(Vec::clear);
    }

    fn push(&mut self, pixel: &[u8]) {
        for (c, &sample) in pixel.iter().enumerate() {
            self.channels[c].push(sample);
        }
        if pixel.len() == 4 && pixel[3] > ALPHA_THRESHOLD {
            for c in 0..3 {
                self.visible[c].push(pixel[c]);
            }
        }
    }

    fn median_rgb(&mut self) -> [u8; 4] {
        let [r, g, b, _] = &mut self.channels;
        [
            to_sample(median(r)),
            to_sample(median(g)),
            to_sample(median(b)),
            255,
        ]
    }

    /// `None` when no sample in the block is visible.
    fn summarise_rgba(&mut self, policy: AlphaPolicy) -> Option<[u8; 4]> {
        let visible_count = self.visible[0].len();
        if visible_count == 0 {
            return None;
        }

        let [r, g, b] = &mut self.visible;
        let colour = [median(r), median(g), median(b)];

        let total = self.channels[3].len();
        let alpha = if policy.allow_transparent {
            to_sample(median(&mut self.channels[3]))
        } else if (visible_count as f64) < total as f64 * VISIBILITY_RATIO {
            0
        } else {
            255
        };

        Some([
            to_sample(colour[0]),
            to_sample(colour[1]),
            to_sample(colour[2]),
            alpha,
        ])
    }
}

/// Median of a sample set; even counts average the two middle values.
fn median(values: &mut [u8]) -> f64 {
    values.sort_unstable();
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        values[n / 2] as f64
    } else {
        (values[n / 2 - 1] as f64 + values[n / 2] as f64) / 2.0
    }
}

/// Round half to even and clamp into the 8-bit range.
fn to_sample(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}
