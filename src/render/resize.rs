//! Target-size resizing.
//!
//! All resampling goes through a Lanczos3 filter so content that is scaled
//! several times downstream keeps its edges.

use image::imageops::FilterType;

use crate::error::{PressError, Result};
use crate::types::PixelGrid;

/// Requested output size for a resize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTarget {
    /// Target width in pixels (`None` means derived or unchanged).
    pub width: Option<u32>,
    /// Target height in pixels (`None` means derived or unchanged).
    pub height: Option<u32>,
    pub maintain_aspect_ratio: bool,
}

impl Default for ResizeTarget {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            maintain_aspect_ratio: true,
        }
    }
}

impl ResizeTarget {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Resize to the exact target, ignoring the source aspect ratio.
    pub fn stretch(mut self) -> Self {
        self.maintain_aspect_ratio = false;
        self
    }

    /// True when no target dimension is set.
    pub fn is_noop(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    /// Compute the output size for a `width × height` source.
    pub fn dimensions_for(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        if self.width == Some(0) || self.height == Some(0) {
            return Err(PressError::Config {
                message: "resize target must be positive".to_string(),
                help: Some("Leave a dimension unset to derive it from the other".to_string()),
            });
        }
        if width == 0 || height == 0 {
            return Ok((width, height));
        }

        let (w, h) = (width as f64, height as f64);
        let dims = match (self.width, self.height, self.maintain_aspect_ratio) {
            (None, None, _) => (width, height),
            (tw, th, false) => (tw.unwrap_or(width), th.unwrap_or(height)),
            (Some(tw), None, true) => (tw, scaled(h, tw as f64 / w)),
            (None, Some(th), true) => (scaled(w, th as f64 / h), th),
            (Some(tw), Some(th), true) => {
                let scale = (tw as f64 / w).min(th as f64 / h);
                (scaled(w, scale), scaled(h, scale))
            }
        };
        Ok(dims)
    }
}

/// Scale a length, rounding to the nearest pixel and never collapsing to 0.
pub(crate) fn scaled(length: f64, scale: f64) -> u32 {
    ((length * scale).round() as u32).max(1)
}

/// Resize a grid to a target size.
///
/// Returns an unchanged copy when the target is empty or already matches.
pub fn resize(grid: &PixelGrid, target: ResizeTarget) -> Result<PixelGrid> {
    let (width, height) = target.dimensions_for(grid.width(), grid.height())?;
    Ok(resample(grid, width, height))
}

/// Resample a grid to exactly `width × height` with Lanczos3.
pub fn resample(grid: &PixelGrid, width: u32, height: u32) -> PixelGrid {
    if grid.size() == (width, height) || grid.width() == 0 || grid.height() == 0 {
        return grid.clone();
    }
    let resized = grid
        .to_dynamic()
        .resize_exact(width, height, FilterType::Lanczos3);
    PixelGrid::from_dynamic(resized)
}
