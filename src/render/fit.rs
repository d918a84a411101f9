//! Content-aware canvas fitting.
//!
//! Finds the visible content of a background-removed image and re-renders it
//! centered on a transparent canvas. Two modes exist and are never merged:
//! `GrowWithBorder` changes the output size, `FixedCanvas` never does.

use tracing::debug;

use crate::types::{BoundingBox, ChannelLayout, PixelGrid};

use super::resize::{resample, scaled};

/// How content is placed on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Square canvas sized to the content's longer side plus a border on
    /// every edge. Content is not scaled. Borders above 100% are treated
    /// as 100%.
    GrowWithBorder { border_percent: u32 },
    /// Canvas keeps the input's dimensions; content is scaled to fill it,
    /// leaving `padding_percent` of each axis empty.
    FixedCanvas { padding_percent: u32 },
}

impl Default for FitMode {
    fn default() -> Self {
        Self::GrowWithBorder { border_percent: 10 }
    }
}

/// Re-centers and scales visible content on a canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasFitter {
    mode: FitMode,
}

impl CanvasFitter {
    pub fn new(mode: FitMode) -> Self {
        Self { mode }
    }

    pub fn grow_with_border(border_percent: u32) -> Self {
        Self::new(FitMode::GrowWithBorder { border_percent })
    }

    pub fn fixed_canvas(padding_percent: u32) -> Self {
        Self::new(FitMode::FixedCanvas { padding_percent })
    }

    pub fn mode(&self) -> FitMode {
        self.mode
    }

    /// Fit an image according to the configured mode.
    ///
    /// Images with no visible content are returned unchanged. Otherwise the
    /// result is always RGBA with a transparent background.
    pub fn fit(&self, image: &PixelGrid) -> PixelGrid {
        let Some(bbox) = BoundingBox::of(image) else {
            debug!("no visible content, returning input unchanged");
            return image.clone();
        };

        match self.mode {
            FitMode::GrowWithBorder { border_percent } => {
                grow_with_border(image, bbox, border_percent)
            }
            FitMode::FixedCanvas { padding_percent } => {
                fixed_canvas(image, bbox, padding_percent)
            }
        }
    }
}

/// Fit an image with an explicit mode.
pub fn fit(image: &PixelGrid, mode: FitMode) -> PixelGrid {
    CanvasFitter::new(mode).fit(image)
}

fn grow_with_border(image: &PixelGrid, bbox: BoundingBox, border_percent: u32) -> PixelGrid {
    let (bw, bh) = (bbox.width(), bbox.height());
    let max_dim = bw.max(bh);
    let border_percent = border_percent.min(100);
    let border = (max_dim as u64 * border_percent as u64 / 100) as u32;
    let side = max_dim.saturating_add(border.saturating_mul(2));

    let content = image.crop(bbox).to_rgba();
    let mut canvas = PixelGrid::new(side, side, ChannelLayout::Rgba);
    paste(
        &mut canvas,
        &content,
        ((side - bw) / 2) as i64,
        ((side - bh) / 2) as i64,
    );

    debug!(max_dim, border, side, "grew canvas around {}x{} content", bw, bh);
    canvas
}

fn fixed_canvas(image: &PixelGrid, bbox: BoundingBox, padding_percent: u32) -> PixelGrid {
    let (cw, ch) = image.size();
    let (bw, bh) = (bbox.width(), bbox.height());

    let (new_w, new_h) = if padding_percent == 0 {
        // Longer content side fills its canvas side exactly.
        if bw >= bh {
            (cw, scaled(bh as f64, cw as f64 / bw as f64))
        } else {
            (scaled(bw as f64, ch as f64 / bh as f64), ch)
        }
    } else {
        let keep = 100u32.saturating_sub(padding_percent) as f64 / 100.0;
        let target_w = cw as f64 * keep;
        let target_h = ch as f64 * keep;
        let scale = (target_w / bw as f64).min(target_h / bh as f64);
        (scaled(bw as f64, scale), scaled(bh as f64, scale))
    };

    let content = resample(&image.crop(bbox).to_rgba(), new_w, new_h);
    let mut canvas = PixelGrid::new(cw, ch, ChannelLayout::Rgba);
    paste(
        &mut canvas,
        &content,
        (cw as i64 - new_w as i64).div_euclid(2),
        (ch as i64 - new_h as i64).div_euclid(2),
    );

    debug!(
        padding_percent,
        "scaled {}x{} content to {}x{} on {}x{} canvas",
        bw,
        bh,
        new_w,
        new_h,
        cw,
        ch
    );
    canvas
}

/// Copy `src` onto `canvas` at an offset, clipping anything outside.
fn paste(canvas: &mut PixelGrid, src: &PixelGrid, left: i64, top: i64) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    for y in 0..src.height() {
        let ty = top + y as i64;
        if ty < 0 || ty >= ch {
            continue;
        }
        for x in 0..src.width() {
            let tx = left + x as i64;
            if tx < 0 || tx >= cw {
                continue;
            }
            canvas.put_pixel(tx as u32, ty as u32, &src.rgba(x, y));
        }
    }
}
