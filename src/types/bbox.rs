//! Bounding box of visible content.

use super::PixelGrid;

/// Smallest rectangle enclosing every pixel with alpha > 0.
///
/// All four edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Compute the content box of a grid.
    ///
    /// Returns `None` when every pixel is fully transparent (or the grid is
    /// empty). RGB grids always cover the whole image.
    pub fn of(grid: &PixelGrid) -> Option<Self> {
        let (width, height) = grid.size();
        if width == 0 || height == 0 {
            return None;
        }
        if !grid.layout().has_alpha() {
            return Some(Self::new(0, 0, width - 1, height - 1));
        }

        let mut found: Option<Self> = None;
        for y in 0..height {
            for x in 0..width {
                if grid.alpha(x, y) == 0 {
                    continue;
                }
                found = Some(match found {
                    None => Self::new(x, y, x, y),
                    Some(b) => Self::new(
                        b.left.min(x),
                        b.top.min(y),
                        b.right.max(x),
                        b.bottom.max(y),
                    ),
                });
            }
        }
        found
    }

    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }
}
