//! Pixel grid type and conversions.

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::error::{PressError, Result};

use super::BoundingBox;

/// Channel layout of a pixel grid.
///
/// A grid is either RGB or RGBA across every pixel; mixed layouts cannot
/// be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
}

impl ChannelLayout {
    /// Resolve a layout from a raw channel count.
    pub fn from_count(channels: usize) -> Result<Self> {
        match channels {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            _ => Err(PressError::UnsupportedChannelLayout { channels }),
        }
    }

    /// Number of samples per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Whether the layout carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }
}

/// A dense 2-D pixel buffer (row-major, interleaved samples).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    samples: Vec<u8>,
}

impl PixelGrid {
    /// Create a zero-filled grid. For RGBA this is fully transparent black.
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Self {
        let len = width as usize * height as usize * layout.channels();
        Self {
            width,
            height,
            layout,
            samples: vec![0; len],
        }
    }

    /// Create a grid from raw interleaved samples.
    ///
    /// Fails if the channel count is not 3 or 4, or if the buffer length
    /// does not match `width * height * channels`.
    pub fn from_raw(width: u32, height: u32, channels: usize, samples: Vec<u8>) -> Result<Self> {
        let layout = ChannelLayout::from_count(channels)?;
        let expected = width as usize * height as usize * channels;
        if samples.len() != expected {
            return Err(PressError::DecodeFailed {
                message: format!(
                    "buffer holds {} samples, {}x{}x{} needs {}",
                    samples.len(),
                    width,
                    height,
                    channels,
                    expected
                ),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            samples,
        })
    }

    /// Create a grid filled with a single pixel value.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self> {
        let layout = ChannelLayout::from_count(pixel.len())?;
        let mut grid = Self::new(width, height, layout);
        for chunk in grid.samples.chunks_exact_mut(layout.channels()) {
            chunk.copy_from_slice(pixel);
        }
        Ok(grid)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Raw interleaved samples.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels()
    }

    /// Samples of the pixel at (x, y).
    ///
    /// Panics if the coordinate is outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = self.offset(x, y);
        &self.samples[start..start + self.channels()]
    }

    /// Overwrite the pixel at (x, y). `pixel` must match the grid's layout.
    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: &[u8]) {
        let start = self.offset(x, y);
        let channels = self.channels();
        self.samples[start..start + channels].copy_from_slice(pixel);
    }

    /// Alpha of the pixel at (x, y); RGB grids are always opaque.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        match self.layout {
            ChannelLayout::Rgb => 255,
            ChannelLayout::Rgba => self.pixel(x, y)[3],
        }
    }

    /// The pixel at (x, y) widened to RGBA.
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let p = self.pixel(x, y);
        match self.layout {
            ChannelLayout::Rgb => [p[0], p[1], p[2], 255],
            ChannelLayout::Rgba => [p[0], p[1], p[2], p[3]],
        }
    }

    /// Check if every pixel has alpha == 0.
    pub fn is_fully_transparent(&self) -> bool {
        match self.layout {
            ChannelLayout::Rgb => false,
            ChannelLayout::Rgba => self.samples.chunks_exact(4).all(|p| p[3] == 0),
        }
    }

    /// Copy the region covered by `bbox` into a new grid.
    pub fn crop(&self, bbox: BoundingBox) -> Self {
        let mut out = Self::new(bbox.width(), bbox.height(), self.layout);
        for y in 0..bbox.height() {
            for x in 0..bbox.width() {
                out.put_pixel(x, y, self.pixel(bbox.left + x, bbox.top + y));
            }
        }
        out
    }

    /// Convert to an RGBA grid, treating RGB pixels as fully opaque.
    pub fn to_rgba(&self) -> Self {
        match self.layout {
            ChannelLayout::Rgba => self.clone(),
            ChannelLayout::Rgb => {
                let mut samples = Vec::with_capacity(self.samples.len() / 3 * 4);
                for p in self.samples.chunks_exact(3) {
                    samples.extend_from_slice(&[p[0], p[1], p[2], 255]);
                }
                Self {
                    width: self.width,
                    height: self.height,
                    layout: ChannelLayout::Rgba,
                    samples,
                }
            }
        }
    }

    /// Build a grid from a decoded image.
    ///
    /// Greyscale becomes RGB, greyscale with alpha becomes RGBA, and wider
    /// sample types are reduced to 8 bits.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        if img.color().has_alpha() {
            Self {
                width,
                height,
                layout: ChannelLayout::Rgba,
                samples: img.to_rgba8().into_raw(),
            }
        } else {
            Self {
                width,
                height,
                layout: ChannelLayout::Rgb,
                samples: img.to_rgb8().into_raw(),
            }
        }
    }

    /// Build an RGBA grid from an `image` buffer.
    pub fn from_rgba_image(img: RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            layout: ChannelLayout::Rgba,
            samples: img.into_raw(),
        }
    }

    /// Copy into an `image` RGBA buffer (opaque alpha for RGB grids).
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| Rgba(self.rgba(x, y)))
    }

    /// Copy into a `DynamicImage` preserving the channel layout.
    pub fn to_dynamic(&self) -> DynamicImage {
        match self.layout {
            ChannelLayout::Rgba => DynamicImage::ImageRgba8(self.to_rgba_image()),
            ChannelLayout::Rgb => {
                DynamicImage::ImageRgb8(RgbImage::from_fn(self.width, self.height, |x, y| {
                    let p = self.pixel(x, y);
                    Rgb([p[0], p[1], p[2]])
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_count() {
        assert_eq!(ChannelLayout::from_count(3).unwrap(), ChannelLayout::Rgb);
        assert_eq!(ChannelLayout::from_count(4).unwrap(), ChannelLayout::Rgba);
        assert!(matches!(
            ChannelLayout::from_count(2),
            Err(PressError::UnsupportedChannelLayout { channels: 2 })
        ));
        assert!(ChannelLayout::from_count(1).is_err());
    }

    #[test]
    fn test_new_is_transparent_black() {
        let grid = PixelGrid::new(3, 2, ChannelLayout::Rgba);
        assert_eq!(grid.size(), (3, 2));
        assert_eq!(grid.samples().len(), 24);
        assert!(grid.is_fully_transparent());
    }

    #[test]
    fn test_from_raw_rejects_bad_length() {
        assert!(PixelGrid::from_raw(2, 2, 3, vec![0; 11]).is_err());
        assert!(PixelGrid::from_raw(2, 2, 3, vec![0; 12]).is_ok());
    }

    #[test]
    fn test_from_raw_rejects_channels() {
        let err = PixelGrid::from_raw(1, 1, 5, vec![0; 5]).unwrap_err();
        assert!(matches!(
            err,
            PressError::UnsupportedChannelLayout { channels: 5 }
        ));
    }

    #[test]
    fn test_put_and_get_pixel() {
        let mut grid = PixelGrid::new(2, 2, ChannelLayout::Rgb);
        grid.put_pixel(1, 0, &[10, 20, 30]);
        assert_eq!(grid.pixel(1, 0), &[10, 20, 30]);
        assert_eq!(grid.pixel(0, 1), &[0, 0, 0]);
        assert_eq!(grid.alpha(1, 0), 255);
        assert_eq!(grid.rgba(1, 0), [10, 20, 30, 255]);
    }

    #[test]
    fn test_to_rgba_is_opaque() {
        let grid = PixelGrid::filled(2, 1, &[1, 2, 3]).unwrap();
        let rgba = grid.to_rgba();
        assert_eq!(rgba.layout(), ChannelLayout::Rgba);
        assert_eq!(rgba.samples(), &[1, 2, 3, 255, 1, 2, 3, 255]);
    }

    #[test]
    fn test_crop() {
        let mut grid = PixelGrid::new(4, 4, ChannelLayout::Rgba);
        grid.put_pixel(2, 1, &[9, 9, 9, 255]);
        let cropped = grid.crop(BoundingBox::new(1, 1, 2, 2));
        assert_eq!(cropped.size(), (2, 2));
        assert_eq!(cropped.pixel(1, 0), &[9, 9, 9, 255]);
    }

    #[test]
    fn test_dynamic_round_trip_keeps_layout() {
        let grid = PixelGrid::filled(3, 2, &[5, 6, 7, 128]).unwrap();
        let back = PixelGrid::from_dynamic(grid.to_dynamic());
        assert_eq!(back, grid);

        let rgb = PixelGrid::filled(3, 2, &[5, 6, 7]).unwrap();
        let back = PixelGrid::from_dynamic(rgb.to_dynamic());
        assert_eq!(back.layout(), ChannelLayout::Rgb);
    }

    #[test]
    fn test_grey_becomes_rgb() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(2, 2, image::Luma([77])));
        let grid = PixelGrid::from_dynamic(img);
        assert_eq!(grid.layout(), ChannelLayout::Rgb);
        assert_eq!(grid.pixel(1, 1), &[77, 77, 77]);
    }
}
