//! PNG input and output for pixel grids.
//!
//! Decodes source images (PNG or JPEG) into grids and writes grids back out
//! as PNG, with nearest-neighbour integer upscaling for crisp previews.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;

use crate::error::{PressError, Result};
use crate::types::PixelGrid;

/// Decode image bytes into a grid.
pub fn decode(bytes: &[u8]) -> Result<PixelGrid> {
    let img = image::load_from_memory(bytes).map_err(|e| PressError::DecodeFailed {
        message: e.to_string(),
    })?;
    Ok(PixelGrid::from_dynamic(img))
}

/// Read and decode an image file.
pub fn load(path: &Path) -> Result<PixelGrid> {
    let bytes = fs::read(path).map_err(|e| PressError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read image: {}", e),
    })?;
    decode(&bytes).map_err(|e| match e {
        PressError::DecodeFailed { message } => PressError::DecodeFailed {
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })
}

/// Encode a grid as PNG bytes, keeping its channel layout.
pub fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    grid.to_dynamic()
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| PressError::Build {
            message: format!("Failed to encode PNG: {}", e),
            help: None,
        })?;
    Ok(buf.into_inner())
}

/// Write a grid to a PNG file, creating parent directories as needed.
pub fn write_png(grid: &PixelGrid, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PressError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create directory: {}", e),
            })?;
        }
    }

    grid.to_dynamic()
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| PressError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })?;

    Ok(())
}

/// Scale a grid up by an integer factor.
///
/// Uses nearest-neighbour block replication, the inverse shape of block
/// compression.
pub fn upscale(grid: &PixelGrid, scale: u32) -> PixelGrid {
    if scale <= 1 {
        return grid.clone();
    }

    let (width, height) = grid.size();
    let mut scaled = PixelGrid::new(width * scale, height * scale, grid.layout());

    for y in 0..height {
        for x in 0..width {
            let pixel = grid.pixel(x, y);
            for sy in 0..scale {
                for sx in 0..scale {
                    scaled.put_pixel(x * scale + sx, y * scale + sy, pixel);
                }
            }
        }
    }

    scaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{compress, AlphaPolicy};
    use crate::types::ChannelLayout;
    use tempfile::tempdir;

    #[test]
    fn test_write_png_simple() {
        let mut grid = PixelGrid::new(2, 2, ChannelLayout::Rgba);
        grid.put_pixel(0, 0, &[0, 0, 0, 255]);
        grid.put_pixel(1, 0, &[255, 255, 255, 255]);

        let dir = tempdir().unwrap();
        let path = dir.path().join("test.png");
        write_png(&grid, &path).unwrap();

        assert!(path.exists());

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_write_png_creates_parents() {
        let grid = PixelGrid::filled(1, 1, &[1, 2, 3]).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c.png");
        write_png(&grid, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_encode_decode_keeps_pixels() {
        let grid = PixelGrid::filled(3, 2, &[255, 0, 0, 128]).unwrap();
        let bytes = encode_png(&grid).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode(b"not an image").unwrap_err();
        assert!(matches!(err, PressError::DecodeFailed { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/image.png")).unwrap_err();
        assert!(matches!(err, PressError::Io { .. }));
    }

    #[test]
    fn test_upscale() {
        let grid = PixelGrid::from_raw(2, 1, 3, vec![0, 0, 0, 255, 255, 255]).unwrap();
        let scaled = upscale(&grid, 2);

        assert_eq!(scaled.size(), (4, 2));
        assert_eq!(scaled.pixel(0, 0), &[0, 0, 0]);
        assert_eq!(scaled.pixel(1, 1), &[0, 0, 0]);
        assert_eq!(scaled.pixel(2, 0), &[255, 255, 255]);
        assert_eq!(scaled.pixel(3, 1), &[255, 255, 255]);
    }

    #[test]
    fn test_upscale_no_scale() {
        let grid = PixelGrid::filled(1, 1, &[9, 9, 9]).unwrap();
        assert_eq!(upscale(&grid, 1), grid);
        assert_eq!(upscale(&grid, 0), grid);
    }

    #[test]
    fn test_compress_upscale_round_trip_keeps_blocks() {
        let mut grid = PixelGrid::new(16, 8, ChannelLayout::Rgba);
        for y in 0..8 {
            for x in 0..8 {
                grid.put_pixel(x, y, &[200, 100, 50, 255]);
            }
        }
        let small = compress(&grid, 4, AlphaPolicy::default()).unwrap();
        let restored = upscale(&small, 4);
        assert_eq!(restored.size(), grid.size());

        let again = compress(&restored, 4, AlphaPolicy::default()).unwrap();
        assert_eq!(again, small);
    }
}
