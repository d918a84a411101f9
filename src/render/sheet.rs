//! Spritesheet assembly.
//!
//! Concatenates same-height images left to right into a single RGBA sheet,
//! optionally describing the frames in TexturePacker's JSON Hash layout.

use std::fs;
use std::path::Path;

use serde_json::{json, Map, Value};

use crate::error::{PressError, Result};
use crate::types::{ChannelLayout, PixelGrid};

/// A frame in the sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Sprite sheet metadata.
#[derive(Debug, Clone)]
pub struct SheetMeta {
    pub frames: Vec<Frame>,
    pub image: String,
    pub size: (u32, u32),
}

impl SheetMeta {
    /// Describe a horizontal strip of `images`, one named frame each.
    ///
    /// `names` and `images` are paired by position.
    pub fn for_strip<S: AsRef<str>>(image: &str, names: &[S], images: &[PixelGrid]) -> Self {
        let mut frames = Vec::with_capacity(images.len());
        let mut x = 0;
        for (name, img) in names.iter().zip(images) {
            frames.push(Frame {
                name: name.as_ref().to_string(),
                x,
                y: 0,
                w: img.width(),
                h: img.height(),
            });
            x += img.width();
        }
        let height = images.first().map_or(0, PixelGrid::height);
        Self {
            frames,
            image: image.to_string(),
            size: (x, height),
        }
    }

    /// TexturePacker "JSON Hash" document for this sheet.
    ///
    /// Frames are never rotated or trimmed, so each frame's source size is
    /// its own size.
    pub fn to_texture_packer(&self) -> Value {
        let frames: Map<String, Value> = self
            .frames
            .iter()
            .map(|f| {
                let entry = json!({
                    "frame": { "x": f.x, "y": f.y, "w": f.w, "h": f.h },
                    "rotated": false,
                    "trimmed": false,
                    "spriteSourceSize": { "x": 0, "y": 0, "w": f.w, "h": f.h },
                    "sourceSize": { "w": f.w, "h": f.h },
                });
                (f.name.clone(), entry)
            })
            .collect();

        json!({
            "frames": frames,
            "meta": {
                "app": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "image": self.image,
                "size": { "w": self.size.0, "h": self.size.1 },
                "scale": "1",
            },
        })
    }
}

/// Concatenate images horizontally into a new RGBA grid.
///
/// Requires at least two images, all of the same height. Images without
/// alpha are composed as fully opaque.
pub fn assemble(images: &[PixelGrid]) -> Result<PixelGrid> {
    if images.len() < 2 {
        return Err(PressError::InsufficientImages {
            count: images.len(),
        });
    }

    let height = images[0].height();
    for (index, img) in images.iter().enumerate().skip(1) {
        if img.height() != height {
            return Err(PressError::HeightMismatch {
                index,
                expected: height,
                found: img.height(),
            });
        }
    }

    let width: u32 = images.iter().map(PixelGrid::width).sum();
    let mut sheet = PixelGrid::new(width, height, ChannelLayout::Rgba);

    let mut offset = 0;
    for img in images {
        for y in 0..height {
            for x in 0..img.width() {
                sheet.put_pixel(offset + x, y, &img.rgba(x, y));
            }
        }
        offset += img.width();
    }

    Ok(sheet)
}

/// Write sheet metadata next to a sheet as TexturePacker JSON.
pub fn write_sheet_json(meta: &SheetMeta, path: &Path) -> Result<()> {
    let io_err = |message: String| PressError::Io {
        path: path.to_path_buf(),
        message,
    };
    let text = serde_json::to_string_pretty(&meta.to_texture_packer())
        .map_err(|e| io_err(format!("Failed to serialize sheet metadata: {}", e)))?;
    fs::write(path, text).map_err(|e| io_err(format!("Failed to write sheet metadata: {}", e)))
}
