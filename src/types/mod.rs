//! Core domain types for pixelpress.
//!
//! This module contains the fundamental types shared by every stage:
//! - `PixelGrid` - dense RGB or RGBA pixel buffer
//! - `ChannelLayout` - the 3-or-4 channel invariant of a grid
//! - `BoundingBox` - inclusive extent of visible content

mod bbox;
mod grid;

pub use bbox::BoundingBox;
pub use grid::{ChannelLayout, PixelGrid};
