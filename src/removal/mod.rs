//! Background removal boundary.
//!
//! Neural background removal is an external capability. The batch pipeline
//! only sees the `BackgroundRemover` trait: image bytes in, image bytes with
//! transparent background out. Model choice and matting options travel with
//! each remover as `RemovalSettings` rather than as shared global state.

mod http;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use http::HttpRemover;

/// Something that can strip the background from encoded image bytes.
pub trait BackgroundRemover {
    /// Short name used in status output.
    fn name(&self) -> &str;

    /// Return image bytes whose background pixels are transparent.
    ///
    /// Failures are reported as `PressError::BackgroundRemovalFailed`.
    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>>;
}

/// Remover for inputs whose background is already transparent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl BackgroundRemover for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>> {
        Ok(image.to_vec())
    }
}

/// Options forwarded to a removal service with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalSettings {
    /// Segmentation model name (e.g. `u2net`, `isnet-general-use`).
    ///
    /// Sent as the `model` form field on every request. Services that load
    /// a model out of band (such as a rembg server switched through its
    /// `/switch-model` endpoint) ignore it, so the server's active model
    /// wins there.
    pub model: String,
    pub alpha_matting: bool,
    pub foreground_threshold: u32,
    pub background_threshold: u32,
    pub erode_size: u32,
    pub kernel_size: u32,
    /// Smooth the predicted mask before applying it.
    pub post_process: bool,
}

impl Default for RemovalSettings {
    fn default() -> Self {
        Self {
            model: "u2net".to_string(),
            alpha_matting: false,
            foreground_threshold: 100,
            background_threshold: 100,
            erode_size: 1,
            kernel_size: 1,
            post_process: false,
        }
    }
}

impl RemovalSettings {
    /// Settings as multipart form fields.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("model", self.model.clone()),
            ("alpha_matting", self.alpha_matting.to_string()),
            ("foreground_threshold", self.foreground_threshold.to_string()),
            ("background_threshold", self.background_threshold.to_string()),
            ("erode_size", self.erode_size.to_string()),
            ("kernel_size", self.kernel_size.to_string()),
            ("post_process", self.post_process.to_string()),
        ]
    }
}
