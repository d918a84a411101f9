//! Source image discovery for batch runs.

mod scanner;

pub use scanner::{is_image, scan_directory, ImageDir, ScanResult, IMAGE_EXTENSIONS};
