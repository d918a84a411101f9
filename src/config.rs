//! Project configuration (pixelpress.yaml) parsing.
//!
//! The configuration holds compression, fitting and background-removal
//! defaults. Command-line flags override whatever is loaded here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{PressError, Result};
use crate::removal::{BackgroundRemover, HttpRemover, Passthrough, RemovalSettings};
use crate::render::{AlphaPolicy, BlockCompressor, FitMode, ResizeTarget, DEFAULT_RATIO};

/// The name of the configuration file.
pub const CONFIG_FILENAME: &str = "pixelpress.yaml";

/// Project configuration loaded from pixelpress.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressConfig {
    /// Compression ratio (block edge length).
    pub ratio: u32,

    /// Keep partial transparency instead of binarizing alpha.
    pub allow_transparent: bool,

    /// Root directory for generated spritesheets.
    pub spritesheets: PathBuf,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,

    pub fit: FitConfig,

    pub remover: RemoverConfig,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO,
            allow_transparent: false,
            spritesheets: PathBuf::from("spritesheets"),
            excludes: vec![],
            fit: FitConfig::default(),
            remover: RemoverConfig::default(),
        }
    }
}

/// Which canvas-fitting behaviour to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FitModeKind {
    #[default]
    GrowWithBorder,
    FitFixedCanvas,
}

/// Canvas fitting and resize settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub mode: FitModeKind,
    pub border_percent: u32,
    pub padding_percent: u32,
    pub target_width: Option<u32>,
    pub target_height: Option<u32>,
    pub maintain_aspect_ratio: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            mode: FitModeKind::default(),
            border_percent: 10,
            padding_percent: 0,
            target_width: None,
            target_height: None,
            maintain_aspect_ratio: true,
        }
    }
}

impl FitConfig {
    pub fn fit_mode(&self) -> FitMode {
        match self.mode {
            FitModeKind::GrowWithBorder => FitMode::GrowWithBorder {
                border_percent: self.border_percent,
            },
            FitModeKind::FitFixedCanvas => FitMode::FixedCanvas {
                padding_percent: self.padding_percent,
            },
        }
    }

    pub fn resize_target(&self) -> ResizeTarget {
        ResizeTarget {
            width: self.target_width,
            height: self.target_height,
            maintain_aspect_ratio: self.maintain_aspect_ratio,
        }
    }
}

/// Which background remover to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RemoverKind {
    /// Inputs already have a transparent background.
    #[default]
    None,
    /// Remote removal service.
    Http,
}

/// Background removal settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoverConfig {
    pub kind: RemoverKind,
    pub url: String,
    pub timeout_secs: u64,
    #[serde(flatten)]
    pub settings: RemovalSettings,
}

impl Default for RemoverConfig {
    fn default() -> Self {
        Self {
            kind: RemoverKind::default(),
            url: "http://127.0.0.1:5000/remove-background".to_string(),
            timeout_secs: 120,
            settings: RemovalSettings::default(),
        }
    }
}

impl RemoverConfig {
    /// Build the configured remover.
    pub fn build(&self) -> Result<Box<dyn BackgroundRemover>> {
        Ok(match self.kind {
            RemoverKind::None => Box::new(Passthrough),
            RemoverKind::Http => Box::new(HttpRemover::new(
                self.url.clone(),
                Duration::from_secs(self.timeout_secs),
                self.settings.clone(),
            )?),
        })
    }
}

impl PressConfig {
    /// Load configuration from a pixelpress.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PressError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load `path` if given, else `pixelpress.yaml` in the current
    /// directory if present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default_path = Path::new(CONFIG_FILENAME);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty document deserializes as null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).map_err(|e| PressError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String, help: &str| {
            Err(PressError::Config {
                message,
                help: Some(help.to_string()),
            })
        };

        if self.ratio == 0 {
            return invalid("ratio must be positive".to_string(), "Use a ratio of 1 or more");
        }
        if self.fit.border_percent > 100 {
            return invalid(
                format!("border_percent {} is out of range", self.fit.border_percent),
                "Use a value between 0 and 100",
            );
        }
        if self.fit.padding_percent >= 100 {
            return invalid(
                format!("padding_percent {} is out of range", self.fit.padding_percent),
                "Use a value between 0 and 99",
            );
        }
        if self.fit.target_width == Some(0) || self.fit.target_height == Some(0) {
            return invalid(
                "target dimensions must be positive".to_string(),
                "Leave a target unset to derive it from the other",
            );
        }
        Ok(())
    }

    /// The block compressor described by this configuration.
    pub fn compressor(&self) -> BlockCompressor {
        BlockCompressor::new(self.ratio).with_policy(AlphaPolicy::new(self.allow_transparent))
    }

    /// Render this configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| PressError::Build {
            message: format!("Failed to serialize config: {}", e),
            help: None,
        })
    }

    /// Check if a path should be excluded based on exclude patterns.
    ///
    /// `path` is relative to the scanned input root.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| Self::matches_pattern(&path_str, pattern))
    }

    /// Simple glob pattern matching.
    fn matches_pattern(path: &str, pattern: &str) -> bool {
        if let Some(suffix) = pattern.strip_prefix("**/") {
            // **/dir/* matches anything inside dir anywhere in the path
            if let Some(dir) = suffix.strip_suffix("/*") {
                return path.contains(&format!("/{}/", dir)) || path.starts_with(&format!("{}/", dir));
            }
            return path.contains(suffix);
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            if !pattern.contains('/') {
                return path.ends_with(suffix);
            }
        }

        if let Some(prefix) = pattern.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", prefix))
                || path.contains(&format!("/{}/", prefix));
        }

        path.contains(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_minimal_config() {
        let config = PressConfig::parse("ratio: 4").unwrap();

        assert_eq!(config.ratio, 4);
        assert!(!config.allow_transparent);
        assert_eq!(config.spritesheets, PathBuf::from("spritesheets"));
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(PressConfig::parse("").unwrap(), PressConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
ratio: 16
allow_transparent: true
spritesheets: out/sheets
excludes:
  - "*.bak"
  - "**/raw/*"
fit:
  mode: fit-fixed-canvas
  padding_percent: 15
  target_width: 64
  maintain_aspect_ratio: false
remover:
  kind: http
  url: http://remover:7000/remove-background
  timeout_secs: 30
  model: isnet-general-use
  erode_size: 3
"#;
        let config = PressConfig::parse(yaml).unwrap();

        assert_eq!(config.ratio, 16);
        assert!(config.allow_transparent);
        assert_eq!(config.spritesheets, PathBuf::from("out/sheets"));
        assert_eq!(config.excludes, vec!["*.bak", "**/raw/*"]);
        assert_eq!(
            config.fit.fit_mode(),
            FitMode::FixedCanvas { padding_percent: 15 }
        );
        assert_eq!(
            config.fit.resize_target(),
            ResizeTarget {
                width: Some(64),
                height: None,
                maintain_aspect_ratio: false
            }
        );
        assert_eq!(config.remover.kind, RemoverKind::Http);
        assert_eq!(config.remover.timeout_secs, 30);
        assert_eq!(config.remover.settings.model, "isnet-general-use");
        assert_eq!(config.remover.settings.erode_size, 3);
        assert_eq!(config.remover.settings.kernel_size, 1);
    }

    #[test]
    fn test_default_config() {
        let config = PressConfig::default();

        assert_eq!(config.ratio, 8);
        assert_eq!(
            config.fit.fit_mode(),
            FitMode::GrowWithBorder { border_percent: 10 }
        );
        assert!(config.fit.resize_target().is_noop());
        assert_eq!(config.remover.kind, RemoverKind::None);
        assert_eq!(config.compressor(), BlockCompressor::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = PressConfig::parse("ratio: [nope").unwrap_err();
        assert!(matches!(err, PressError::Parse { .. }));
    }

    #[test]
    fn test_rejects_zero_ratio() {
        let err = PressConfig::parse("ratio: 0").unwrap_err();
        assert!(matches!(err, PressError::Config { .. }));
    }

    #[test]
    fn test_rejects_out_of_range_percents() {
        assert!(PressConfig::parse("fit:\n  border_percent: 101").is_err());
        assert!(PressConfig::parse("fit:\n  padding_percent: 100").is_err());
        assert!(PressConfig::parse("fit:\n  border_percent: 100").is_ok());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = PressConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(PressConfig::parse(&yaml).unwrap(), config);
    }

    #[test]
    fn test_build_passthrough_remover() {
        let remover = RemoverConfig::default().build().unwrap();
        assert_eq!(remover.name(), "passthrough");
    }

    #[test]
    fn test_is_excluded_extension() {
        let config = PressConfig {
            excludes: vec!["*.bak".to_string()],
            ..Default::default()
        };

        assert!(config.is_excluded(Path::new("file.bak")));
        assert!(config.is_excluded(Path::new("path/to/file.bak")));
        assert!(!config.is_excluded(Path::new("file.png")));
    }

    #[test]
    fn test_is_excluded_directory() {
        let config = PressConfig {
            excludes: vec!["**/raw/*".to_string()],
            ..Default::default()
        };

        assert!(config.is_excluded(Path::new("raw/foo.png")));
        assert!(config.is_excluded(Path::new("sprites/raw/bar.png")));
        assert!(!config.is_excluded(Path::new("sprites/hero.png")));
    }

    #[test]
    fn test_is_excluded_exact() {
        let config = PressConfig {
            excludes: vec!["temp".to_string()],
            ..Default::default()
        };

        assert!(config.is_excluded(Path::new("temp")));
        assert!(config.is_excluded(Path::new("path/temp/file")));
    }
}
