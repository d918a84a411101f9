//! Batch pipeline.
//!
//! Walks an input tree and, per directory: removes backgrounds, compresses
//! each image, mirrors the result under the output root, then assembles a
//! spritesheet once every file in the directory has been handled. Failures
//! are recorded per file or per directory and never stop the batch.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::PressConfig;
use crate::discovery::{scan_directory, ImageDir};
use crate::error::{PressError, Result};
use crate::output::{display_path, plural, Printer};
use crate::removal::BackgroundRemover;
use crate::render::{assemble, decode, write_png, write_sheet_json, SheetMeta};
use crate::types::PixelGrid;

/// Where in the pipeline an item failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Read,
    RemoveBackground,
    Decode,
    Compress,
    Write,
    Spritesheet,
}

/// A recorded, non-fatal failure.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    /// The file (or directory, for spritesheet failures) that failed.
    pub path: PathBuf,
    pub stage: Stage,
    pub message: String,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Image files found under the input root.
    pub discovered: usize,
    /// Files compressed and written successfully.
    pub processed: usize,
    /// Compressed images written.
    pub outputs: Vec<PathBuf>,
    /// Spritesheets written.
    pub spritesheets: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl Report {
    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PressError::Build {
            message: format!("Failed to serialize report: {}", e),
            help: None,
        })
    }
}

/// Directory batch processor.
pub struct BatchPipeline<'a> {
    config: &'a PressConfig,
    remover: &'a dyn BackgroundRemover,
    sheet_metadata: bool,
}

impl<'a> BatchPipeline<'a> {
    pub fn new(config: &'a PressConfig, remover: &'a dyn BackgroundRemover) -> Self {
        Self {
            config,
            remover,
            sheet_metadata: false,
        }
    }

    /// Also write TexturePacker JSON next to each spritesheet.
    pub fn with_sheet_metadata(mut self, enabled: bool) -> Self {
        self.sheet_metadata = enabled;
        self
    }

    /// Process every image directory under `input_root`.
    ///
    /// Only a missing input root or an unwritable output root is fatal;
    /// everything else lands in the report.
    pub fn process(&self, input_root: &Path, output_root: &Path, printer: &Printer) -> Result<Report> {
        if !input_root.is_dir() {
            return Err(PressError::Io {
                path: input_root.to_path_buf(),
                message: "Input directory not found".to_string(),
            });
        }
        let input_root = fs::canonicalize(input_root).map_err(|e| PressError::Io {
            path: input_root.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::create_dir_all(output_root).map_err(|e| PressError::Io {
            path: output_root.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;

        printer.status("Scanning", &display_path(&input_root));
        let scan = scan_directory(&input_root, self.config);

        let mut report = Report {
            discovered: scan.total(),
            ..Default::default()
        };
        printer.info("Found", &plural(scan.total(), "image", "images"));

        for dir in &scan.dirs {
            self.process_dir(dir, output_root, &mut report, printer);
        }

        let summary = format!(
            "{} of {}, {}",
            report.processed,
            plural(report.discovered, "image", "images"),
            plural(report.spritesheets.len(), "spritesheet", "spritesheets")
        );
        if report.is_clean() {
            printer.success("Finished", &summary);
        } else {
            printer.warning(
                "Finished",
                &format!(
                    "{} ({})",
                    summary,
                    plural(report.failures.len(), "failure", "failures")
                ),
            );
        }

        Ok(report)
    }

    fn process_dir(&self, dir: &ImageDir, output_root: &Path, report: &mut Report, printer: &Printer) {
        let out_dir = output_root.join(&dir.relative);
        let mut names = Vec::new();
        let mut compressed = Vec::new();
        // output path -> source written there
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();

        for file in &dir.files {
            let output = out_dir.join(format!("{}.png", file_stem(file)));
            let result = match claimed.get(&output).copied() {
                Some(owner) => Err(Failure {
                    path: file.clone(),
                    stage: Stage::Write,
                    message: format!(
                        "output {} is already written from {}",
                        display_path(&output),
                        display_path(owner)
                    ),
                }),
                None => {
                    let processed = self.process_file(file, &output);
                    if processed.is_ok() {
                        claimed.insert(output.clone(), file.as_path());
                    }
                    processed
                }
            };
            match result {
                Ok((output, grid)) => {
                    printer.status("Compressed", &display_path(&output));
                    report.processed += 1;
                    report.outputs.push(output);
                    names.push(file_stem(file));
                    compressed.push(grid);
                }
                Err(failure) => {
                    warn!(path = %failure.path.display(), stage = ?failure.stage, "{}", failure.message);
                    printer.error("Failed", &format!("{}: {}", display_path(file), failure.message));
                    report.failures.push(failure);
                }
            }
        }

        // Spritesheets need every member compressed first.
        if compressed.len() < 2 {
            debug!(dir = %dir.path.display(), count = compressed.len(), "no spritesheet");
            return;
        }

        let sheet_dir = self.config.spritesheets.join(&dir.relative);
        let sheet_name = dir.sheet_name();
        let sheet_path = sheet_dir.join(format!("{}.png", sheet_name));

        let written = assemble(&compressed).and_then(|sheet| {
            write_png(&sheet, &sheet_path)?;
            if self.sheet_metadata {
                let meta = SheetMeta::for_strip(&format!("{}.png", sheet_name), &names, &compressed);
                write_sheet_json(&meta, &sheet_dir.join(format!("{}.json", sheet_name)))?;
            }
            Ok(())
        });

        match written {
            Ok(()) => {
                printer.success("Assembled", &display_path(&sheet_path));
                report.spritesheets.push(sheet_path);
            }
            Err(e) => {
                warn!(dir = %dir.path.display(), "spritesheet failed: {}", e);
                printer.error("Failed", &format!("spritesheet for {}: {}", display_path(&dir.path), e));
                report.failures.push(Failure {
                    path: dir.path.clone(),
                    stage: Stage::Spritesheet,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Remove background, compress and write one file.
    fn process_file(&self, path: &Path, output: &Path) -> std::result::Result<(PathBuf, PixelGrid), Failure> {
        let fail = |stage: Stage| {
            move |e: PressError| Failure {
                path: path.to_path_buf(),
                stage,
                message: e.to_string(),
            }
        };

        let bytes = fs::read(path)
            .map_err(PressError::from)
            .map_err(fail(Stage::Read))?;
        let cutout = self
            .remover
            .remove_background(&bytes)
            .map_err(fail(Stage::RemoveBackground))?;
        let grid = decode(&cutout).map_err(fail(Stage::Decode))?;
        let compressed = self
            .config
            .compressor()
            .compress(&grid)
            .map_err(fail(Stage::Compress))?;

        write_png(&compressed, output).map_err(fail(Stage::Write))?;

        debug!(
            src = %path.display(),
            dst = %output.display(),
            remover = self.remover.name(),
            "compressed {}x{} -> {}x{}",
            grid.width(),
            grid.height(),
            compressed.width(),
            compressed.height()
        );
        Ok((output.to_path_buf(), compressed))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string()
}
