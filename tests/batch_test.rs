//! End-to-end batch run over a small directory tree.

use std::fs;
use std::path::Path;

use pixelpress::output::Printer;
use pixelpress::{encode_png, BatchPipeline, Passthrough, PixelGrid, PressConfig, Stage};
use tempfile::tempdir;

fn write_image(path: &Path, width: u32, height: u32, pixel: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let grid = PixelGrid::filled(width, height, pixel).unwrap();
    fs::write(path, encode_png(&grid).unwrap()).unwrap();
}

#[test]
fn test_batch_tree() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sprites");

    // Two compatible frames in the root
    write_image(&input.join("a.png"), 16, 16, &[200, 10, 10, 255]);
    write_image(&input.join("b.png"), 16, 16, &[10, 200, 10, 255]);
    // Heights differ after compression
    write_image(&input.join("walk/1.png"), 16, 8, &[0, 0, 0, 255]);
    write_image(&input.join("walk/2.png"), 16, 16, &[0, 0, 0, 255]);
    // Not divisible by the ratio
    write_image(&input.join("bad/odd.png"), 10, 10, &[0, 0, 0, 255]);
    fs::write(input.join("notes.txt"), "not an image").unwrap();

    let sheets = dir.path().join("sheets");
    let output = dir.path().join("out");
    let config = PressConfig {
        spritesheets: sheets.clone(),
        ..Default::default()
    };

    let report = BatchPipeline::new(&config, &Passthrough)
        .with_sheet_metadata(true)
        .process(&input, &output, &Printer::new())
        .unwrap();

    assert_eq!(report.discovered, 5);
    assert_eq!(report.processed, 4);

    // Compressed outputs mirror the input tree
    let a = image::open(output.join("a.png")).unwrap().to_rgba8();
    assert_eq!(a.dimensions(), (2, 2));
    assert_eq!(a.get_pixel(0, 0).0, [200, 10, 10, 255]);
    assert!(output.join("walk/1.png").exists());
    assert!(!output.join("bad/odd.png").exists());

    // Root spritesheet is named after the input directory
    let sheet = image::open(sheets.join("sprites.png")).unwrap();
    assert_eq!((sheet.width(), sheet.height()), (4, 2));
    assert!(sheets.join("sprites.json").exists());
    assert_eq!(report.spritesheets, vec![sheets.join("sprites.png")]);

    // One compression failure, one spritesheet failure
    assert_eq!(report.failures.len(), 2);
    let stages: Vec<Stage> = report.failures.iter().map(|f| f.stage).collect();
    assert!(stages.contains(&Stage::Compress));
    assert!(stages.contains(&Stage::Spritesheet));
    assert!(!sheets.join("walk/walk.png").exists());

    let json = report.to_json().unwrap();
    assert!(json.contains("\"stage\": \"spritesheet\""));
    assert!(json.contains("\"stage\": \"compress\""));
}

#[test]
fn test_batch_missing_input() {
    let dir = tempdir().unwrap();
    let config = PressConfig::default();
    let result = BatchPipeline::new(&config, &Passthrough).process(
        &dir.path().join("missing"),
        &dir.path().join("out"),
        &Printer::new(),
    );
    assert!(result.is_err());
}
