use image::{DynamicImage, GenericImageView, GrayImage, Luma, RgbImage};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use page_tiler::page;
use page_tiler::tiling::{
    pyramids, pyramids_all, resize_all, rotate_clockwise_all, sliding_window, to_grayscale_all,
    PyramidSpec, Resampling, WindowSpec,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct StepTiming {
    name: String,
    time_ms: u64,
    images: usize,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Report {
    pages: usize,
    image_count: usize,
    total_time_ms: u64,
    steps: Vec<StepTiming>,
}

/// Build a PDF with one DeviceGray image per page, `(width, height, fill)` each
fn scanned_pdf(pages: &[(i64, i64, u8)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for (i, &(width, height, fill)) in pages.iter().enumerate() {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8_i64,
            },
            vec![fill; (width * height) as usize],
        ));
        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! { format!("Im{}", i) => image_id },
        });
        let content = format!("q {} 0 0 {} 0 0 cm /Im{} Do Q", width, height, i);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), width.into(), height.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("Failed to write PDF");
    buf
}

fn gradient_page(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

fn run_tiler(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_page-tiler"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run page-tiler")
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

// ============================================================================
// Library
// ============================================================================

#[test]
fn test_load_pdf_pages_in_order() {
    let pdf = scanned_pdf(&[(30, 20, 10), (40, 50, 200)]);
    let pages = page::load_bytes(&pdf).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].dimensions(), (30, 20));
    assert_eq!(pages[1].dimensions(), (40, 50));
    assert_eq!(pages[0].to_luma8().get_pixel(0, 0).0[0], 10);
    assert_eq!(pages[1].to_luma8().get_pixel(39, 49).0[0], 200);
}

#[test]
fn test_load_pdf_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.pdf");
    fs::write(&path, scanned_pdf(&[(64, 48, 90)])).unwrap();

    let pages = page::load(&path).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].dimensions(), (64, 48));
}

#[test]
fn test_load_image_file_is_one_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.png");
    gradient_page(33, 21).save(&path).unwrap();

    let pages = page::load(&path).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].dimensions(), (33, 21));
}

#[test]
fn test_window_scenarios() {
    let spec = WindowSpec::new(20, 10).unwrap();
    let crops = sliding_window(&gradient_page(100, 100), spec).unwrap();
    assert_eq!(crops.len(), 64);
    assert!(crops.iter().all(|c| c.image.dimensions() == (20, 20)));

    let oversized = WindowSpec::new(60, 6).unwrap();
    assert!(sliding_window(&gradient_page(50, 50), oversized)
        .unwrap()
        .is_empty());
}

#[test]
fn test_pyramid_scenario() {
    let spec = PyramidSpec::new(&[20, 30], 16, Resampling::Bicubic).unwrap();
    let result = pyramids(&gradient_page(100, 100), &spec).unwrap();

    let small = WindowSpec::new(20, 2).unwrap().count(100, 100);
    let large = WindowSpec::new(30, 3).unwrap().count(100, 100);
    assert_eq!(result.len(), small + large);
    assert!(result.iter().all(|i| i.dimensions() == (16, 16)));
}

#[test]
fn test_pyramid_first_crop_matches_window() {
    let page = gradient_page(60, 60);
    let spec = PyramidSpec::new(&[20], 20, Resampling::Nearest).unwrap();
    let pyramid = pyramids(&page, &spec).unwrap();
    let window = sliding_window(&page, WindowSpec::new(20, 2).unwrap()).unwrap();

    // Same-size resize leaves pixels alone, so level order is window order
    assert_eq!(pyramid.len(), window.len());
    assert_eq!(pyramid[0].to_rgb8(), window[0].image.to_rgb8());
    assert_eq!(pyramid[5].to_rgb8(), window[5].image.to_rgb8());
}

#[test]
fn test_batch_operations_follow_input() {
    let pdf = scanned_pdf(&[(80, 60, 50), (30, 30, 100)]);
    let pages = page::load_bytes(&pdf).unwrap();

    let rotated = rotate_clockwise_all(&pages, 90.0);
    assert_eq!(rotated[0].dimensions(), (60, 80));

    let gray = to_grayscale_all(&rotated);
    assert_eq!(gray.len(), 2);

    let spec = PyramidSpec::new(&[20], 8, Resampling::Lanczos).unwrap();
    let per_page = pyramids_all(&gray, &spec).unwrap();
    assert_eq!(per_page.len(), 2);
    assert_eq!(per_page[0].len(), WindowSpec::new(20, 2).unwrap().count(60, 80));
    assert_eq!(per_page[1].len(), WindowSpec::new(20, 2).unwrap().count(30, 30));

    let resized = resize_all(&per_page[1], 4, Resampling::Nearest).unwrap();
    assert!(resized.iter().all(|i| i.dimensions() == (4, 4)));
}

#[test]
fn test_save_sequence_to_jpg() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![gradient_page(10, 10), gradient_page(12, 8)];
    page::save_all(&images, &dir.path().join("page.jpg")).unwrap();

    assert_eq!(
        files_in(dir.path()),
        vec![dir.path().join("page0.jpg"), dir.path().join("page1.jpg")]
    );
}

// ============================================================================
// Binary
// ============================================================================

#[test]
fn test_cli_window_with_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan.pdf");
    fs::write(&input, scanned_pdf(&[(100, 100, 30)])).unwrap();
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let output = run_tiler(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        out_dir.join("crop.png").to_str().unwrap(),
        "--window-size",
        "20",
        "--step",
        "10",
        "--target-size",
        "8",
        "--resampling",
        "bilinear",
        "--report",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: Report = serde_json::from_slice(&output.stdout).expect("Invalid report");
    assert_eq!(report.pages, 1);
    assert_eq!(report.image_count, 64);
    let names: Vec<&str> = report.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["window", "resize"]);

    let files = files_in(&out_dir);
    assert_eq!(files.len(), 64);
    assert!(out_dir.join("crop0.png").exists());
    assert!(out_dir.join("crop63.png").exists());
    assert_eq!(image::open(&files[0]).unwrap().dimensions(), (8, 8));
}

#[test]
fn test_cli_pyramid_on_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.png");
    gradient_page(50, 50).save(&input).unwrap();
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let output = run_tiler(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        out_dir.join("tile.png").to_str().unwrap(),
        "--grayscale",
        "--pyramid-sizes",
        "20,40",
        "--target-size",
        "10",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let expected = WindowSpec::new(20, 2).unwrap().count(50, 50)
        + WindowSpec::new(40, 4).unwrap().count(50, 50);
    assert_eq!(files_in(&out_dir).len(), expected);
}

#[test]
fn test_cli_single_result_keeps_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.png");
    gradient_page(20, 30).save(&input).unwrap();
    let output_path = dir.path().join("rotated.png");

    let output = run_tiler(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
        "--rotate",
        "90",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(image::open(&output_path).unwrap().dimensions(), (30, 20));
}

#[test]
fn test_cli_single_crop_is_still_numbered() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.png");
    gradient_page(25, 25).save(&input).unwrap();
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    // 20px windows at step 10 fit exactly once on a 25px page
    let output = run_tiler(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        out_dir.join("crop.png").to_str().unwrap(),
        "--window-size",
        "20",
        "--step",
        "10",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(files_in(&out_dir), vec![out_dir.join("crop0.png")]);
}

#[test]
fn test_cli_rejects_degenerate_level_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.png");
    DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([1])))
        .save(&input)
        .unwrap();
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let output = run_tiler(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        out_dir.join("tile.png").to_str().unwrap(),
        "--pyramid-sizes",
        "20,5",
        "--target-size",
        "10",
    ]);
    assert!(!output.status.success());
    assert!(files_in(&out_dir).is_empty());
}

#[test]
fn test_cli_rejects_unknown_resampling_before_reading_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_tiler(&[
        "--input",
        dir.path().join("missing.pdf").to_str().unwrap(),
        "--output",
        dir.path().join("out.png").to_str().unwrap(),
        "--target-size",
        "10",
        "--resampling",
        "hamming",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid resampling method"), "{}", stderr);
}
