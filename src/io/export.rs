// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Export of an annotated frame.
//!
//! A save produces two files under `<output>/<video stem>/`:
//! `images/<timestamp>_frame_<n>.jpg` with every shape burned in at native
//! resolution, and `yolo_txt/<timestamp>_frame_<n>.txt` with one
//! semicolon-separated row per shape.

use crate::config::CategoryPalette;
use crate::error::{AnnotatorError, Result};
use crate::io::metadata::video_stem;
use crate::models::annotation::{Annotation, BoundingBox, Point, Shape};
use crate::models::store::AnnotationStore;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_ellipse_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_text_mut,
};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

pub const ANNOTATION_HEADER: &str = "Frame Number; Annotation; Top-left; Bottom-right; \
Frame Quality; Confidence Level; Azimuth; Angle_of_inclination; position_on_the_vehicle; \
height_of_mounting";

/// Timestamp format used in exported file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H_%M_%S";

const STROKE_WIDTH: u32 = 2;
const VERTEX_RADIUS: i32 = 3;
const LABEL_SIZE: f32 = 16.0;
const LABEL_OFFSET: i32 = 5;

/// Paths written by one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub image: PathBuf,
    pub text: PathBuf,
}

/// Load the font used for labels in exported images.
pub fn load_label_font(path: &Path) -> Result<FontVec> {
    let bytes = std::fs::read(path)?;
    FontVec::try_from_vec(bytes).map_err(|e| AnnotatorError::Font(format!("{}: {}", path.display(), e)))
}

/// One text row for an annotation on frame `frame_number` (1-based).
pub fn format_record(frame_number: usize, annotation: &Annotation) -> Option<String> {
    let (a, b) = annotation.shape.extent()?;
    let meta = &annotation.metadata;
    Some(format!(
        "{}; {}; ({}, {}); ({}, {}); {}; {}; {}; {}; {}; {}",
        frame_number,
        meta.category,
        a.x,
        a.y,
        b.x,
        b.y,
        meta.quality,
        meta.confidence,
        meta.sensor.azimuth,
        meta.sensor.angle,
        meta.sensor.position,
        meta.sensor.height
    ))
}

/// Full text file contents: header plus rectangles, circles, then polylines.
pub fn format_records(frame_number: usize, store: &AnnotationStore) -> String {
    let mut text = String::from(ANNOTATION_HEADER);
    text.push('\n');
    for record in store.grouped().filter_map(|a| format_record(frame_number, a)) {
        text.push_str(&record);
        text.push('\n');
    }
    text
}

/// Copy of `frame` with every annotation drawn at native scale.
pub fn render_annotated(
    frame: &RgbImage,
    store: &AnnotationStore,
    palette: &CategoryPalette,
    font: Option<&FontVec>,
) -> RgbImage {
    let mut canvas = frame.clone();
    for annotation in store.grouped() {
        let label = annotation.label();
        match &annotation.shape {
            Shape::Rectangle(b) => {
                let color = palette.shape_color(label).to_rgb();
                stroke_rect(&mut canvas, b, color);
                draw_label(&mut canvas, font, color, b.x, b.y - LABEL_OFFSET, label);
            }
            Shape::Circle(b) => {
                let color = palette.shape_color(label).to_rgb();
                stroke_ellipse(&mut canvas, b, color);
                draw_label(&mut canvas, font, color, b.x, b.y - LABEL_OFFSET, label);
            }
            Shape::Polyline(points) => {
                let color = palette.line_color(label).to_rgb();
                draw_polyline(&mut canvas, points, color, font, label);
            }
        }
    }
    canvas
}

fn stroke_rect(canvas: &mut RgbImage, b: &BoundingBox, color: Rgb<u8>) {
    if b.is_empty() {
        return;
    }
    for inset in 0..STROKE_WIDTH.min(b.width / 2).min(b.height / 2).max(1) {
        let rect = Rect::at(b.x + inset as i32, b.y + inset as i32)
            .of_size(b.width - 2 * inset, b.height - 2 * inset);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

fn stroke_ellipse(canvas: &mut RgbImage, b: &BoundingBox, color: Rgb<u8>) {
    let rx = (b.width / 2) as i32;
    let ry = (b.height / 2) as i32;
    let center = (b.x + rx, b.y + ry);
    for inset in 0..STROKE_WIDTH as i32 {
        if rx - inset <= 0 || ry - inset <= 0 {
            break;
        }
        draw_hollow_ellipse_mut(canvas, center, rx - inset, ry - inset, color);
    }
}

fn draw_polyline(
    canvas: &mut RgbImage,
    points: &[Point],
    color: Rgb<u8>,
    font: Option<&FontVec>,
    label: &str,
) {
    for (k, p) in points.iter().enumerate() {
        draw_filled_circle_mut(canvas, (p.x, p.y), VERTEX_RADIUS, color);
        if k > 0 {
            let prev = points[k - 1];
            draw_line_segment_mut(
                canvas,
                (prev.x as f32, prev.y as f32),
                (p.x as f32, p.y as f32),
                color,
            );
            draw_label(canvas, font, color, (prev.x + p.x) / 2, (prev.y + p.y) / 2, label);
        }
    }
}

fn draw_label(canvas: &mut RgbImage, font: Option<&FontVec>, color: Rgb<u8>, x: i32, y: i32, text: &str) {
    if let Some(font) = font {
        // Anchor is the text baseline; imageproc positions by the top edge
        let top = y - LABEL_SIZE as i32;
        draw_text_mut(canvas, color, x, top, PxScale::from(LABEL_SIZE), font, text);
    }
}

/// Directory layout for one video's exports.
pub fn export_paths(output_dir: &Path, video_name: &str, timestamp: &str, frame_number: usize) -> ExportedFiles {
    let root = output_dir.join(video_stem(video_name));
    let name = format!("{}_frame_{}", timestamp, frame_number);
    ExportedFiles {
        image: root.join("images").join(format!("{}.jpg", name)),
        text: root.join("yolo_txt").join(format!("{}.txt", name)),
    }
}

/// Write the annotated JPEG and its text file. Directories are created as
/// needed. The two writes are not atomic: a failure on the text file leaves
/// the image in place.
pub fn export_frame(
    output_dir: &Path,
    video_name: &str,
    frame_number: usize,
    frame: &RgbImage,
    store: &AnnotationStore,
    palette: &CategoryPalette,
    font: Option<&FontVec>,
) -> Result<ExportedFiles> {
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let files = export_paths(output_dir, video_name, &timestamp, frame_number);

    let annotated = render_annotated(frame, store, palette, font);
    if let Some(dir) = files.image.parent() {
        std::fs::create_dir_all(dir)?;
    }
    annotated.save(&files.image)?;

    if let Some(dir) = files.text.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&files.text, format_records(frame_number, store))?;

    log::info!(
        "Image saved: {} Text file saved: {}",
        files.image.display(),
        files.text.display()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::models::annotation::{
        AnnotationMetadata, BoundedText, Category, Confidence, FrameQuality, SensorPosition,
    };
    use std::collections::HashMap;

    fn car_metadata() -> AnnotationMetadata {
        AnnotationMetadata {
            category: Category::Car,
            quality: FrameQuality::Clear,
            confidence: Confidence::High,
            sensor: SensorPosition {
                azimuth: BoundedText::new("0"),
                angle: BoundedText::new("0"),
                position: BoundedText::new("front"),
                height: BoundedText::new("1.5"),
            },
        }
    }

    #[test]
    fn test_rectangle_record() {
        let mut store = AnnotationStore::new();
        store.add(
            Shape::Rectangle(BoundingBox::from_corners(Point::new(10, 10), Point::new(50, 40))),
            car_metadata(),
        );
        let text = format_records(1, &store);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ANNOTATION_HEADER);
        assert_eq!(lines[1], "1; car; (10, 10); (50, 40); Clear; High; 0; 0; front; 1.5");
    }

    #[test]
    fn test_polyline_record_uses_endpoints() {
        let mut store = AnnotationStore::new();
        let meta = AnnotationMetadata {
            category: Category::ConstructionVehicle,
            quality: FrameQuality::Blur,
            confidence: Confidence::Low,
            ..Default::default()
        };
        store.add(
            Shape::Polyline(vec![Point::new(1, 2), Point::new(8, 8), Point::new(20, 5)]),
            meta,
        );
        let text = format_records(3, &store);
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "3; construction vehicle; (1, 2); (20, 5); Blur; Low; ; ; ; "
        );
    }

    #[test]
    fn test_empty_store_has_header_only() {
        let text = format_records(7, &AnnotationStore::new());
        assert_eq!(text, format!("{}\n", ANNOTATION_HEADER));
    }

    #[test]
    fn test_records_grouped_by_kind() {
        let mut store = AnnotationStore::new();
        store.add(Shape::Circle(BoundingBox::new(0, 0, 4, 4)), AnnotationMetadata::default());
        store.add(Shape::Rectangle(BoundingBox::new(0, 0, 4, 4)), car_metadata());
        let text = format_records(1, &store);
        let labels: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.split("; ").nth(1).unwrap())
            .collect();
        assert_eq!(labels, vec!["car", "pedestrian"]);
    }

    #[test]
    fn test_render_draws_in_category_color() {
        let frame = RgbImage::from_pixel(60, 60, Rgb([0, 0, 0]));
        let mut store = AnnotationStore::new();
        store.add(Shape::Rectangle(BoundingBox::new(10, 10, 20, 20)), car_metadata());
        let palette = CategoryPalette::new(HashMap::from([("car".to_string(), Color::rgb(255, 0, 0))]));

        let out = render_annotated(&frame, &store, &palette, None);
        assert_eq!(*out.get_pixel(10, 10), Rgb([255, 0, 0]));
        assert_eq!(*out.get_pixel(11, 11), Rgb([255, 0, 0]));
        assert_eq!(*out.get_pixel(20, 20), Rgb([0, 0, 0]));
        // Source frame untouched
        assert_eq!(*frame.get_pixel(10, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_render_fallback_colors() {
        let frame = RgbImage::from_pixel(40, 40, Rgb([100, 100, 100]));
        let mut store = AnnotationStore::new();
        store.add(Shape::Rectangle(BoundingBox::new(2, 2, 10, 10)), car_metadata());
        store.add(
            Shape::Polyline(vec![Point::new(20, 30), Point::new(35, 30)]),
            car_metadata(),
        );
        let out = render_annotated(&frame, &store, &CategoryPalette::default(), None);
        assert_eq!(*out.get_pixel(2, 2), Rgb([255, 255, 255]));
        assert_eq!(*out.get_pixel(28, 30), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_export_paths_layout() {
        let files = export_paths(Path::new("out"), "drive.mp4", "20250101_10_00_00", 4);
        assert_eq!(
            files.image,
            PathBuf::from("out/drive/images/20250101_10_00_00_frame_4.jpg")
        );
        assert_eq!(
            files.text,
            PathBuf::from("out/drive/yolo_txt/20250101_10_00_00_frame_4.txt")
        );
    }

    #[test]
    fn test_export_frame_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let frame = RgbImage::from_pixel(64, 48, Rgb([30, 60, 90]));
        let mut store = AnnotationStore::new();
        store.add(Shape::Circle(BoundingBox::new(5, 5, 20, 10)), car_metadata());

        let files = export_frame(
            dir.path(),
            "drive.mp4",
            2,
            &frame,
            &store,
            &CategoryPalette::default(),
            None,
        )
        .unwrap();

        assert!(files.image.starts_with(dir.path().join("drive").join("images")));
        let reloaded = image::open(&files.image).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (64, 48));
        let text = std::fs::read_to_string(&files.text).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("2; car; (5, 5); (25, 15)"));
    }

    #[test]
    fn test_missing_font_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_label_font(&dir.path().join("none.ttf")).is_err());
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(matches!(load_label_font(&bogus), Err(AnnotatorError::Font(_))));
    }
}
