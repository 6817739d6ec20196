// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for frame display and annotation.
//!
//! This module paints the current frame scaled by the zoom factor together
//! with every committed shape and the shape being drawn, reports pointer
//! events back to the application, and shows a tooltip for the annotation
//! under the mouse.

use crate::config::{CategoryPalette, Color};
use crate::controller::Button;
use crate::models::annotation::{Annotation, Shape};
use crate::models::store::AnnotationStore;
use crate::util::geometry::{
    ellipse_contains, point_segment_distance, rect_contains, scale_box, to_screen,
};

/// Maximum distance, in screen pixels, at which a polyline counts as hovered.
pub const HOVER_TOLERANCE: f32 = 5.0;

const STROKE_WIDTH: f32 = 2.0;
const VERTEX_RADIUS: f32 = 3.0;
const LABEL_SIZE: f32 = 16.0;
const LABEL_OFFSET: f32 = 5.0;
const ELLIPSE_SEGMENTS: usize = 64;

/// Pointer event on the canvas, relative to the image origin in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    PointerDown((f32, f32)),
    Drag((f32, f32)),
    Release((f32, f32), Button),
}

/// Annotation under a screen point: rectangles first, then circles, then
/// polylines; the earliest committed match wins within each kind.
pub fn hit_test(store: &AnnotationStore, screen: (f32, f32), zoom: f32) -> Option<&Annotation> {
    let (px, py) = screen;
    store.grouped().find(|a| match &a.shape {
        Shape::Rectangle(b) => rect_contains(scale_box(b, zoom), px, py),
        Shape::Circle(b) => ellipse_contains(scale_box(b, zoom), px, py),
        Shape::Polyline(points) => points.windows(2).any(|pair| {
            let a = to_screen(pair[0], zoom);
            let b = to_screen(pair[1], zoom);
            point_segment_distance(screen, a, b) < HOVER_TOLERANCE
        }),
    })
}

/// Tooltip rows for an annotation.
pub fn tooltip_rows(annotation: &Annotation) -> Vec<(&'static str, String)> {
    let meta = &annotation.metadata;
    vec![
        ("Shape", annotation.kind().to_string()),
        ("Annotation", meta.category.to_string()),
        ("Confidence", meta.confidence.to_string()),
        ("Quality", meta.quality.to_string()),
        ("Azimuth", meta.sensor.azimuth.to_string()),
        ("Angle", meta.sensor.angle.to_string()),
        ("Position", meta.sensor.position.to_string()),
        ("Height", meta.sensor.height.to_string()),
    ]
}

/// Baseline position of the label for a rectangle or circle whose scaled
/// top-left corner is `(x, y)`.
pub fn label_anchor(x: f32, y: f32) -> (f32, f32) {
    (x, y - LABEL_OFFSET)
}

/// Display the canvas and collect pointer events.
#[allow(clippy::too_many_arguments)]
pub fn show(
    ui: &mut egui::Ui,
    texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    zoom: f32,
    store: &AnnotationStore,
    in_progress: Option<&Shape>,
    palette: &CategoryPalette,
    interactive: bool,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();

    let (Some(texture), Some((img_width, img_height))) = (texture, image_size) else {
        show_welcome(ui);
        return actions;
    };

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let size = egui::vec2(img_width as f32 * zoom, img_height as f32 * zoom);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
            let image_rect = response.rect;
            let origin = image_rect.min;

            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            for annotation in store.grouped() {
                let label = annotation.label();
                let color = match annotation.shape {
                    Shape::Polyline(_) => palette.line_color(label),
                    _ => palette.shape_color(label),
                };
                draw_shape(&painter, origin, zoom, &annotation.shape, color.to_egui(), Some(label));
            }

            if let Some(shape) = in_progress {
                draw_shape(&painter, origin, zoom, shape, Color::YELLOW.to_egui(), None);
            }

            if interactive {
                let relative = |pos: egui::Pos2| (pos.x - origin.x, pos.y - origin.y);
                let (primary_pressed, primary_released, secondary_released, pointer) = ui.input(|i| {
                    (
                        i.pointer.primary_pressed(),
                        i.pointer.primary_released(),
                        i.pointer.secondary_released(),
                        i.pointer.interact_pos(),
                    )
                });

                if let Some(pos) = pointer {
                    if primary_pressed && response.contains_pointer() {
                        actions.push(CanvasAction::PointerDown(relative(pos)));
                    }
                    if response.dragged_by(egui::PointerButton::Primary) {
                        actions.push(CanvasAction::Drag(relative(pos)));
                    }
                    if primary_released {
                        actions.push(CanvasAction::Release(relative(pos), Button::Primary));
                    }
                    if secondary_released && response.contains_pointer() {
                        actions.push(CanvasAction::Release(relative(pos), Button::Secondary));
                    }
                }
            }

            if let Some(hover) = response.hover_pos() {
                if let Some(annotation) = hit_test(store, (hover.x - origin.x, hover.y - origin.y), zoom) {
                    let rows = tooltip_rows(annotation);
                    response.on_hover_ui_at_pointer(|ui| {
                        egui::Grid::new("annotation_tooltip").num_columns(2).show(ui, |ui| {
                            for (name, value) in rows {
                                ui.strong(format!("{}:", name));
                                ui.label(value);
                                ui.end_row();
                            }
                        });
                    });
                }
            }
        });

    actions
}

/// Draw one shape given in native coordinates.
fn draw_shape(
    painter: &egui::Painter,
    origin: egui::Pos2,
    zoom: f32,
    shape: &Shape,
    color: egui::Color32,
    label: Option<&str>,
) {
    let stroke = egui::Stroke::new(STROKE_WIDTH, color);
    let font = egui::FontId::proportional(LABEL_SIZE);

    match shape {
        Shape::Rectangle(b) => {
            let (x, y, w, h) = scale_box(b, zoom);
            let rect = egui::Rect::from_min_size(origin + egui::vec2(x, y), egui::vec2(w, h));
            painter.rect_stroke(rect, 0.0, stroke);
            if let Some(text) = label {
                let (lx, ly) = label_anchor(x, y);
                painter.text(origin + egui::vec2(lx, ly), egui::Align2::LEFT_BOTTOM, text, font, color);
            }
        }
        Shape::Circle(b) => {
            let (x, y, w, h) = scale_box(b, zoom);
            let center = origin + egui::vec2(x + w / 2.0, y + h / 2.0);
            let points: Vec<egui::Pos2> = (0..=ELLIPSE_SEGMENTS)
                .map(|i| {
                    let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
                    center + egui::vec2(w / 2.0 * t.cos(), h / 2.0 * t.sin())
                })
                .collect();
            for pair in points.windows(2) {
                painter.line_segment([pair[0], pair[1]], stroke);
            }
            if let Some(text) = label {
                let (lx, ly) = label_anchor(x, y);
                painter.text(origin + egui::vec2(lx, ly), egui::Align2::LEFT_BOTTOM, text, font, color);
            }
        }
        Shape::Polyline(points) => {
            let screen: Vec<egui::Pos2> = points
                .iter()
                .map(|p| {
                    let (sx, sy) = to_screen(*p, zoom);
                    origin + egui::vec2(sx, sy)
                })
                .collect();
            for pair in screen.windows(2) {
                painter.line_segment([pair[0], pair[1]], stroke);
                if let Some(text) = label {
                    let mid = pair[0] + (pair[1] - pair[0]) / 2.0;
                    painter.text(mid, egui::Align2::LEFT_BOTTOM, text, font.clone(), color);
                }
            }
            for point in &screen {
                painter.circle_filled(*point, VERTEX_RADIUS, color);
            }
        }
    }
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Frame Annotator")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("No frames were extracted from the selected video")
                    .color(egui::Color32::from_gray(180)),
            );
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{AnnotationMetadata, BoundingBox, Category, Point};

    fn meta(category: Category) -> AnnotationMetadata {
        AnnotationMetadata {
            category,
            ..Default::default()
        }
    }

    #[test]
    fn test_hit_rectangle_scaled() {
        let mut store = AnnotationStore::new();
        store.add(Shape::Rectangle(BoundingBox::new(10, 10, 20, 20)), meta(Category::Car));
        assert!(hit_test(&store, (25.0, 25.0), 1.0).is_some());
        assert!(hit_test(&store, (25.0, 25.0), 0.5).is_none());
        assert!(hit_test(&store, (50.0, 50.0), 2.0).is_some());
    }

    #[test]
    fn test_hit_circle_excludes_corners() {
        let mut store = AnnotationStore::new();
        store.add(Shape::Circle(BoundingBox::new(0, 0, 40, 40)), meta(Category::Pile));
        assert!(hit_test(&store, (20.0, 20.0), 1.0).is_some());
        assert!(hit_test(&store, (1.0, 1.0), 1.0).is_none());
    }

    #[test]
    fn test_hit_polyline_within_tolerance() {
        let mut store = AnnotationStore::new();
        store.add(
            Shape::Polyline(vec![Point::new(0, 0), Point::new(100, 0), Point::new(100, 100)]),
            meta(Category::Fork),
        );
        assert!(hit_test(&store, (50.0, 4.0), 1.0).is_some());
        assert!(hit_test(&store, (50.0, 6.0), 1.0).is_none());
        assert!(hit_test(&store, (103.0, 50.0), 1.0).is_some());
        // Tolerance is in screen pixels, after scaling
        assert!(hit_test(&store, (100.0, 4.0), 2.0).is_some());
    }

    #[test]
    fn test_single_point_polyline_never_hovers() {
        let mut store = AnnotationStore::new();
        store.add(Shape::Polyline(vec![Point::new(5, 5)]), meta(Category::Fork));
        assert!(hit_test(&store, (5.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn test_rectangles_win_over_circles() {
        let mut store = AnnotationStore::new();
        store.add(Shape::Circle(BoundingBox::new(0, 0, 40, 40)), meta(Category::Pile));
        store.add(Shape::Rectangle(BoundingBox::new(10, 10, 20, 20)), meta(Category::Car));
        assert_eq!(hit_test(&store, (20.0, 20.0), 1.0).unwrap().label(), "car");
    }

    #[test]
    fn test_label_sits_above_shape() {
        let b = BoundingBox::new(10, 20, 30, 30);
        let (x, y, _, _) = scale_box(&b, 2.0);
        assert_eq!(label_anchor(x, y), (20.0, 35.0));
    }

    #[test]
    fn test_tooltip_rows() {
        let mut store = AnnotationStore::new();
        let id = store.add(Shape::Rectangle(BoundingBox::new(0, 0, 5, 5)), meta(Category::Truck));
        let rows = tooltip_rows(store.get(id).unwrap());
        assert_eq!(rows[0], ("Shape", "Rectangle".to_string()));
        assert_eq!(rows[1], ("Annotation", "truck".to_string()));
        assert_eq!(rows.len(), 8);
    }
}
