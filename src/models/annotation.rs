// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the shapes drawn on a frame (rectangles, ellipses
//! and polylines) and the metadata attached to each of them.

use std::fmt;

/// Maximum number of characters kept in a sensor-position field.
pub const MAX_FIELD_LEN: usize = 50;

/// A 2D point in native image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build the box spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width as i32, self.y + self.height as i32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Kind of shape, used for grouping in exports and the review table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
}

impl ShapeKind {
    /// Kinds in the order they are listed and exported.
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Line];
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Line => "Line",
        };
        f.write_str(name)
    }
}

/// Geometry of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle(BoundingBox),
    /// Ellipse inscribed in the bounding box.
    Circle(BoundingBox),
    Polyline(Vec<Point>),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Polyline(_) => ShapeKind::Line,
        }
    }

    /// The two corner points written to the export file: top-left and
    /// bottom-right for boxes, first and last vertex for polylines.
    pub fn extent(&self) -> Option<(Point, Point)> {
        match self {
            Shape::Rectangle(b) | Shape::Circle(b) => Some((b.top_left(), b.bottom_right())),
            Shape::Polyline(points) => Some((*points.first()?, *points.last()?)),
        }
    }
}

/// Fixed vocabulary of object categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Pedestrian,
    ConstructionVehicle,
    Pile,
    Bucket,
    Fork,
    Stone,
    Truck,
    Car,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Pedestrian,
        Category::ConstructionVehicle,
        Category::Pile,
        Category::Bucket,
        Category::Fork,
        Category::Stone,
        Category::Truck,
        Category::Car,
    ];

    /// Label as written to exports and looked up in the colour table.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Pedestrian => "pedestrian",
            Category::ConstructionVehicle => "construction vehicle",
            Category::Pile => "pile",
            Category::Bucket => "bucket",
            Category::Fork => "fork",
            Category::Stone => "stone",
            Category::Truck => "truck",
            Category::Car => "car",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameQuality {
    #[default]
    Clear,
    Blur,
}

impl FrameQuality {
    pub const ALL: [FrameQuality; 2] = [FrameQuality::Clear, FrameQuality::Blur];
}

impl fmt::Display for FrameQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameQuality::Clear => "Clear",
            FrameQuality::Blur => "Blur",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confidence {
    #[default]
    High,
    Medium,
    Low,
}

impl Confidence {
    pub const ALL: [Confidence; 3] = [Confidence::High, Confidence::Medium, Confidence::Low];
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        })
    }
}

/// Free text capped at [`MAX_FIELD_LEN`] characters. Longer input is truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundedText(String);

impl BoundedText {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().chars().take(MAX_FIELD_LEN).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoundedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the recording sensor sits on the vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorPosition {
    pub azimuth: BoundedText,
    pub angle: BoundedText,
    pub position: BoundedText,
    pub height: BoundedText,
}

/// Everything the annotator records about one shape besides its geometry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationMetadata {
    pub category: Category,
    pub quality: FrameQuality,
    pub confidence: Confidence,
    pub sensor: SensorPosition,
}

/// Stable handle to an annotation within one frame's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

/// A committed annotation: geometry plus metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub shape: Shape,
    pub metadata: AnnotationMetadata,
}

impl Annotation {
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn label(&self) -> &'static str {
        self.metadata.category.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_from_reversed_corners() {
        let b = BoundingBox::from_corners(Point::new(50, 40), Point::new(10, 10));
        assert_eq!(b, BoundingBox::new(10, 10, 40, 30));
        assert_eq!(b.bottom_right(), Point::new(50, 40));
    }

    #[test]
    fn test_bounded_text_truncates() {
        let long = "x".repeat(80);
        assert_eq!(BoundedText::new(&long).as_str().len(), MAX_FIELD_LEN);
        assert_eq!(BoundedText::new("front").as_str(), "front");
    }

    #[test]
    fn test_bounded_text_counts_chars_not_bytes() {
        let text = "é".repeat(60);
        assert_eq!(BoundedText::new(text).as_str().chars().count(), MAX_FIELD_LEN);
    }

    #[test]
    fn test_polyline_extent_uses_first_and_last() {
        let line = Shape::Polyline(vec![Point::new(1, 2), Point::new(5, 5), Point::new(9, 3)]);
        assert_eq!(line.extent(), Some((Point::new(1, 2), Point::new(9, 3))));
        assert_eq!(Shape::Polyline(Vec::new()).extent(), None);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::ConstructionVehicle.to_string(), "construction vehicle");
        assert_eq!(Category::ALL.len(), 8);
        assert_eq!(AnnotationMetadata::default().confidence, Confidence::High);
        assert_eq!(AnnotationMetadata::default().quality, FrameQuality::Clear);
    }
}
