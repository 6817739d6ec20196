// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides conversions between screen coordinates (scaled by
//! the zoom factor) and native image coordinates, plus the containment and
//! distance tests used for hover hit-testing.

use crate::models::annotation::{BoundingBox, Point};

/// Convert a screen position, relative to the image origin, to native pixels.
pub fn to_native(screen_x: f32, screen_y: f32, zoom: f32) -> Point {
    Point::new((screen_x / zoom) as i32, (screen_y / zoom) as i32)
}

/// Convert a native point to screen coordinates relative to the image origin.
pub fn to_screen(point: Point, zoom: f32) -> (f32, f32) {
    (point.x as f32 * zoom, point.y as f32 * zoom)
}

/// Screen-space rectangle `(x, y, width, height)` of a native box.
pub fn scale_box(b: &BoundingBox, zoom: f32) -> (f32, f32, f32, f32) {
    (
        b.x as f32 * zoom,
        b.y as f32 * zoom,
        b.width as f32 * zoom,
        b.height as f32 * zoom,
    )
}

/// Half-open containment: left/top edges inclusive, right/bottom exclusive.
pub fn rect_contains(rect: (f32, f32, f32, f32), px: f32, py: f32) -> bool {
    let (x, y, w, h) = rect;
    px >= x && px < x + w && py >= y && py < y + h
}

/// Whether a point lies inside the ellipse inscribed in `rect`.
pub fn ellipse_contains(rect: (f32, f32, f32, f32), px: f32, py: f32) -> bool {
    let (x, y, w, h) = rect;
    if w <= 0.0 || h <= 0.0 {
        return false;
    }
    let nx = (px - x) / w - 0.5;
    let ny = (py - y) / h - 0.5;
    nx * nx + ny * ny < 0.25
}

/// Distance from `p` to the segment `a`-`b`.
pub fn point_segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

/// Intersect a box with the image bounds `[0, width) x [0, height)`.
/// Returns `None` when nothing of the box lies inside the image.
pub fn clip_to_image(b: &BoundingBox, width: u32, height: u32) -> Option<BoundingBox> {
    let x0 = i64::from(b.x).max(0);
    let y0 = i64::from(b.y).max(0);
    let x1 = (i64::from(b.x) + i64::from(b.width)).min(i64::from(width));
    let y1 = (i64::from(b.y) + i64::from(b.height)).min(i64::from(height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(BoundingBox::new(
        x0 as i32,
        y0 as i32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    ))
}
