// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer and tool interaction state machine.
//!
//! The controller turns pointer events on the canvas into shapes. It never
//! touches the annotation store directly: completed shapes are handed back
//! as [`Command`]s, either to be blurred (masking mode) or to be labelled
//! through the metadata dialog (annotation mode).
//!
//! Pointer positions are given in screen pixels relative to the image origin
//! and are divided by the zoom factor before being stored.

use crate::models::annotation::{BoundingBox, Point, Shape};
use crate::util::geometry::{clip_to_image, to_native};

pub const ZOOM_IN_STEP: f32 = 1.1;
pub const ZOOM_OUT_STEP: f32 = 0.9;
const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 20.0;

/// Whether a completed rectangle blurs the frame or becomes an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Masking,
    Annotation,
}

/// Current drawing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Rectangle,
    Circle,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    DraggingRectangle { anchor: Point, bounds: BoundingBox },
    DraggingCircle { anchor: Point, bounds: BoundingBox },
    BuildingPolyline { points: Vec<Point> },
}

/// Work the application must carry out after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Blur this region of the current frame.
    Blur(BoundingBox),
    /// Ask the user for a category and metadata, then commit the shape.
    PromptMetadata(Shape),
}

impl Command {
    /// Clip the region to a `width` x `height` frame. Boxes left with no area
    /// are dropped; polylines pass through unchanged.
    pub fn clipped(self, width: u32, height: u32) -> Option<Command> {
        match self {
            Command::Blur(b) => clip_to_image(&b, width, height).map(Command::Blur),
            Command::PromptMetadata(Shape::Rectangle(b)) => clip_to_image(&b, width, height)
                .map(|b| Command::PromptMetadata(Shape::Rectangle(b))),
            Command::PromptMetadata(Shape::Circle(b)) => clip_to_image(&b, width, height)
                .map(|b| Command::PromptMetadata(Shape::Circle(b))),
            polyline @ Command::PromptMetadata(Shape::Polyline(_)) => Some(polyline),
        }
    }
}

#[derive(Debug)]
pub struct Controller {
    mode: Mode,
    tool: Tool,
    state: InteractionState,
    zoom: f32,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Start in masking mode with the rectangle tool.
    pub fn new() -> Self {
        Self {
            mode: Mode::Masking,
            tool: Tool::Rectangle,
            state: InteractionState::Idle,
            zoom: 1.0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_IN_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom * ZOOM_OUT_STEP);
    }

    /// Switch between masking and annotation. A polyline in progress is
    /// finalised first; masking always uses the rectangle tool.
    pub fn set_mode(&mut self, mode: Mode) -> Option<Command> {
        let finalized = self.finalize();
        self.mode = mode;
        if mode == Mode::Masking {
            self.tool = Tool::Rectangle;
        }
        finalized
    }

    /// Select a drawing tool. Only available in annotation mode. A polyline
    /// in progress is finalised before switching.
    pub fn select_tool(&mut self, tool: Tool) -> Option<Command> {
        if self.mode != Mode::Annotation {
            return None;
        }
        let finalized = self.finalize();
        self.tool = tool;
        if tool == Tool::Line {
            self.state = InteractionState::BuildingPolyline { points: Vec::new() };
        }
        finalized
    }

    pub fn pointer_down(&mut self, screen: (f32, f32), button: Button) {
        if button != Button::Primary {
            return;
        }
        let p = to_native(screen.0, screen.1, self.zoom);

        if self.mode == Mode::Annotation && self.tool == Tool::Line {
            match &mut self.state {
                InteractionState::BuildingPolyline { points } => points.push(p),
                _ => self.state = InteractionState::BuildingPolyline { points: vec![p] },
            }
            return;
        }

        let bounds = BoundingBox::from_corners(p, p);
        self.state = if self.mode == Mode::Masking || self.tool == Tool::Rectangle {
            InteractionState::DraggingRectangle { anchor: p, bounds }
        } else {
            InteractionState::DraggingCircle { anchor: p, bounds }
        };
    }

    pub fn pointer_drag(&mut self, screen: (f32, f32)) {
        let p = to_native(screen.0, screen.1, self.zoom);
        match &mut self.state {
            InteractionState::DraggingRectangle { anchor, bounds }
            | InteractionState::DraggingCircle { anchor, bounds } => {
                *bounds = BoundingBox::from_corners(*anchor, p);
            }
            _ => {}
        }
    }

    pub fn pointer_release(&mut self, screen: (f32, f32), button: Button) -> Option<Command> {
        if button == Button::Secondary {
            return match self.state {
                InteractionState::BuildingPolyline { .. } => self.finalize(),
                _ => None,
            };
        }

        let p = to_native(screen.0, screen.1, self.zoom);
        match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::DraggingRectangle { anchor, .. } => {
                let bounds = BoundingBox::from_corners(anchor, p);
                if bounds.is_empty() {
                    None
                } else if self.mode == Mode::Masking {
                    Some(Command::Blur(bounds))
                } else {
                    Some(Command::PromptMetadata(Shape::Rectangle(bounds)))
                }
            }
            InteractionState::DraggingCircle { anchor, .. } => {
                let bounds = BoundingBox::from_corners(anchor, p);
                (!bounds.is_empty()).then_some(Command::PromptMetadata(Shape::Circle(bounds)))
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Escape: seal the polyline being built.
    pub fn escape(&mut self) -> Option<Command> {
        self.finalize()
    }

    /// Seal a polyline in progress. Non-empty point lists are returned for
    /// labelling; the controller goes back to idle either way.
    pub fn finalize(&mut self) -> Option<Command> {
        match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::BuildingPolyline { points } if !points.is_empty() => {
                log::debug!("Finalised polyline with {} points", points.len());
                Some(Command::PromptMetadata(Shape::Polyline(points)))
            }
            InteractionState::BuildingPolyline { .. } => None,
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Drop any shape in progress without emitting it (frame change, reset).
    pub fn discard_in_progress(&mut self) {
        self.state = match self.state {
            InteractionState::BuildingPolyline { .. } => {
                InteractionState::BuildingPolyline { points: Vec::new() }
            }
            _ => InteractionState::Idle,
        };
    }

    /// Shape currently being drawn, for preview rendering.
    pub fn in_progress(&self) -> Option<Shape> {
        match &self.state {
            InteractionState::Idle => None,
            InteractionState::DraggingRectangle { bounds, .. } => Some(Shape::Rectangle(*bounds)),
            InteractionState::DraggingCircle { bounds, .. } => Some(Shape::Circle(*bounds)),
            InteractionState::BuildingPolyline { points } if points.is_empty() => None,
            InteractionState::BuildingPolyline { points } => Some(Shape::Polyline(points.clone())),
        }
    }
}
