// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! A project holds the frames extracted from one video, the index of the
//! frame being annotated, and that frame's annotations and undo history.
//! Annotations live only as long as their frame is displayed: navigating
//! away or resetting discards them.

use super::annotation::{Annotation, AnnotationId, AnnotationMetadata, BoundingBox, Shape};
use super::history::{Edit, EditLog};
use super::store::AnnotationStore;
use crate::error::{AnnotatorError, Result};
use crate::util::blur::box_blur;
use image::RgbImage;

pub struct ProjectData {
    /// File name of the source video.
    pub video_name: String,
    frames: Vec<RgbImage>,
    current: usize,
    annotations: AnnotationStore,
    history: EditLog,
}

impl ProjectData {
    /// Create a project over the extracted frames, positioned at the first one.
    pub fn new(video_name: String, frames: Vec<RgbImage>) -> Self {
        Self {
            video_name,
            frames,
            current: 0,
            annotations: AnnotationStore::new(),
            history: EditLog::new(),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Zero-based index of the current frame.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// One-based frame number as shown to the user and written to exports.
    pub fn frame_number(&self) -> usize {
        self.current + 1
    }

    pub fn current_frame(&self) -> Option<&RgbImage> {
        self.frames.get(self.current)
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Record a confirmed annotation and make it undoable.
    pub fn commit(&mut self, shape: Shape, metadata: AnnotationMetadata) -> AnnotationId {
        let kind = shape.kind();
        let id = self.annotations.add(shape, metadata);
        self.history.push(Edit::Add(id));
        log::info!(
            "Added {} annotation on frame {}, total: {}",
            kind,
            self.frame_number(),
            self.annotations.len()
        );
        id
    }

    /// Undo the most recent commit.
    pub fn undo(&mut self) -> Result<Annotation> {
        let removed = self
            .history
            .undo(&mut self.annotations)
            .ok_or(AnnotatorError::NothingToUndo)?;
        log::info!("Undo {} annotation, total: {}", removed.kind(), self.annotations.len());
        Ok(removed)
    }

    /// Write edited metadata back into an existing annotation.
    pub fn update_metadata(&mut self, id: AnnotationId, metadata: AnnotationMetadata) -> bool {
        self.annotations.update_metadata(id, metadata)
    }

    /// Discard every annotation and the undo history of the current frame.
    pub fn reset(&mut self) {
        self.annotations.clear();
        self.history.clear();
        log::info!("Cleared annotations on frame {}", self.frame_number());
    }

    /// Advance to the next frame, wrapping to the first.
    pub fn next(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.show((self.current + 1) % self.frames.len());
    }

    /// Go back one frame, wrapping to the last.
    pub fn previous(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        let idx = if self.current == 0 {
            self.frames.len() - 1
        } else {
            self.current - 1
        };
        self.show(idx);
    }

    /// Jump to a one-based frame number typed by the user. Invalid input
    /// leaves the project untouched.
    pub fn go_to(&mut self, input: &str) -> Result<()> {
        let count = self.frames.len();
        let requested: usize = input.trim().parse().map_err(|_| AnnotatorError::InvalidFrameNumber {
            input: input.to_string(),
            count,
        })?;
        if requested == 0 || requested > count {
            return Err(AnnotatorError::FrameOutOfRange { requested, count });
        }
        self.show(requested - 1);
        Ok(())
    }

    /// Blur a region of the current frame in place.
    pub fn blur(&mut self, region: &BoundingBox, kernel: u32) -> Result<Option<BoundingBox>> {
        let frame = self
            .frames
            .get_mut(self.current)
            .ok_or(AnnotatorError::NoFrames)?;
        let blurred = box_blur(frame, region, kernel);
        if let Some(b) = &blurred {
            log::info!(
                "Masked region ({}, {}) {}x{} on frame {}",
                b.x,
                b.y,
                b.width,
                b.height,
                self.current + 1
            );
        }
        Ok(blurred)
    }

    fn show(&mut self, idx: usize) {
        self.current = idx;
        self.annotations.clear();
        self.history.clear();
        log::info!("Showing frame {}/{}", idx + 1, self.frames.len());
    }
}
