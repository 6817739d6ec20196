// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undo history for the annotations of the current frame.

use super::annotation::{Annotation, AnnotationId};
use super::store::AnnotationStore;

/// A recorded mutation of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Add(AnnotationId),
}

/// Append-only edit log; undo pops the most recent edit.
#[derive(Debug, Default)]
pub struct EditLog {
    edits: Vec<Edit>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit that has already been applied to the store.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Revert the most recent edit. Returns the removed annotation, or `None`
    /// when there is nothing left to undo.
    pub fn undo(&mut self, store: &mut AnnotationStore) -> Option<Annotation> {
        match self.edits.pop()? {
            Edit::Add(id) => store.remove(id),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.edits.is_empty()
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }
}
