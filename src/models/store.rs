// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-frame annotation storage.
//!
//! All shapes of a frame live in one ordered collection. Each record carries
//! its own metadata, so geometry and metadata cannot drift out of alignment.

use super::annotation::{Annotation, AnnotationId, AnnotationMetadata, Shape, ShapeKind};

#[derive(Debug, Default)]
pub struct AnnotationStore {
    records: Vec<Annotation>,
    next_id: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation and return its handle.
    pub fn add(&mut self, shape: Shape, metadata: AnnotationMetadata) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        self.records.push(Annotation { id, shape, metadata });
        id
    }

    /// Remove the annotation with the given handle, keeping the order of the rest.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let idx = self.records.iter().position(|a| a.id == id)?;
        Some(self.records.remove(idx))
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.records.iter().find(|a| a.id == id)
    }

    /// Replace the metadata of an annotation. Returns false for unknown handles.
    pub fn update_metadata(&mut self, id: AnnotationId, metadata: AnnotationMetadata) -> bool {
        match self.records.iter_mut().find(|a| a.id == id) {
            Some(annotation) => {
                annotation.metadata = metadata;
                true
            }
            None => false,
        }
    }

    /// All annotations in commit order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.records.iter()
    }

    /// Annotations of one kind, in commit order.
    pub fn of_kind(&self, kind: ShapeKind) -> impl Iterator<Item = &Annotation> {
        self.records.iter().filter(move |a| a.kind() == kind)
    }

    /// Rectangles, then circles, then polylines; each group in commit order.
    pub fn grouped(&self) -> impl Iterator<Item = &Annotation> {
        ShapeKind::ALL.into_iter().flat_map(move |kind| self.of_kind(kind))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{BoundingBox, Category, Point};

    fn meta(category: Category) -> AnnotationMetadata {
        AnnotationMetadata {
            category,
            ..Default::default()
        }
    }

    #[test]
    fn test_add_and_remove_by_handle() {
        let mut store = AnnotationStore::new();
        let a = store.add(Shape::Rectangle(BoundingBox::new(0, 0, 5, 5)), meta(Category::Car));
        let b = store.add(Shape::Circle(BoundingBox::new(1, 1, 4, 4)), meta(Category::Truck));
        let c = store.add(Shape::Rectangle(BoundingBox::new(9, 9, 2, 2)), meta(Category::Pile));

        let removed = store.remove(a).unwrap();
        assert_eq!(removed.metadata.category, Category::Car);
        assert_eq!(store.len(), 2);
        assert!(store.get(b).is_some());
        assert_eq!(store.get(c).unwrap().metadata.category, Category::Pile);
        assert!(store.remove(a).is_none());
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut store = AnnotationStore::new();
        let a = store.add(Shape::Polyline(vec![Point::new(0, 0)]), meta(Category::Fork));
        store.remove(a);
        let b = store.add(Shape::Polyline(vec![Point::new(1, 1)]), meta(Category::Fork));
        assert_ne!(a, b);
    }

    #[test]
    fn test_grouped_orders_by_kind_then_commit() {
        let mut store = AnnotationStore::new();
        store.add(Shape::Polyline(vec![Point::new(0, 0)]), meta(Category::Stone));
        store.add(Shape::Circle(BoundingBox::new(0, 0, 3, 3)), meta(Category::Bucket));
        store.add(Shape::Rectangle(BoundingBox::new(0, 0, 3, 3)), meta(Category::Car));
        store.add(Shape::Rectangle(BoundingBox::new(1, 1, 3, 3)), meta(Category::Truck));

        let labels: Vec<_> = store.grouped().map(|a| a.label()).collect();
        assert_eq!(labels, vec!["car", "truck", "bucket", "stone"]);
    }

    #[test]
    fn test_update_metadata() {
        let mut store = AnnotationStore::new();
        let id = store.add(Shape::Rectangle(BoundingBox::new(0, 0, 5, 5)), meta(Category::Car));
        assert!(store.update_metadata(id, meta(Category::Pedestrian)));
        assert_eq!(store.get(id).unwrap().label(), "pedestrian");
        assert!(!store.update_metadata(AnnotationId(99), meta(Category::Car)));
    }
}
