// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation review table.
//!
//! Lists every annotation on the current frame and lets the user edit its
//! metadata. Edits are kept in a draft until "Save Changes" is pressed.

use super::dialog::{bounded_text_edit, category_combo, MetadataDraft};
use crate::models::annotation::{AnnotationId, AnnotationMetadata, Confidence, FrameQuality, ShapeKind};
use crate::models::store::AnnotationStore;

/// One editable row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: AnnotationId,
    pub kind: ShapeKind,
    pub draft: MetadataDraft,
}

/// Result of drawing the table for one frame.
pub enum PropertiesAction {
    None,
    /// Write these metadata records back and close the table.
    Save(Vec<(AnnotationId, AnnotationMetadata)>),
    Close,
}

pub struct AnnotationTable {
    rows: Vec<TableRow>,
}

impl AnnotationTable {
    /// Snapshot the store: rectangles, then circles, then polylines.
    pub fn from_store(store: &AnnotationStore) -> Self {
        let rows = store
            .grouped()
            .map(|a| TableRow {
                id: a.id,
                kind: a.kind(),
                draft: MetadataDraft::from_metadata(&a.metadata),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [TableRow] {
        &mut self.rows
    }

    /// Metadata to write back for every row.
    pub fn edits(&self) -> Vec<(AnnotationId, AnnotationMetadata)> {
        self.rows
            .iter()
            .map(|row| (row.id, row.draft.to_metadata()))
            .collect()
    }

    pub fn show(&mut self, ctx: &egui::Context) -> PropertiesAction {
        let mut action = PropertiesAction::None;
        let mut open = true;

        egui::Window::new("Annotation Information")
            .open(&mut open)
            .default_size([900.0, 400.0])
            .show(ctx, |ui| {
                if self.rows.is_empty() {
                    ui.label(egui::RichText::new("No annotations on this frame").weak());
                }

                egui::ScrollArea::both().max_height(320.0).show(ui, |ui| {
                    egui::Grid::new("annotation_table")
                        .striped(true)
                        .num_columns(8)
                        .show(ui, |ui| {
                            for header in [
                                "Shape", "Annotation", "Confidence", "Quality", "Azimuth", "Angle",
                                "Position", "Height",
                            ] {
                                ui.strong(header);
                            }
                            ui.end_row();

                            for (i, row) in self.rows.iter_mut().enumerate() {
                                ui.label(row.kind.to_string());
                                category_combo(ui, ("table_category", i), &mut row.draft.category);
                                egui::ComboBox::from_id_source(("table_confidence", i))
                                    .selected_text(row.draft.confidence.to_string())
                                    .show_ui(ui, |ui| {
                                        for c in Confidence::ALL {
                                            ui.selectable_value(&mut row.draft.confidence, c, c.to_string());
                                        }
                                    });
                                egui::ComboBox::from_id_source(("table_quality", i))
                                    .selected_text(row.draft.quality.to_string())
                                    .show_ui(ui, |ui| {
                                        for q in FrameQuality::ALL {
                                            ui.selectable_value(&mut row.draft.quality, q, q.to_string());
                                        }
                                    });
                                bounded_text_edit(ui, &mut row.draft.azimuth);
                                bounded_text_edit(ui, &mut row.draft.angle);
                                bounded_text_edit(ui, &mut row.draft.position);
                                bounded_text_edit(ui, &mut row.draft.height);
                                ui.end_row();
                            }
                        });
                });

                ui.separator();
                if ui.button("Save Changes").clicked() {
                    action = PropertiesAction::Save(self.edits());
                }
            });

        if !open {
            return PropertiesAction::Close;
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{BoundingBox, Category, Point, Shape};

    #[test]
    fn test_rows_follow_kind_order() {
        let mut store = AnnotationStore::new();
        store.add(Shape::Polyline(vec![Point::new(0, 0)]), AnnotationMetadata::default());
        store.add(Shape::Rectangle(BoundingBox::new(0, 0, 2, 2)), AnnotationMetadata::default());
        store.add(Shape::Circle(BoundingBox::new(0, 0, 2, 2)), AnnotationMetadata::default());

        let table = AnnotationTable::from_store(&store);
        let kinds: Vec<ShapeKind> = table.rows().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Line]);
    }

    #[test]
    fn test_edits_write_back_to_store() {
        let mut store = AnnotationStore::new();
        let rect = store.add(Shape::Rectangle(BoundingBox::new(0, 0, 2, 2)), AnnotationMetadata::default());
        let line = store.add(Shape::Polyline(vec![Point::new(1, 1)]), AnnotationMetadata::default());

        let mut table = AnnotationTable::from_store(&store);
        table.rows_mut()[1].draft.category = Category::Truck;
        table.rows_mut()[1].draft.confidence = Confidence::Low;
        table.rows_mut()[0].draft.height = "2.1".into();

        for (id, meta) in table.edits() {
            assert!(store.update_metadata(id, meta));
        }
        assert_eq!(store.get(line).unwrap().label(), "truck");
        assert_eq!(store.get(line).unwrap().metadata.confidence, Confidence::Low);
        assert_eq!(store.get(rect).unwrap().metadata.sensor.height.as_str(), "2.1");
        assert_eq!(store.get(rect).unwrap().label(), "pedestrian");
    }
}
