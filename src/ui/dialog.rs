// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Category and metadata dialog.
//!
//! Shown after a shape is completed. Confirming commits the shape with the
//! chosen metadata; cancelling drops the shape.

use crate::models::annotation::{
    AnnotationMetadata, BoundedText, Category, Confidence, FrameQuality, SensorPosition, Shape,
    MAX_FIELD_LEN,
};

/// Editable form of [`AnnotationMetadata`], with plain strings for text edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataDraft {
    pub category: Category,
    pub quality: FrameQuality,
    pub confidence: Confidence,
    pub azimuth: String,
    pub angle: String,
    pub position: String,
    pub height: String,
}

impl MetadataDraft {
    pub fn from_metadata(meta: &AnnotationMetadata) -> Self {
        Self {
            category: meta.category,
            quality: meta.quality,
            confidence: meta.confidence,
            azimuth: meta.sensor.azimuth.to_string(),
            angle: meta.sensor.angle.to_string(),
            position: meta.sensor.position.to_string(),
            height: meta.sensor.height.to_string(),
        }
    }

    /// Build the metadata record; over-long text is truncated.
    pub fn to_metadata(&self) -> AnnotationMetadata {
        AnnotationMetadata {
            category: self.category,
            quality: self.quality,
            confidence: self.confidence,
            sensor: SensorPosition {
                azimuth: BoundedText::new(&self.azimuth),
                angle: BoundedText::new(&self.angle),
                position: BoundedText::new(&self.position),
                height: BoundedText::new(&self.height),
            },
        }
    }
}

pub fn category_combo(ui: &mut egui::Ui, id: impl std::hash::Hash, category: &mut Category) {
    egui::ComboBox::from_id_source(id)
        .selected_text(category.label())
        .show_ui(ui, |ui| {
            for option in Category::ALL {
                ui.selectable_value(category, option, option.label());
            }
        });
}

pub fn bounded_text_edit(ui: &mut egui::Ui, text: &mut String) -> egui::Response {
    ui.add(egui::TextEdit::singleline(text).char_limit(MAX_FIELD_LEN))
}

pub enum DialogOutcome {
    Confirmed(Shape, AnnotationMetadata),
    Cancelled(Shape),
}

/// Modal window collecting metadata for one completed shape.
pub struct MetadataDialog {
    shape: Shape,
    draft: MetadataDraft,
}

impl MetadataDialog {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            draft: MetadataDraft::default(),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Draw the dialog. Consumes itself once the user confirms or cancels.
    pub fn show(mut self, ctx: &egui::Context) -> Result<DialogOutcome, Self> {
        let mut confirmed = false;
        let mut cancelled = false;

        egui::Window::new("Select Annotation, Quality, Confidence, and Sensor Position")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Choose an annotation:");
                    category_combo(ui, "dialog_category", &mut self.draft.category);
                });

                ui.group(|ui| {
                    ui.label("Quality");
                    ui.horizontal(|ui| {
                        for q in FrameQuality::ALL {
                            ui.radio_value(&mut self.draft.quality, q, q.to_string());
                        }
                    });
                });

                ui.group(|ui| {
                    ui.label("Confidence Level");
                    ui.horizontal(|ui| {
                        for c in Confidence::ALL {
                            ui.radio_value(&mut self.draft.confidence, c, c.to_string());
                        }
                    });
                });

                ui.group(|ui| {
                    ui.label("Sensor Position");
                    egui::Grid::new("sensor_position").num_columns(2).show(ui, |ui| {
                        ui.label("Azimuth:");
                        bounded_text_edit(ui, &mut self.draft.azimuth);
                        ui.end_row();
                        ui.label("Angle of inclination:");
                        bounded_text_edit(ui, &mut self.draft.angle);
                        ui.end_row();
                        ui.label("Position on the vehicle:");
                        bounded_text_edit(ui, &mut self.draft.position);
                        ui.end_row();
                        ui.label("Height of mounting:");
                        bounded_text_edit(ui, &mut self.draft.height);
                        ui.end_row();
                    });
                });

                ui.separator();
                ui.horizontal(|ui| {
                    confirmed = ui.button("OK").clicked();
                    cancelled = ui.button("Cancel").clicked();
                });
            });

        if confirmed {
            let metadata = self.draft.to_metadata();
            Ok(DialogOutcome::Confirmed(self.shape, metadata))
        } else if cancelled {
            Ok(DialogOutcome::Cancelled(self.shape))
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults() {
        let meta = MetadataDraft::default().to_metadata();
        assert_eq!(meta.category, Category::Pedestrian);
        assert_eq!(meta.quality, FrameQuality::Clear);
        assert_eq!(meta.confidence, Confidence::High);
        assert_eq!(meta.sensor.azimuth.as_str(), "");
    }

    #[test]
    fn test_draft_roundtrip_and_truncation() {
        let draft = MetadataDraft {
            category: Category::Stone,
            quality: FrameQuality::Blur,
            confidence: Confidence::Medium,
            azimuth: "45".into(),
            angle: "10".into(),
            position: "p".repeat(70),
            height: "2".into(),
        };
        let meta = draft.to_metadata();
        assert_eq!(meta.sensor.position.as_str().len(), MAX_FIELD_LEN);

        let back = MetadataDraft::from_metadata(&meta);
        assert_eq!(back.category, Category::Stone);
        assert_eq!(back.azimuth, "45");
        assert_eq!(back.position.len(), MAX_FIELD_LEN);
    }
}
