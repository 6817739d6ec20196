// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame navigation bar.
//!
//! Previous/next navigation plus the per-frame save, undo, reset and
//! review actions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineAction {
    None,
    Previous,
    Next,
    Save,
    Undo,
    Reset,
    Info,
}

pub fn show(ui: &mut egui::Ui, has_frames: bool, can_undo: bool) -> TimelineAction {
    let mut action = TimelineAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.add_enabled_ui(has_frames, |ui| {
            if ui.button("⏴ Previous").on_hover_text("Alt+P").clicked() {
                action = TimelineAction::Previous;
            }
            if ui.button("Next ⏵").on_hover_text("Alt+N").clicked() {
                action = TimelineAction::Next;
            }

            ui.separator();

            if ui.button("💾 Save").on_hover_text("Alt+S").clicked() {
                action = TimelineAction::Save;
            }
        });

        // Undo stays clickable so an empty history still reports "nothing to undo"
        let undo = egui::Button::new("⟲ Undo");
        let undo = if can_undo { undo } else { undo.fill(egui::Color32::TRANSPARENT) };
        if ui.add(undo).on_hover_text("Alt+U").clicked() {
            action = TimelineAction::Undo;
        }

        ui.add_enabled_ui(has_frames, |ui| {
            if ui.button("Reset").clicked() {
                action = TimelineAction::Reset;
            }
            if ui.button("ℹ Info").clicked() {
                action = TimelineAction::Info;
            }
        });
    });

    action
}
