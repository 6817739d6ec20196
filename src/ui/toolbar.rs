// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mode and tool selection panel.
//!
//! Shows the frame counter with the "go to" field, the masking/annotation
//! mode switch, the shape buttons and the zoom controls.

use crate::controller::{Mode, Tool};

/// What the user asked for in the panel this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    GoTo(String),
    SetMode(Mode),
    SelectTool(Tool),
    ZoomIn,
    ZoomOut,
}

/// Display the panel. `go_to_input` holds the contents of the frame field.
pub fn show(
    ui: &mut egui::Ui,
    frame_number: usize,
    frame_count: usize,
    mode: Mode,
    tool: Tool,
    zoom: f32,
    go_to_input: &mut String,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.heading(format!("Frame Number: {}/{}", frame_number, frame_count));
    ui.horizontal(|ui| {
        ui.label("Go To:");
        let response = ui.add(egui::TextEdit::singleline(go_to_input).desired_width(60.0));
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if submitted || ui.button("Go").clicked() {
            action = ToolbarAction::GoTo(go_to_input.trim().to_string());
        }
    });

    ui.separator();

    ui.label("Mode:");
    if ui.radio(mode == Mode::Masking, "Masking").clicked() && mode != Mode::Masking {
        action = ToolbarAction::SetMode(Mode::Masking);
    }
    if ui.radio(mode == Mode::Annotation, "Annotation").clicked() && mode != Mode::Annotation {
        action = ToolbarAction::SetMode(Mode::Annotation);
    }

    ui.separator();

    ui.label("Shapes:");
    ui.add_enabled_ui(mode == Mode::Annotation, |ui| {
        for (option, text) in [
            (Tool::Rectangle, "▭ Rectangle"),
            (Tool::Circle, "◯ Circle"),
            (Tool::Line, "⟋ Line"),
        ] {
            if ui.selectable_label(tool == option, text).clicked() {
                action = ToolbarAction::SelectTool(option);
            }
        }
    });

    let hint = match (mode, tool) {
        (Mode::Masking, _) => "Drag a rectangle to blur a region",
        (Mode::Annotation, Tool::Rectangle) => "Drag to draw a rectangle",
        (Mode::Annotation, Tool::Circle) => "Drag to draw a circle",
        (Mode::Annotation, Tool::Line) => "Click to add points, Escape or right-click to finish",
    };
    ui.label(egui::RichText::new(hint).italics().weak());

    ui.separator();

    ui.label(format!("Zoom: {:.0}%", zoom * 100.0));
    ui.horizontal(|ui| {
        if ui.button("➕").on_hover_text("Zoom in (Alt+=)").clicked() {
            action = ToolbarAction::ZoomIn;
        }
        if ui.button("➖").on_hover_text("Zoom out (Alt+-)").clicked() {
            action = ToolbarAction::ZoomOut;
        }
    });

    action
}
