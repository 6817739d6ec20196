// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the extracted frames (through [`ProjectData`]), the
//! interaction controller and the open dialogs, and routes panel, canvas and
//! keyboard input between them.

use crate::config::Settings;
use crate::controller::{Button, Command, Controller, Mode, Tool};
use crate::io::export;
use crate::models::project::ProjectData;
use crate::ui::canvas::{self, CanvasAction};
use crate::ui::dialog::{DialogOutcome, MetadataDialog};
use crate::ui::properties::{AnnotationTable, PropertiesAction};
use crate::ui::timeline::{self, TimelineAction};
use crate::ui::toolbar::{self, ToolbarAction};
use ab_glyph::FontVec;

/// Margin kept free beside the frame when fitting it into the viewport.
const FIT_MARGIN: f32 = 10.0;

/// Alt-key shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Tool(Tool),
    Mode(Mode),
    Previous,
    Next,
    Save,
    Undo,
    ZoomIn,
    ZoomOut,
}

impl Shortcut {
    /// Action bound to `key` when pressed together with Alt.
    pub fn from_key(key: egui::Key) -> Option<Self> {
        use egui::Key;
        Some(match key {
            Key::R => Shortcut::Tool(Tool::Rectangle),
            Key::C => Shortcut::Tool(Tool::Circle),
            Key::L => Shortcut::Tool(Tool::Line),
            Key::M => Shortcut::Mode(Mode::Masking),
            Key::A => Shortcut::Mode(Mode::Annotation),
            Key::P => Shortcut::Previous,
            Key::N => Shortcut::Next,
            Key::S => Shortcut::Save,
            Key::U => Shortcut::Undo,
            Key::Equals | Key::Plus => Shortcut::ZoomIn,
            Key::Minus => Shortcut::ZoomOut,
            _ => return None,
        })
    }
}

/// Main application state.
pub struct AnnotatorApp {
    settings: Settings,
    project: ProjectData,
    controller: Controller,

    /// Texture of the current frame
    texture: Option<egui::TextureHandle>,
    /// Frame raster changed since the texture was uploaded
    texture_dirty: bool,
    /// Initial zoom has been fitted to the viewport
    fitted: bool,

    go_to_input: String,
    dialog: Option<MetadataDialog>,
    table: Option<AnnotationTable>,
    /// Message shown in a notice window until dismissed
    notice: Option<String>,
    label_font: Option<FontVec>,
}

impl AnnotatorApp {
    pub fn new(settings: Settings, project: ProjectData, label_font: Option<FontVec>) -> Self {
        Self {
            settings,
            project,
            controller: Controller::new(),
            texture: None,
            texture_dirty: true,
            fitted: false,
            go_to_input: String::new(),
            dialog: None,
            table: None,
            notice: None,
            label_font,
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.notice = Some(message);
    }

    fn handle_command(&mut self, command: Option<Command>) {
        let Some((width, height)) = self.project.current_frame().map(|f| f.dimensions()) else {
            return;
        };
        let command = command.and_then(|cmd| {
            let clipped = cmd.clipped(width, height);
            if clipped.is_none() {
                log::debug!("Selection lies outside the frame");
            }
            clipped
        });
        match command {
            Some(Command::Blur(region)) => {
                match self.project.blur(&region, self.settings.blur_kernel) {
                    Ok(Some(_)) => self.texture_dirty = true,
                    Ok(None) => {}
                    Err(e) => self.notify(e.to_string()),
                }
            }
            Some(Command::PromptMetadata(shape)) => {
                self.dialog = Some(MetadataDialog::new(shape));
            }
            None => {}
        }
    }

    fn navigate(&mut self, step: fn(&mut ProjectData)) {
        step(&mut self.project);
        self.frame_changed();
    }

    /// Shapes in progress and open tables belong to the frame that was left.
    fn frame_changed(&mut self) {
        self.controller.discard_in_progress();
        self.table = None;
        self.texture_dirty = true;
    }

    fn go_to(&mut self, input: &str) {
        match self.project.go_to(input) {
            Ok(()) => {
                self.go_to_input.clear();
                self.frame_changed();
            }
            Err(e) => self.notify(e.to_string()),
        }
    }

    fn undo(&mut self) {
        match self.project.undo() {
            Ok(_) => {}
            Err(e) => self.notify(e.to_string()),
        }
    }

    fn reset(&mut self) {
        self.controller.discard_in_progress();
        self.table = None;
        self.project.reset();
    }

    fn save(&mut self) {
        let Some(frame) = self.project.current_frame() else {
            self.notify("No frame to save");
            return;
        };
        let result = export::export_frame(
            &self.settings.output_dir,
            &self.project.video_name,
            self.project.frame_number(),
            frame,
            self.project.annotations(),
            &self.settings.palette,
            self.label_font.as_ref(),
        );
        match result {
            Ok(files) => {
                self.notice = Some(format!(
                    "Saved image to {}\nSaved annotations to {}",
                    files.image.display(),
                    files.text.display()
                ));
            }
            Err(e) => {
                log::error!("Failed to save frame {}: {}", self.project.frame_number(), e);
                self.notice = Some(format!("Failed to save frame: {}", e));
            }
        }
    }

    fn open_table(&mut self) {
        self.table = Some(AnnotationTable::from_store(self.project.annotations()));
    }

    fn apply_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Tool(tool) => {
                let command = self.controller.select_tool(tool);
                self.handle_command(command);
            }
            Shortcut::Mode(mode) => {
                let command = self.controller.set_mode(mode);
                self.handle_command(command);
            }
            Shortcut::Previous => self.navigate(ProjectData::previous),
            Shortcut::Next => self.navigate(ProjectData::next),
            Shortcut::Save => self.save(),
            Shortcut::Undo => self.undo(),
            Shortcut::ZoomIn => self.controller.zoom_in(),
            Shortcut::ZoomOut => self.controller.zoom_out(),
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (escape, shortcuts): (bool, Vec<Shortcut>) = ctx.input(|i| {
            let shortcuts = i
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } if modifiers.alt => Shortcut::from_key(*key),
                    _ => None,
                })
                .collect();
            (i.key_pressed(egui::Key::Escape), shortcuts)
        });

        if escape {
            let command = self.controller.escape();
            self.handle_command(command);
        }
        for shortcut in shortcuts {
            self.apply_shortcut(shortcut);
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_dirty {
            return;
        }
        self.texture_dirty = false;
        self.texture = self.project.current_frame().map(|frame| {
            let size = [frame.width() as usize, frame.height() as usize];
            let image = egui::ColorImage::from_rgb(size, frame.as_raw());
            ctx.load_texture("current_frame", image, egui::TextureOptions::LINEAR)
        });
    }

    fn fit_zoom(&mut self, available: egui::Vec2) {
        if self.fitted {
            return;
        }
        if let Some(frame) = self.project.current_frame() {
            let zoom_x = available.x / (frame.width() as f32 + FIT_MARGIN);
            let zoom_y = available.y / frame.height() as f32;
            self.controller.set_zoom(zoom_x.min(zoom_y));
            log::debug!("Initial zoom {:.3}", self.controller.zoom());
        }
        self.fitted = true;
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        match dialog.show(ctx) {
            Err(open) => self.dialog = Some(open),
            Ok(DialogOutcome::Confirmed(shape, metadata)) => {
                self.project.commit(shape, metadata);
            }
            Ok(DialogOutcome::Cancelled(shape)) => {
                log::info!("Discarded {} without annotation", shape.kind());
            }
        }
    }

    fn show_table(&mut self, ctx: &egui::Context) {
        let Some(table) = self.table.as_mut() else {
            return;
        };
        match table.show(ctx) {
            PropertiesAction::None => {}
            PropertiesAction::Close => self.table = None,
            PropertiesAction::Save(edits) => {
                let count = edits.len();
                for (id, metadata) in edits {
                    if !self.project.update_metadata(id, metadata) {
                        log::warn!("Annotation {:?} no longer exists", id);
                    }
                }
                log::info!("Updated metadata of {} annotations", count);
                self.table = None;
            }
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.notice else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Message")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message.as_str());
                ui.add_space(8.0);
                dismissed = ui.button("OK").clicked();
            });
        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let modal = self.dialog.is_some() || self.notice.is_some();

        if !modal {
            self.handle_keyboard(ctx);
        }
        self.refresh_texture(ctx);

        // Control panel (left side)
        let toolbar_action = egui::SidePanel::left("controls")
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal, |ui| {
                    toolbar::show(
                        ui,
                        self.project.frame_number(),
                        self.project.frame_count(),
                        self.controller.mode(),
                        self.controller.tool(),
                        self.controller.zoom(),
                        &mut self.go_to_input,
                    )
                })
                .inner
            })
            .inner;

        match toolbar_action {
            ToolbarAction::None => {}
            ToolbarAction::GoTo(input) => self.go_to(&input),
            ToolbarAction::SetMode(mode) => self.apply_shortcut(Shortcut::Mode(mode)),
            ToolbarAction::SelectTool(tool) => self.apply_shortcut(Shortcut::Tool(tool)),
            ToolbarAction::ZoomIn => self.controller.zoom_in(),
            ToolbarAction::ZoomOut => self.controller.zoom_out(),
        }

        // Navigation bar (bottom)
        let has_frames = self.project.frame_count() > 0;
        let can_undo = self.project.can_undo();
        let timeline_action = egui::TopBottomPanel::bottom("timeline")
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal, |ui| timeline::show(ui, has_frames, can_undo))
                    .inner
            })
            .inner;

        match timeline_action {
            TimelineAction::None => {}
            TimelineAction::Previous => self.navigate(ProjectData::previous),
            TimelineAction::Next => self.navigate(ProjectData::next),
            TimelineAction::Save => self.save(),
            TimelineAction::Undo => self.undo(),
            TimelineAction::Reset => self.reset(),
            TimelineAction::Info => self.open_table(),
        }

        // Main canvas (center)
        let image_size = self.project.current_frame().map(|f| (f.width(), f.height()));
        // The shape awaiting metadata stays highlighted behind the dialog
        let in_progress = match &self.dialog {
            Some(dialog) => Some(dialog.shape().clone()),
            None => self.controller.in_progress(),
        };
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                self.fit_zoom(ui.available_size());
                canvas::show(
                    ui,
                    &self.texture,
                    image_size,
                    self.controller.zoom(),
                    self.project.annotations(),
                    in_progress.as_ref(),
                    &self.settings.palette,
                    !modal,
                )
            })
            .inner;

        for action in canvas_actions {
            match action {
                CanvasAction::PointerDown(pos) => {
                    self.controller.pointer_down(pos, Button::Primary)
                }
                CanvasAction::Drag(pos) => self.controller.pointer_drag(pos),
                CanvasAction::Release(pos, button) => {
                    let command = self.controller.pointer_release(pos, button);
                    self.handle_command(command);
                }
            }
        }

        self.show_dialog(ctx);
        self.show_table(ctx);
        self.show_notice(ctx);
    }
}
