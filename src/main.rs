// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame Annotator
//!
//! A desktop tool for sampling frames from a video, masking regions with a
//! blur and labelling objects with rectangles, circles and polylines.

mod app;
mod config;
mod controller;
mod error;
mod io;
mod models;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::AnnotatorApp;
use config::Settings;
use models::project::ProjectData;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = Settings::discover().context("Failed to load configuration")?;

    // Video from the command line, otherwise ask for one
    let video = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => match rfd::FileDialog::new()
            .set_title("Select a Video File")
            .add_filter("Video Files", &["mp4", "mkv", "avi"])
            .pick_file()
        {
            Some(path) => path,
            None => {
                log::info!("No video file selected.");
                return Ok(());
            }
        },
    };

    let extraction = io::media::extract_frames(&video, settings.frames_per_minute, &settings.output_dir)
        .with_context(|| format!("Failed to extract frames from {}", video.display()))?;

    let label_font = settings.label_font.as_ref().and_then(|path| {
        io::export::load_label_font(path)
            .map_err(|e| log::warn!("Labels will not be drawn in exports: {}", e))
            .ok()
    });

    let video_name = video
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| video.to_string_lossy().into_owned());
    let project = ProjectData::new(video_name, extraction.frames);
    log::info!("Loaded {} frames", project.frame_count());

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Frame Annotator"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Frame Annotator",
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotatorApp::new(settings, project, label_font)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
