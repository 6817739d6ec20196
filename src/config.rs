// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from `application.yaml` in the working directory, or
//! from the file named by `FRAME_ANNOTATOR_CONFIG`. Every key is optional.

use crate::error::{AnnotatorError, Result};
use crate::util::blur::DEFAULT_KERNEL;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FRAME_ANNOTATOR_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "application.yaml";

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `0xRRGGBB` or a bare `RRGGBB`.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if hex.len() != 6 {
            return Err(AnnotatorError::InvalidColor(text.to_string()));
        }
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| AnnotatorError::InvalidColor(text.to_string()))?;
        Ok(Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
    }

    pub fn to_egui(self) -> egui::Color32 {
        egui::Color32::from_rgb(self.r, self.g, self.b)
    }

    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

/// Category label to display colour, with the documented fallbacks.
#[derive(Debug, Clone, Default)]
pub struct CategoryPalette {
    colors: HashMap<String, Color>,
}

impl CategoryPalette {
    pub fn new(colors: HashMap<String, Color>) -> Self {
        Self { colors }
    }

    /// Colour for rectangles and circles; white when the label is unknown.
    pub fn shape_color(&self, label: &str) -> Color {
        self.colors.get(label).copied().unwrap_or(Color::WHITE)
    }

    /// Colour for polylines; black when the label is unknown.
    pub fn line_color(&self, label: &str) -> Color {
        self.colors.get(label).copied().unwrap_or(Color::BLACK)
    }
}

/// Raw YAML layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
struct RawSettings {
    #[serde(alias = "categoryColors")]
    category_colors: HashMap<String, String>,
    frames_per_minute: Option<u32>,
    blur_kernel: Option<u32>,
    output_dir: Option<PathBuf>,
    label_font: Option<PathBuf>,
}

/// Resolved application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub palette: CategoryPalette,
    /// Frames kept per minute of video.
    pub frames_per_minute: u32,
    /// Blur kernel half-width used by masking mode.
    pub blur_kernel: u32,
    /// Root directory for exported images, text files and video metadata.
    pub output_dir: PathBuf,
    /// Font used to burn labels into exported images.
    pub label_font: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            palette: CategoryPalette::default(),
            frames_per_minute: 30,
            blur_kernel: DEFAULT_KERNEL,
            output_dir: PathBuf::from("."),
            label_font: None,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let raw: RawSettings = serde_yaml::from_str(text)?;
        let defaults = Settings::default();

        let colors = raw
            .category_colors
            .iter()
            .map(|(label, hex)| Ok((label.clone(), Color::parse(hex)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        let frames_per_minute = raw.frames_per_minute.unwrap_or(defaults.frames_per_minute);
        if frames_per_minute == 0 {
            return Err(AnnotatorError::Config("frames_per_minute must be positive".into()));
        }

        Ok(Self {
            palette: CategoryPalette::new(colors),
            frames_per_minute,
            blur_kernel: raw.blur_kernel.unwrap_or(defaults.blur_kernel),
            output_dir: raw.output_dir.unwrap_or(defaults.output_dir),
            label_font: raw.label_font,
        })
    }

    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml(&text)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    /// Load from `$FRAME_ANNOTATOR_CONFIG` or `application.yaml`, falling back
    /// to defaults when no file exists.
    pub fn discover() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if path.exists() {
            Self::load(&path)
        } else {
            log::warn!(
                "Configuration {} not found, using default colours and settings",
                path.display()
            );
            Ok(Self::default())
        }
    }
}
