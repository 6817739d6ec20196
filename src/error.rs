// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the frame source, editor and exporter.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("native video decoding backend is not available")]
    BackendUnavailable,

    #[error("could not open video file: {0}")]
    CannotOpen(PathBuf),

    #[error("please enter a valid frame number (got {input:?})")]
    InvalidFrameNumber { input: String, count: usize },

    #[error("frame number must be between 1 and {count}")]
    FrameOutOfRange { requested: usize, count: usize },

    #[error("no actions to undo")]
    NothingToUndo,

    #[error("video decoding failed: {0}")]
    Decode(String),

    #[error("no frames loaded")]
    NoFrames,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid colour {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("label font could not be loaded: {0}")]
    Font(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "video-opencv")]
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}

pub type Result<T> = std::result::Result<T, AnnotatorError>;
