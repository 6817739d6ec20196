// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video frame extraction.
//!
//! This module wraps the native video decoder behind the [`FrameDecoder`]
//! trait and samples a fixed number of frames per minute from a video.
//! Decoding is sequential and consumes the decoder exactly once.

use crate::error::{AnnotatorError, Result};
use crate::io::metadata::{self, VideoMetadata};
use image::RgbImage;
use std::path::Path;

/// Frame rate assumed when the decoder cannot report one.
pub const FALLBACK_FPS: f64 = 30.0;

/// Scalar properties reported by a decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamProperties {
    pub frame_count: f64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
}

/// A source of decoded RGB frames.
pub trait FrameDecoder {
    /// Whether the video was opened successfully.
    fn is_opened(&self) -> bool;

    fn properties(&self) -> StreamProperties;

    /// Decode the next frame, or `None` at the end of the stream.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// Result of extracting a video.
#[derive(Debug)]
pub struct Extraction {
    pub frames: Vec<RgbImage>,
    pub metadata: Option<VideoMetadata>,
}

/// Keep one frame out of every `interval` decoded frames.
pub fn sampling_interval(fps: f64, frames_per_minute: u32) -> usize {
    let fps = if fps > 0.0 { fps } else { FALLBACK_FPS };
    let per_second = f64::from(frames_per_minute.max(1)) / 60.0;
    ((fps / per_second).round() as usize).max(1)
}

/// Open a video with the native backend.
#[cfg(feature = "video-opencv")]
pub fn open_video(path: &Path) -> Result<Box<dyn FrameDecoder>> {
    Ok(Box::new(opencv_backend::OpenCvDecoder::open(path)?))
}

/// Without the `video-opencv` feature there is no native backend.
#[cfg(not(feature = "video-opencv"))]
pub fn open_video(path: &Path) -> Result<Box<dyn FrameDecoder>> {
    log::error!(
        "Cannot decode {}: built without a video backend (enable `video-opencv`)",
        path.display()
    );
    Err(AnnotatorError::BackendUnavailable)
}

/// Extract frames from the video at `path`, writing the video metadata file
/// under `output_dir`. Fails only when the backend itself is unavailable.
pub fn extract_frames(path: &Path, frames_per_minute: u32, output_dir: &Path) -> Result<Extraction> {
    let mut decoder = open_video(path)?;
    Ok(extract_from(decoder.as_mut(), path, frames_per_minute, output_dir))
}

/// Sample frames from an already opened decoder.
///
/// A decoder that failed to open yields no metadata and whatever frames it
/// still produces. Metadata write failures are logged and ignored, as are
/// decode errors, which end the stream early.
pub fn extract_from(
    decoder: &mut dyn FrameDecoder,
    path: &Path,
    frames_per_minute: u32,
    output_dir: &Path,
) -> Extraction {
    log::info!("Generating frames for {}", path.display());

    let props = decoder.properties();
    let metadata = if decoder.is_opened() {
        let meta = VideoMetadata::describe(path, &props);
        if let Err(e) = metadata::write_metadata(&meta, output_dir) {
            log::error!("Error writing metadata file: {}", e);
        }
        Some(meta)
    } else {
        log::error!("Could not open video file {}", path.display());
        None
    };

    let interval = sampling_interval(props.fps, frames_per_minute);
    let mut frames = Vec::new();
    let mut index = 0usize;
    loop {
        match decoder.next_frame() {
            Ok(Some(frame)) => {
                if index % interval == 0 {
                    frames.push(frame);
                }
                index += 1;
            }
            Ok(None) => break,
            Err(e) => {
                log::error!("Decoding stopped after {} frames: {}", index, e);
                break;
            }
        }
    }

    log::info!(
        "Extracted {} of {} frames (every {}th)",
        frames.len(),
        index,
        interval
    );
    Extraction { frames, metadata }
}

#[cfg(feature = "video-opencv")]
mod opencv_backend {
    use super::{FrameDecoder, StreamProperties};
    use crate::error::{AnnotatorError, Result};
    use image::RgbImage;
    use opencv::{
        core::Mat,
        imgproc,
        prelude::*,
        videoio::{self, VideoCapture},
    };
    use std::path::Path;

    pub struct OpenCvDecoder {
        cap: VideoCapture,
        opened: bool,
        props: StreamProperties,
    }

    impl OpenCvDecoder {
        pub fn open(path: &Path) -> Result<Self> {
            let path_str = path
                .to_str()
                .ok_or_else(|| AnnotatorError::CannotOpen(path.to_path_buf()))?;
            let cap = VideoCapture::from_file(path_str, videoio::CAP_ANY)?;
            let opened = cap.is_opened()?;
            let props = StreamProperties {
                frame_count: cap.get(videoio::CAP_PROP_FRAME_COUNT)?,
                fps: cap.get(videoio::CAP_PROP_FPS)?,
                width: cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32,
                height: cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32,
            };
            Ok(Self { cap, opened, props })
        }
    }

    impl FrameDecoder for OpenCvDecoder {
        fn is_opened(&self) -> bool {
            self.opened
        }

        fn properties(&self) -> StreamProperties {
            self.props
        }

        fn next_frame(&mut self) -> Result<Option<RgbImage>> {
            if !self.opened {
                return Ok(None);
            }
            let mut bgr = Mat::default();
            if !self.cap.read(&mut bgr)? || bgr.empty() {
                return Ok(None);
            }

            // OpenCV decodes to BGR
            let mut rgb = Mat::default();
            imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
            let width = rgb.cols() as u32;
            let height = rgb.rows() as u32;
            let data = rgb.data_bytes()?.to_vec();
            let image = RgbImage::from_raw(width, height, data).ok_or_else(|| {
                AnnotatorError::Decode(format!("malformed {width}x{height} frame"))
            })?;
            Ok(Some(image))
        }
    }

    impl Drop for OpenCvDecoder {
        fn drop(&mut self) {
            if let Err(e) = self.cap.release() {
                log::warn!("Failed to release video capture: {}", e);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::Rgb;

    /// Decoder producing `count` solid frames whose red channel is the frame index.
    pub(crate) struct SyntheticDecoder {
        pub opened: bool,
        pub count: usize,
        pub fps: f64,
        pub next: usize,
    }

    impl SyntheticDecoder {
        pub(crate) fn new(count: usize, fps: f64) -> Self {
            Self {
                opened: true,
                count,
                fps,
                next: 0,
            }
        }
    }

    impl FrameDecoder for SyntheticDecoder {
        fn is_opened(&self) -> bool {
            self.opened
        }

        fn properties(&self) -> StreamProperties {
            StreamProperties {
                frame_count: self.count as f64,
                fps: self.fps,
                width: 4,
                height: 2,
            }
        }

        fn next_frame(&mut self) -> Result<Option<RgbImage>> {
            if self.next >= self.count {
                return Ok(None);
            }
            let value = (self.next % 256) as u8;
            self.next += 1;
            Ok(Some(RgbImage::from_pixel(4, 2, Rgb([value, 0, 0]))))
        }
    }

    #[test]
    fn test_sampling_interval() {
        assert_eq!(sampling_interval(30.0, 60), 30);
        assert_eq!(sampling_interval(30.0, 30), 60);
        assert_eq!(sampling_interval(25.0, 120), 13);
        // Rates above the native frame rate keep every frame
        assert_eq!(sampling_interval(30.0, 6000), 1);
        assert_eq!(sampling_interval(0.0, 60), 30);
    }

    #[test]
    fn test_extract_keeps_every_interval_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut decoder = SyntheticDecoder::new(300, 30.0);
        let extraction = extract_from(&mut decoder, Path::new("clip.mp4"), 60, dir.path());

        assert_eq!(extraction.frames.len(), 10);
        let kept: Vec<u8> = extraction.frames.iter().map(|f| f.get_pixel(0, 0)[0]).collect();
        let expected: Vec<u8> = (0..10).map(|i| ((i * 30) % 256) as u8).collect();
        assert_eq!(kept, expected);
        assert!(dir.path().join("clip").join("clip.mp4_metadata.txt").exists());
    }

    #[test]
    fn test_extract_exhausts_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let mut decoder = SyntheticDecoder::new(45, 30.0);
        extract_from(&mut decoder, Path::new("a.avi"), 60, dir.path());
        assert_eq!(decoder.next, 45);
        let again = extract_from(&mut decoder, Path::new("a.avi"), 60, dir.path());
        assert!(again.frames.is_empty());
    }

    #[test]
    fn test_unopened_decoder_skips_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let mut decoder = SyntheticDecoder::new(0, 0.0);
        decoder.opened = false;
        let extraction = extract_from(&mut decoder, Path::new("missing.mp4"), 30, dir.path());
        assert!(extraction.frames.is_empty());
        assert!(extraction.metadata.is_none());
        assert!(!dir.path().join("missing").exists());
    }

    #[cfg(not(feature = "video-opencv"))]
    #[test]
    fn test_missing_backend_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_frames(Path::new("clip.mp4"), 30, dir.path());
        assert!(matches!(result, Err(AnnotatorError::BackendUnavailable)));
    }
}
