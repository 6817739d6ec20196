// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video metadata record written once per extracted video.

use crate::error::Result;
use crate::io::media::StreamProperties;
use std::path::{Path, PathBuf};

pub const METADATA_HEADER: &str = "Video Title; Duration (seconds); Resolution; Frame Rate; \
Annotation Type; Confidence Level; Annotation Tool; Date & Time";

const ANNOTATION_TYPE: &str = "Bounding Box";
const TOOL_NAME: &str = "Frame Annotator";

/// Scalar description of a source video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    /// File name of the video, including extension.
    pub title: String,
    pub duration_secs: f64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub created: String,
}

impl VideoMetadata {
    /// Describe the video at `path` from its decoder properties, stamped now.
    pub fn describe(path: &Path, props: &StreamProperties) -> Self {
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let duration_secs = if props.fps > 0.0 {
            props.frame_count / props.fps
        } else {
            0.0
        };
        Self {
            title,
            duration_secs,
            width: props.width,
            height: props.height,
            frame_rate: props.fps,
            created: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        }
    }

    /// The data row that follows [`METADATA_HEADER`].
    pub fn record(&self) -> String {
        format!(
            "{}; {:.2}; {}x{}; {:.2}; {}; {}; {}; {}",
            self.title,
            self.duration_secs,
            self.width,
            self.height,
            self.frame_rate,
            ANNOTATION_TYPE,
            " ",
            TOOL_NAME,
            self.created
        )
    }
}

/// Directory name used for a video's outputs: the title up to its last `.`.
pub fn video_stem(title: &str) -> &str {
    match title.rfind('.') {
        Some(idx) if idx > 0 => &title[..idx],
        _ => title,
    }
}

/// Write `<output_dir>/<stem>/<title>_metadata.txt` and return its path.
pub fn write_metadata(meta: &VideoMetadata, output_dir: &Path) -> Result<PathBuf> {
    let dir = output_dir.join(video_stem(&meta.title));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}_metadata.txt", meta.title));
    std::fs::write(&path, format!("{}\n{}\n", METADATA_HEADER, meta.record()))?;
    log::info!("Metadata file created successfully: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VideoMetadata {
        VideoMetadata {
            title: "drive.mp4".to_string(),
            duration_secs: 10.0,
            width: 1920,
            height: 1080,
            frame_rate: 29.97,
            created: "2025-01-02T03:04:05.000".to_string(),
        }
    }

    #[test]
    fn test_record_format() {
        assert_eq!(
            sample().record(),
            "drive.mp4; 10.00; 1920x1080; 29.97; Bounding Box;  ; Frame Annotator; 2025-01-02T03:04:05.000"
        );
    }

    #[test]
    fn test_describe_computes_duration() {
        let props = StreamProperties {
            frame_count: 300.0,
            fps: 30.0,
            width: 640,
            height: 480,
        };
        let meta = VideoMetadata::describe(Path::new("/videos/site.avi"), &props);
        assert_eq!(meta.title, "site.avi");
        assert_eq!(meta.duration_secs, 10.0);
        assert_eq!((meta.width, meta.height), (640, 480));
    }

    #[test]
    fn test_video_stem() {
        assert_eq!(video_stem("drive.mp4"), "drive");
        assert_eq!(video_stem("my.clip.mkv"), "my.clip");
        assert_eq!(video_stem("noext"), "noext");
    }

    #[test]
    fn test_write_metadata_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_metadata(&sample(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("drive").join("drive.mp4_metadata.txt"));
        let text = std::fs::read_to_string(path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(METADATA_HEADER));
        assert!(lines.next().unwrap().starts_with("drive.mp4; 10.00; 1920x1080"));
    }
}
