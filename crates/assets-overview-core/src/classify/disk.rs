use image::ImageReader;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};

/// What the filesystem says about one file. Zeroed where a read failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskInfo {
    pub size: u64,
    /// Unix seconds, 0 when unknown.
    pub modified: i64,
    /// Width and height from the image header, when one could be read.
    pub dimensions: Option<(u32, u32)>,
}

/// Best-effort metadata read. Never fails: an unreadable file yields zeroed fields.
pub fn read_disk_info(path: &Path, probe_image: bool) -> DiskInfo {
    let mut info = DiskInfo::default();

    match fs::metadata(path) {
        Ok(metadata) => {
            info.size = metadata.len();
            info.modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);
        }
        Err(e) => {
            warn!("Error reading metadata for {}: {}", path.display(), e);
            return info;
        }
    }

    if probe_image {
        info.dimensions = read_image_dimensions(path);
    }
    info
}

/// Header-only dimension probe; the pixel data is never decoded.
pub fn read_image_dimensions(path: &Path) -> Option<(u32, u32)> {
    let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(e) => {
            debug!("Cannot open image {}: {}", path.display(), e);
            return None;
        }
    };
    match reader.into_dimensions() {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            debug!("No readable image header in {}: {}", path.display(), e);
            None
        }
    }
}
