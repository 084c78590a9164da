use crate::classify::disk::read_image_dimensions;
use crate::error::Error;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageComparison {
    pub identical_bytes: bool,
    pub same_dimensions: bool,
    pub first_dimensions: (u32, u32),
    pub second_dimensions: (u32, u32),
    pub differing_pixels: u64,
    /// Differing pixels over total pixels, 0.0 to 1.0.
    pub difference_ratio: f64,
}

impl ImageComparison {
    pub fn is_same_picture(&self) -> bool {
        self.identical_bytes || (self.same_dimensions && self.differing_pixels == 0)
    }
}

/// Byte comparison first; only when the bytes differ are both images decoded
/// and compared pixel by pixel. Images of different sizes count as fully different.
pub fn compare_images(first: &Path, second: &Path) -> Result<ImageComparison, Error> {
    let first_bytes = fs::read(first)?;
    let second_bytes = fs::read(second)?;

    if first_bytes == second_bytes {
        let dimensions = read_image_dimensions(first).unwrap_or((0, 0));
        return Ok(ImageComparison {
            identical_bytes: true,
            same_dimensions: true,
            first_dimensions: dimensions,
            second_dimensions: dimensions,
            differing_pixels: 0,
            difference_ratio: 0.0,
        });
    }

    let a = image::load_from_memory(&first_bytes)?.to_rgba8();
    let b = image::load_from_memory(&second_bytes)?.to_rgba8();
    let first_dimensions = a.dimensions();
    let second_dimensions = b.dimensions();

    if first_dimensions != second_dimensions {
        let larger = (a.width() as u64 * a.height() as u64).max(b.width() as u64 * b.height() as u64);
        return Ok(ImageComparison {
            identical_bytes: false,
            same_dimensions: false,
            first_dimensions,
            second_dimensions,
            differing_pixels: larger,
            difference_ratio: if larger > 0 { 1.0 } else { 0.0 },
        });
    }

    let differing_pixels = a
        .pixels()
        .zip(b.pixels())
        .filter(|(pa, pb)| pa != pb)
        .count() as u64;
    let total = a.width() as u64 * a.height() as u64;
    debug!(
        "Compared {} and {}: {} of {} pixels differ",
        first.display(),
        second.display(),
        differing_pixels,
        total
    );

    Ok(ImageComparison {
        identical_bytes: false,
        same_dimensions: true,
        first_dimensions,
        second_dimensions,
        differing_pixels,
        difference_ratio: if total > 0 {
            differing_pixels as f64 / total as f64
        } else {
            0.0
        },
    })
}
