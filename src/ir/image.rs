//! Paired image lookup and dimension probing.
//!
//! Only the image header is read; pixel data is never decoded.

use std::path::{Path, PathBuf};

use crate::error::Oid2YoloError;

/// Extensions tried, in order, when pairing a label file with its image.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Pixel dimensions of an image. Both are non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    width: u32,
    height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Result<Self, Oid2YoloError> {
        if width == 0 || height == 0 {
            return Err(Oid2YoloError::InvalidImageSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub(crate) fn as_f64(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}

/// Outcome of looking up the image paired with a label file.
#[derive(Clone, Debug, PartialEq)]
pub enum PairedImage {
    Found { size: ImageSize },
    /// No file with the label's stem and a known image extension exists.
    Missing { expected: PathBuf },
    /// A file exists but its dimensions could not be read.
    Unreadable { path: PathBuf, reason: String },
}

/// Find the image for `stem` inside `class_dir` and read its dimensions.
pub fn probe_paired_image(class_dir: &Path, stem: &str) -> PairedImage {
    let Some(path) = find_image(class_dir, stem) else {
        return PairedImage::Missing {
            expected: class_dir.join(format!("{stem}.{}", IMAGE_EXTENSIONS[0])),
        };
    };

    match read_image_size(&path) {
        Ok(size) => PairedImage::Found { size },
        Err(reason) => PairedImage::Unreadable { path, reason },
    }
}

fn find_image(class_dir: &Path, stem: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| class_dir.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
}

fn read_image_size(path: &Path) -> Result<ImageSize, String> {
    let size = imagesize::size(path).map_err(|source| source.to_string())?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| format!("image width {} does not fit in u32", size.width))?;
    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| format!("image height {} does not fit in u32", size.height))?;

    ImageSize::new(width, height).map_err(|err| err.to_string())
}
