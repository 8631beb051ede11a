//! Core types for label conversion.
//!
//! Boxes are tagged with their coordinate space so the converter can only
//! write normalized center boxes, and only produce them from pixel corner
//! boxes plus explicit image dimensions.
//!
//! # Example
//!
//! ```
//! use oid2yolo::ir::{BBoxXYXY, ImageSize, Pixel};
//!
//! let size = ImageSize::new(100, 200).unwrap();
//! let bbox = BBoxXYXY::<Pixel>::from_xyxy(10.0, 20.0, 30.0, 80.0);
//! let center = bbox.to_normalized_center(size);
//! assert_eq!(center.to_array(), [0.2, 0.25, 0.2, 0.3]);
//! ```

mod bbox;
pub mod class_map;
mod image;
pub mod label;
pub mod layout;
mod space;

pub use bbox::{BBoxCXCYWH, BBoxXYXY};
pub use class_map::{ClassMap, ClassMapSource, DEFAULT_CLASS_ID};
pub use image::{probe_paired_image, ImageSize, PairedImage, IMAGE_EXTENSIONS};
pub use layout::{ClassDir, DatasetLayout, SplitDir};
pub use space::{Normalized, Pixel};
