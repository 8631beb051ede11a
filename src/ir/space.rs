//! Coordinate space markers.
//!
//! Boxes carry one of these as a type parameter so a pixel-space box can
//! never be written out where a normalized one is expected.

/// Absolute pixel positions, origin at the top-left corner of the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Positions divided by the image width or height.
///
/// Values for boxes inside the image fall in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Normalized {}
