//! Corner and center bounding boxes, and the conversion between them.

use std::marker::PhantomData;

use super::image::ImageSize;
use super::{Normalized, Pixel};

/// An axis-aligned box given by its corners (xmin, ymin, xmax, ymax).
///
/// The constructor does not enforce `min <= max`. A reversed box converts to
/// a center box with negative width or height rather than failing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            _space: PhantomData,
        }
    }

    /// May be negative if the box is malformed (xmax < xmin).
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// May be negative if the box is malformed (ymax < ymin).
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// An axis-aligned box given by its center and size (cx, cy, w, h).
///
/// This is the YOLO label layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBoxCXCYWH<TSpace> {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxCXCYWH<TSpace> {
    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            cx,
            cy,
            w,
            h,
            _space: PhantomData,
        }
    }

    /// The four values in output order.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.cx, self.cy, self.w, self.h]
    }
}

impl BBoxXYXY<Pixel> {
    /// Converts a pixel corner box into a normalized center box.
    ///
    /// No clamping is applied: a box reaching past the image edge yields
    /// values outside `[0, 1]`.
    pub fn to_normalized_center(&self, size: ImageSize) -> BBoxCXCYWH<Normalized> {
        let (image_w, image_h) = size.as_f64();
        let box_w = self.width();
        let box_h = self.height();
        let cx = self.xmin + box_w / 2.0;
        let cy = self.ymin + box_h / 2.0;

        BBoxCXCYWH::from_cxcywh(cx / image_w, cy / image_h, box_w / image_w, box_h / image_h)
    }
}

impl BBoxCXCYWH<Normalized> {
    /// Converts a normalized center box back into pixel corners.
    pub fn to_pixel_corners(&self, size: ImageSize) -> BBoxXYXY<Pixel> {
        let (image_w, image_h) = size.as_f64();
        let half_w = self.w * image_w / 2.0;
        let half_h = self.h * image_h / 2.0;
        let cx = self.cx * image_w;
        let cy = self.cy * image_h;

        BBoxXYXY::from_xyxy(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }
}
