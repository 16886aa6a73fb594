// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport, which describes a relationship between a
//! rectangle on the integral plane with an origin at 0,0 and a
//! rectangle on the complex plane, given by its centre and its real
//! width.  The imaginary height follows from the aspect ratio of the
//! integral plane.  Pixel rows grow downward while the imaginary axis
//! grows upward, so the mapping flips the vertical.
//!
//! The Canvas pairs a Viewport with the image buffer it is drawn
//! into.

use failure::Fail;
use image::{Pixel as ImagePixel, Rgb, RgbImage};
use itertools::{iproduct, Product};
use num::Complex;
use std::ops::Range;

/// Describes the x, y of a pixel on the integral plane.  Column
/// first, then row, counting down from the top.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub u32, pub u32);

/// Failures building or addressing a plane.
#[derive(Debug, Fail, PartialEq)]
pub enum PlaneError {
    /// The pixel lies outside the integral plane.
    #[fail(display = "pixel ({}, {}) is outside the {}x{} plane", x, y, width, height)]
    OutOfBounds {
        /// Column of the offending pixel.
        x: u32,
        /// Row of the offending pixel.
        y: u32,
        /// Width of the plane.
        width: u32,
        /// Height of the plane.
        height: u32,
    },

    /// The integral plane has no pixels.
    #[fail(display = "plane of {}x{} pixels is empty", _0, _1)]
    EmptyPlane(u32, u32),

    /// The complex width is not a positive, finite number.
    #[fail(display = "viewport width must be positive, got {}", _0)]
    InvalidWidth(f64),
}

/// Anything that can say which complex number a pixel stands for.
pub trait ComplexMapper {
    /// The complex number at the top-left corner of the pixel.
    fn to_complex(&self, pixel: Pixel) -> Complex<f64>;
}

/// The mapping between an integral plane of `pixel_width` by
/// `pixel_height` pixels and a region of the complex plane.  Only the
/// centre and the width are stored; scale, height and offset are
/// derived on every call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    center: Complex<f64>,
    width: f64,
    pixel_width: u32,
    pixel_height: u32,
}

impl Viewport {
    /// Constructor.  The integral plane must have at least one pixel
    /// and the complex width must be positive, and large enough that
    /// a single pixel still spans some of it.
    pub fn new(
        pixel_width: u32,
        pixel_height: u32,
        center: Complex<f64>,
        width: f64,
    ) -> Result<Viewport, PlaneError> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(PlaneError::EmptyPlane(pixel_width, pixel_height));
        }
        if !(width.is_finite() && width / f64::from(pixel_width) > 0.0) {
            return Err(PlaneError::InvalidWidth(width));
        }
        Ok(Viewport {
            center,
            width,
            pixel_width,
            pixel_height,
        })
    }

    /// The centre of the region on the complex plane.
    pub fn center(&self) -> Complex<f64> {
        self.center
    }

    /// The real extent of the region.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Width of the integral plane.
    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    /// Height of the integral plane.
    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    /// The number of pixels in the integral plane.
    pub fn len(&self) -> usize {
        self.pixel_width as usize * self.pixel_height as usize
    }

    /// Always false; a Viewport cannot be built without pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Complex-plane units per pixel.
    pub fn scale(&self) -> f64 {
        self.width / f64::from(self.pixel_width)
    }

    /// The imaginary extent of the region.
    pub fn height(&self) -> f64 {
        self.scale() * f64::from(self.pixel_height)
    }

    /// The complex number at the top-left corner of the region.  Row 0
    /// is the top edge, so the imaginary part is half the height above
    /// the centre, not below it.
    pub fn offset(&self) -> Complex<f64> {
        self.center + Complex::new(-self.width, self.height()) / 2.0
    }

    /// Whether the pixel lies on the integral plane.
    pub fn contains(&self, pixel: Pixel) -> bool {
        pixel.0 < self.pixel_width && pixel.1 < self.pixel_height
    }

    /// Fails with `OutOfBounds` unless the pixel is on the plane.
    pub fn check(&self, pixel: Pixel) -> Result<Pixel, PlaneError> {
        if self.contains(pixel) {
            Ok(pixel)
        } else {
            Err(PlaneError::OutOfBounds {
                x: pixel.0,
                y: pixel.1,
                width: self.pixel_width,
                height: self.pixel_height,
            })
        }
    }

    /// Every pixel of the integral plane, row by row from the top.
    /// Each call starts a fresh pass.
    pub fn pixels(&self) -> Pixels {
        Pixels(iproduct!(0..self.pixel_height, 0..self.pixel_width))
    }
}

impl ComplexMapper for Viewport {
    fn to_complex(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(f64::from(pixel.0), -f64::from(pixel.1)) * self.scale() + self.offset()
    }
}

/// A row-major walk over the pixels of a Viewport.
pub struct Pixels(Product<Range<u32>, Range<u32>>);

impl Iterator for Pixels {
    type Item = Pixel;

    fn next(&mut self) -> Option<Pixel> {
        self.0.next().map(|(y, x)| Pixel(x, y))
    }
}

/// A Viewport together with the image it paints into.  The image is
/// always exactly the size of the Viewport's integral plane.
pub struct Canvas {
    viewport: Viewport,
    image: RgbImage,
}

impl Canvas {
    /// A black image the size of the viewport.
    pub fn new(viewport: Viewport) -> Canvas {
        Canvas {
            viewport,
            image: RgbImage::new(viewport.pixel_width, viewport.pixel_height),
        }
    }

    /// Wrap an existing image.  The integral plane takes the image's
    /// dimensions.
    pub fn from_image(image: RgbImage, center: Complex<f64>, width: f64) -> Result<Canvas, PlaneError> {
        let viewport = Viewport::new(image.width(), image.height(), center, width)?;
        Ok(Canvas { viewport, image })
    }

    /// The mapping this canvas is painted through.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The image painted so far.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Mutable access to the image for painters that split it up.
    pub fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    /// Give up the canvas, keeping the image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Every pixel of the canvas, row by row from the top.
    pub fn pixels(&self) -> Pixels {
        self.viewport.pixels()
    }

    /// The colour of a pixel.
    pub fn colour(&self, pixel: Pixel) -> Result<[u8; 3], PlaneError> {
        let Pixel(x, y) = self.viewport.check(pixel)?;
        let channels = self.image.get_pixel(x, y).channels();
        Ok([channels[0], channels[1], channels[2]])
    }

    /// Paint a pixel.
    pub fn set_colour(&mut self, pixel: Pixel, colour: [u8; 3]) -> Result<(), PlaneError> {
        let Pixel(x, y) = self.viewport.check(pixel)?;
        self.image
            .put_pixel(x, y, Rgb::from_channels(colour[0], colour[1], colour[2], 0));
        Ok(())
    }
}

impl ComplexMapper for Canvas {
    fn to_complex(&self, pixel: Pixel) -> Complex<f64> {
        self.viewport.to_complex(pixel)
    }
}
